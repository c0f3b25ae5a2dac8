//! Icon-code to glyph table.

/// Glyph used for any code outside the table.
pub const DEFAULT_GLYPH: &str = "🌤️";

/// Every icon code the upstream API documents.
pub const KNOWN_CODES: [&str; 18] = [
    "01d", "01n", "02d", "02n", "03d", "03n", "04d", "04n", "09d", "09n", "10d", "10n", "11d",
    "11n", "13d", "13n", "50d", "50n",
];

/// Pictographic symbol for an icon code. Day and night variants share a glyph
/// except for clear sky.
pub fn glyph_for(code: &str) -> &'static str {
    match code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" | "02n" => "⛅",
        "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" => "🌧️",
        "10d" | "10n" => "🌦️",
        "11d" | "11n" => "⛈️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫️",
        _ => DEFAULT_GLYPH,
    }
}
