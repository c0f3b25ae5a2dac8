//! Plain-text rendering of a [`WeatherReport`].

use std::fmt::{self, Write};

use skycast_core::{DashboardState, WeatherReport};

pub const DEMO_BANNER: &str = "⚠️  Demo Mode: no API key configured, using the placeholder key.\n   \
     Get your free API key at https://openweathermap.org/api and run `skycast configure`.";

pub const POPULAR_CITIES: [&str; 8] =
    ["London", "New York", "Tokyo", "Paris", "Sydney", "Dubai", "Mumbai", "Singapore"];

pub fn render_report(out: &mut impl Write, report: &WeatherReport) -> fmt::Result {
    let snap = &report.snapshot;

    writeln!(out, "Showing weather for {}", snap.location)?;
    writeln!(out, "{}  {}  {}", snap.icon, snap.temperature, snap.description)?;
    writeln!(out, "Local time: {}", snap.local_time)?;
    writeln!(out)?;
    writeln!(out, "  Feels like      {}", snap.feels_like)?;
    writeln!(out, "  Humidity        {}", snap.humidity)?;
    writeln!(out, "  Wind            {}", snap.wind_speed)?;
    writeln!(out, "  Pressure        {}", snap.pressure)?;
    writeln!(out, "  Wind direction  {}", snap.wind_direction)?;
    writeln!(out, "  Visibility      {}", snap.visibility)?;
    writeln!(out, "  Cloudiness      {}", snap.cloudiness)?;
    writeln!(out, "  Sunrise         {}", snap.sunrise)?;
    writeln!(out)?;
    writeln!(out, "5-Day Forecast")?;

    for day in &report.forecast.days {
        writeln!(
            out,
            "  {:<14} {}  {:>6}  {}",
            day.label, day.icon, day.temperature, day.description
        )?;
    }

    writeln!(out)?;
    write!(out, "{}", report.forecast.summary)
}

/// Dashboard view: the error banner when the last request failed, then
/// whatever report was loaded before it.
pub fn render_state(out: &mut impl Write, state: &DashboardState) -> fmt::Result {
    if let Some(error) = &state.error {
        writeln!(out, "⚠️ {error}")?;
        writeln!(out)?;
    }

    if let Some(report) = &state.report {
        render_report(out, report)?;
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use skycast_core::{
        Backdrop, DisplayForecastDay, DisplaySnapshot, Forecast, ForecastSummary, Location, UnitSystem,
    };

    fn report() -> WeatherReport {
        WeatherReport {
            city: "Dubai".into(),
            country: "AE".into(),
            location: Location::City("Dubai".into()),
            unit: UnitSystem::Metric,
            snapshot: DisplaySnapshot {
                location: "Dubai, AE".into(),
                description: "clear sky".into(),
                local_time: "01:15 PM".into(),
                temperature: "34°C".into(),
                feels_like: "37°C".into(),
                humidity: "40%".into(),
                pressure: "1009 hPa".into(),
                wind_speed: "5.1 m/s".into(),
                wind_direction: "320°".into(),
                visibility: "10.0 km".into(),
                cloudiness: "0%".into(),
                sunrise: "06:12 AM".into(),
                icon: "☀️",
                backdrop: Backdrop::Sunny,
            },
            forecast: Forecast {
                days: vec![DisplayForecastDay {
                    date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                    label: "Today".into(),
                    icon: "☀️",
                    description: "clear sky".into(),
                    temperature: "33°C".into(),
                }],
                summary: ForecastSummary::ClearSkies,
            },
        }
    }

    #[test]
    fn error_banner_keeps_previous_report() {
        let mut state = DashboardState::new("Dubai", UnitSystem::Metric);
        state.report = Some(report());
        state.error = Some("City not found. Please check the spelling and try again.".into());

        let mut text = String::new();
        render_state(&mut text, &state).unwrap();

        assert!(text.starts_with("⚠️ City not found."));
        assert!(text.contains("Showing weather for Dubai, AE"));
    }

    #[test]
    fn empty_state_renders_nothing() {
        let mut text = String::new();
        render_state(&mut text, &DashboardState::default()).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn report_lists_current_details_and_days() {
        let mut text = String::new();
        render_report(&mut text, &report()).unwrap();

        assert!(text.starts_with("Showing weather for Dubai, AE\n"));
        assert!(text.contains("Feels like      37°C"));
        assert!(text.contains("Visibility      10.0 km"));
        assert!(text.contains("Today"));
        assert!(text.ends_with("Mostly clear skies ahead. Great weather for your plans! 🌞"));
    }

    #[test]
    fn popular_cities_start_with_london() {
        assert_eq!(POPULAR_CITIES[0], "London");
        assert_eq!(POPULAR_CITIES.len(), 8);
    }
}
