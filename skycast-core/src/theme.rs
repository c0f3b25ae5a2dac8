use serde::Serialize;

use crate::model::UnitSystem;

/// Background mood picked from the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backdrop {
    Gradient,
    Sunny,
    Clear,
    Cloudy,
    Rainy,
    Snow,
    Storm,
    Fog,
}

impl Backdrop {
    /// `main` is the coarse condition category, `temp` is in `unit`.
    pub fn for_conditions(main: &str, temp: f64, unit: UnitSystem) -> Self {
        let main = main.to_lowercase();
        let hot = match unit {
            UnitSystem::Metric => 25.0,
            UnitSystem::Imperial => 77.0,
        };

        if main.contains("clear") {
            return if temp > hot { Backdrop::Sunny } else { Backdrop::Clear };
        }
        if main.contains("cloud") {
            return Backdrop::Cloudy;
        }
        if main.contains("rain") || main.contains("drizzle") {
            return Backdrop::Rainy;
        }
        if main.contains("snow") {
            return Backdrop::Snow;
        }
        if main.contains("thunderstorm") {
            return Backdrop::Storm;
        }
        if main.contains("mist") || main.contains("fog") || main.contains("haze") {
            return Backdrop::Fog;
        }

        Backdrop::Gradient
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backdrop::Gradient => "gradient",
            Backdrop::Sunny => "sunny",
            Backdrop::Clear => "clear",
            Backdrop::Cloudy => "cloudy",
            Backdrop::Rainy => "rainy",
            Backdrop::Snow => "snow",
            Backdrop::Storm => "storm",
            Backdrop::Fog => "fog",
        }
    }
}
