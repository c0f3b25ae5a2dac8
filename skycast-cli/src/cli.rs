use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use skycast_core::{
    Config, Coordinates, Dashboard, DashboardState, LocationSource, NoLocation, StaticLocation,
    UnitSystem, WeatherReport, WeatherService, client_from_config,
    location::DEFAULT_LOCATE_TIMEOUT, locate_within,
};
use tracing::debug;

use crate::render::{DEMO_BANNER, POPULAR_CITIES, render_report, render_state};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, preferred unit, default city and home location.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// "metric" or "imperial"; defaults to the configured unit.
        #[arg(long)]
        unit: Option<String>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show weather for a position (flags, or the configured home).
    Here {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long)]
        unit: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List the popular cities.
    Popular,

    /// Browse cities interactively.
    Interactive {
        #[arg(long)]
        unit: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city, unit, json } => {
                let unit = resolve_unit(unit.as_deref(), &config)?;
                let city = city.unwrap_or_else(|| config.default_city().to_string());
                warn_if_demo(&config);

                let service = WeatherService::new(client_from_config(&config));
                match service.fetch_by_city(&city, unit).await {
                    Ok(report) => print_report(&report, json),
                    Err(err) if err.is_silent() => Ok(()),
                    Err(err) => Err(err.into()),
                }
            }
            Command::Here { lat, lon, unit, json } => {
                let unit = resolve_unit(unit.as_deref(), &config)?;
                warn_if_demo(&config);

                let explicit = lat.zip(lon).map(|(lat, lon)| checked_coordinates(lat, lon)).transpose()?;
                let source = location_source(explicit, &config);
                let coords = locate_within(source.as_ref(), DEFAULT_LOCATE_TIMEOUT).await?;

                let service = WeatherService::new(client_from_config(&config));
                let report = service.fetch_by_coordinates(coords, unit).await?;
                print_report(&report, json)
            }
            Command::Popular => {
                for city in POPULAR_CITIES {
                    println!("{city}");
                }
                Ok(())
            }
            Command::Interactive { unit } => {
                let unit = resolve_unit(unit.as_deref(), &config)?;
                interactive(config, unit).await
            }
        }
    }
}

fn resolve_unit(flag: Option<&str>, config: &Config) -> anyhow::Result<UnitSystem> {
    match flag {
        Some(value) => UnitSystem::try_from(value),
        None => Ok(config.unit),
    }
}

/// Flags win over the configured home; with neither, lookups are unsupported.
fn location_source(explicit: Option<Coordinates>, config: &Config) -> Box<dyn LocationSource> {
    match explicit.or(config.home) {
        Some(coords) => Box::new(StaticLocation(coords)),
        None => Box::new(NoLocation),
    }
}

fn warn_if_demo(config: &Config) {
    if config.is_demo() {
        eprintln!("{DEMO_BANNER}\n");
    }
}

fn print_report(report: &WeatherReport, json: bool) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{text}");
    } else {
        let mut text = String::new();
        render_report(&mut text, report)?;
        println!("{text}");
    }

    Ok(())
}

/// Parses "lat,lon", e.g. "48.85, 2.35".
fn parse_coordinates(input: &str) -> anyhow::Result<Coordinates> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected \"lat,lon\", got '{input}'"))?;

    let lat: f64 = lat.trim().parse().with_context(|| format!("Invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("Invalid longitude '{}'", lon.trim()))?;

    checked_coordinates(lat, lon)
}

/// Rejects NaN and anything outside -90..=90 / -180..=180.
fn checked_coordinates(lat: f64, lon: f64) -> anyhow::Result<Coordinates> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(anyhow!("Coordinates out of range: {lat}, {lon}"));
    }

    Ok(Coordinates { lat, lon })
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key (leave empty for demo mode):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    config.set_api_key(api_key);

    let units = vec![UnitSystem::Metric, UnitSystem::Imperial];
    let start = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    config.unit = Select::new("Units:", units).with_starting_cursor(start).prompt()?;

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let home = Text::new("Home location as lat,lon (optional):")
        .with_default(&config.home.map(|c| format!("{}, {}", c.lat, c.lon)).unwrap_or_default())
        .prompt()?;
    config.home = match home.trim() {
        "" => None,
        value => Some(parse_coordinates(value)?),
    };

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

const SEARCH: &str = "🔎 Search for a city...";
const MY_LOCATION: &str = "📍 My Location";
const QUIT: &str = "Quit";

async fn interactive(config: Config, unit: UnitSystem) -> anyhow::Result<()> {
    warn_if_demo(&config);

    let source = location_source(None, &config);
    let service = WeatherService::new(client_from_config(&config));
    let mut dashboard = Dashboard::new(service, DashboardState::new(config.default_city(), unit));

    show_state(dashboard.refresh().await)?;

    loop {
        let state = dashboard.state();
        let toggle = format!("Switch to {}", state.unit.toggled().temperature_symbol());

        let mut options: Vec<String> = POPULAR_CITIES.iter().map(|c| c.to_string()).collect();
        options.extend([SEARCH.to_string(), toggle.clone(), MY_LOCATION.to_string(), QUIT.to_string()]);

        let prompt = format!("Current: {}", state.city);
        let choice = match Select::new(&prompt, options).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let state = match choice.as_str() {
            QUIT => break,
            SEARCH => {
                let query = match Text::new("City:").prompt() {
                    Ok(query) => query,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(err) => return Err(err.into()),
                };
                dashboard.search(&query).await
            }
            MY_LOCATION => dashboard.locate(source.as_ref(), DEFAULT_LOCATE_TIMEOUT).await,
            c if c == toggle => dashboard.toggle_unit().await,
            city => dashboard.search(city).await,
        };

        show_state(state)?;
    }

    debug!("leaving interactive mode");
    Ok(())
}

fn show_state(state: &DashboardState) -> anyhow::Result<()> {
    let mut text = String::new();
    render_state(&mut text, state)?;
    print!("{text}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_show_with_unit() {
        let cli = Cli::try_parse_from(["skycast", "show", "New York", "--unit", "imperial", "--json"])
            .expect("arguments must parse");

        match cli.command {
            Command::Show { city, unit, json } => {
                assert_eq!(city.as_deref(), Some("New York"));
                assert_eq!(unit.as_deref(), Some("imperial"));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn here_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["skycast", "here", "--lat", "-33.87", "--lon", "151.21"])
            .expect("arguments must parse");

        match cli.command {
            Command::Here { lat, lon, .. } => {
                assert_eq!(lat, Some(-33.87));
                assert_eq!(lon, Some(151.21));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn here_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["skycast", "here", "--lat", "10"]).is_err());
    }

    #[test]
    fn unit_flag_overrides_config() {
        let config = Config { unit: UnitSystem::Imperial, ..Config::default() };

        assert_eq!(resolve_unit(None, &config).unwrap(), UnitSystem::Imperial);
        assert_eq!(resolve_unit(Some("metric"), &config).unwrap(), UnitSystem::Metric);
        assert!(resolve_unit(Some("kelvin"), &config).is_err());
    }

    #[test]
    fn coordinates_parse_and_validate() {
        assert_eq!(parse_coordinates("48.85, 2.35").unwrap(), Coordinates { lat: 48.85, lon: 2.35 });
        assert!(parse_coordinates("48.85").is_err());
        assert!(parse_coordinates("north, 2").is_err());
        assert!(parse_coordinates("95, 2").is_err());
    }

    #[test]
    fn flag_coordinates_are_range_checked() {
        assert_eq!(checked_coordinates(-33.87, 151.21).unwrap(), Coordinates { lat: -33.87, lon: 151.21 });
        assert!(checked_coordinates(200.0, 0.0).is_err());
        assert!(checked_coordinates(0.0, -180.5).is_err());
        assert!(checked_coordinates(f64::NAN, 0.0).is_err());
    }

    #[tokio::test]
    async fn home_location_is_used_when_no_flags() {
        let home = Coordinates { lat: 1.29, lon: 103.85 };
        let config = Config { home: Some(home), ..Config::default() };

        let found = locate_within(location_source(None, &config).as_ref(), DEFAULT_LOCATE_TIMEOUT).await;
        assert_eq!(found, Ok(home));

        let explicit = Coordinates { lat: 0.0, lon: 0.0 };
        let found = locate_within(location_source(Some(explicit), &config).as_ref(), DEFAULT_LOCATE_TIMEOUT).await;
        assert_eq!(found, Ok(explicit));
    }

    #[tokio::test]
    async fn no_home_means_location_unavailable() {
        let err = locate_within(location_source(None, &Config::default()).as_ref(), DEFAULT_LOCATE_TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(err.kind, skycast_core::ErrorKind::LocationUnavailable);
    }
}
