//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the [`WeatherApi`] seam it sits behind
//! - Normalization of current conditions and aggregation of the forecast
//! - The fetch orchestrator and the dashboard state it feeds
//!
//! It is used by `skycast-cli`, but has no terminal code of its own.

pub mod config;
pub mod error;
pub mod forecast;
pub mod icon;
pub mod location;
pub mod model;
pub mod provider;
pub mod service;
pub mod snapshot;
pub mod state;
pub mod theme;

pub use config::Config;
pub use error::{ErrorKind, FetchError};
pub use forecast::{DisplayForecastDay, Forecast, ForecastSummary, aggregate};
pub use location::{LocationSource, NoLocation, StaticLocation, locate_within};
pub use model::{Coordinates, Location, RawConditions, RawForecast, RawForecastSample, UnitSystem};
pub use provider::{OpenWeatherClient, WeatherApi, client_from_config};
pub use service::{Clock, RequestOutcome, SystemClock, WeatherReport, WeatherService};
pub use snapshot::{DisplaySnapshot, normalize};
pub use state::{Dashboard, DashboardState, RequestToken};
pub use theme::Backdrop;
