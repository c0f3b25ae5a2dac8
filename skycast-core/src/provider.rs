use crate::{
    Config,
    model::{Location, RawConditions, RawForecast, UnitSystem},
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

#[cfg(any(test, feature = "test-util"))]
pub mod fixed;
pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Transport-level failure of a single upstream read.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("upstream responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The two reads the dashboard needs from a weather service.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn current(&self, location: &Location, unit: UnitSystem) -> Result<RawConditions, ApiError>;

    async fn forecast(&self, location: &Location, unit: UnitSystem) -> Result<RawForecast, ApiError>;
}

/// Construct the OpenWeather client from config. A missing key yields the
/// demo placeholder rather than an error.
pub fn client_from_config(config: &Config) -> OpenWeatherClient {
    let client = OpenWeatherClient::new(config.api_key());

    match &config.base_url {
        Some(base_url) => client.with_base_url(base_url.as_str()),
        None => client,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_only_for_http_errors() {
        let err = ApiError::Status { status: 404, body: "{}".into() };
        assert_eq!(err.status(), Some(404));

        assert_eq!(ApiError::Transport("reset".into()).status(), None);
        assert_eq!(ApiError::Decode("eof".into()).status(), None);
    }

    #[test]
    fn client_from_config_honours_base_url() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://127.0.0.1:8080".into()),
            ..Config::default()
        };

        let client = client_from_config(&cfg);
        let rendered = format!("{client:?}");

        assert!(rendered.contains("http://127.0.0.1:8080"));
    }
}
