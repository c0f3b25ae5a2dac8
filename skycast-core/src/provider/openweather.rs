use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::{Location, RawConditions, RawForecast, UnitSystem};

use super::{ApiError, WeatherApi};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current-conditions and 5 day / 3 hour forecast reads against OpenWeather.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at another host, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request(&self, endpoint: &str, location: &Location, unit: UnitSystem) -> RequestBuilder {
        let mut query = location.query_pairs();
        query.push(("appid", self.api_key.clone()));
        query.push(("units", unit.as_query().to_string()));

        self.http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&query)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &Location,
        unit: UnitSystem,
    ) -> Result<T, ApiError> {
        debug!(endpoint, %location, %unit, "requesting OpenWeather");

        let res = self
            .request(endpoint, location, unit)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn current(&self, location: &Location, unit: UnitSystem) -> Result<RawConditions, ApiError> {
        self.fetch("weather", location, unit).await
    }

    async fn forecast(&self, location: &Location, unit: UnitSystem) -> Result<RawForecast, ApiError> {
        self.fetch("forecast", location, unit).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
