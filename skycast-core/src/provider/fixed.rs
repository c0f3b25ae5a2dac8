use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{Location, RawConditions, RawForecast, UnitSystem};

use super::{ApiError, WeatherApi};

/// What a [`FixedApi`] answers for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Payload(T),
    Status(u16),
    Offline,
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T, ApiError> {
        match self {
            Reply::Payload(value) => Ok(value.clone()),
            Reply::Status(status) => Err(ApiError::Status {
                status: *status,
                body: format!("{{\"cod\":{status}}}"),
            }),
            Reply::Offline => Err(ApiError::Transport("connection refused".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub endpoint: &'static str,
    pub location: Location,
    pub unit: UnitSystem,
}

/// In-memory [`WeatherApi`] that serves prepared replies and records every
/// call made to it.
#[derive(Debug)]
pub struct FixedApi {
    current: Reply<RawConditions>,
    forecast: Reply<RawForecast>,
    calls: Mutex<Vec<Call>>,
}

impl FixedApi {
    pub fn new(current: Reply<RawConditions>, forecast: Reply<RawForecast>) -> Self {
        Self { current, forecast, calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, endpoint: &'static str, location: &Location, unit: UnitSystem) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Call { endpoint, location: location.clone(), unit });
    }
}

#[async_trait]
impl WeatherApi for FixedApi {
    async fn current(&self, location: &Location, unit: UnitSystem) -> Result<RawConditions, ApiError> {
        self.record("weather", location, unit);
        self.current.to_result()
    }

    async fn forecast(&self, location: &Location, unit: UnitSystem) -> Result<RawForecast, ApiError> {
        self.record("forecast", location, unit);
        self.forecast.to_result()
    }
}
