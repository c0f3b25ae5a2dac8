use serde::Serialize;
use thiserror::Error;

/// User-facing failure categories. Every one of them ends the current request
/// and leaves the dashboard ready for the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CityNotFound,
    InvalidCredentials,
    RateLimited,
    /// Any other non-success response, network error or unreadable payload.
    UpstreamFailure,
    LocationUnavailable,
    /// Blank search query. Dropped without feedback.
    EmptyInput,
}

/// A failed request: what kind of failure and the text to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn city_not_found() -> Self {
        Self::new(ErrorKind::CityNotFound, "City not found. Please check the spelling and try again.")
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorKind::InvalidCredentials,
            "Invalid API key. Please check your OpenWeatherMap API configuration.",
        )
    }

    pub fn rate_limited() -> Self {
        Self::new(
            ErrorKind::RateLimited,
            "API rate limit exceeded. Please wait a moment and try again.",
        )
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamFailure, message)
    }

    pub fn location_unavailable() -> Self {
        Self::new(
            ErrorKind::LocationUnavailable,
            "Unable to retrieve your location. Please enable location services or search for a city manually.",
        )
    }

    pub fn location_unsupported() -> Self {
        Self::new(
            ErrorKind::LocationUnavailable,
            "Location lookup is not available here. Set a home location with `skycast configure` or search for a city.",
        )
    }

    pub fn empty_input() -> Self {
        Self::new(ErrorKind::EmptyInput, "Please enter a city name.")
    }

    /// Silent failures are not shown to the user.
    pub fn is_silent(&self) -> bool {
        self.kind == ErrorKind::EmptyInput
    }
}
