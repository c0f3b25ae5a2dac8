use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::{error::FetchError, model::Coordinates};

/// How long a position lookup may take before it counts as unavailable.
pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error, PartialEq)]
pub enum LocationError {
    #[error("permission to read the position was denied")]
    Denied,

    #[error("position lookup is not supported")]
    Unsupported,

    #[error("position lookup failed: {0}")]
    Failed(String),
}

/// Something that can tell where the user is.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// A position known up front, e.g. from configuration or flags.
#[derive(Debug, Clone, Copy)]
pub struct StaticLocation(pub Coordinates);

#[async_trait]
impl LocationSource for StaticLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Used when no position source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationSource for NoLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Asks `source` for a position, giving up after `limit`.
pub async fn locate_within(
    source: &dyn LocationSource,
    limit: Duration,
) -> Result<Coordinates, FetchError> {
    match tokio::time::timeout(limit, source.locate()).await {
        Ok(Ok(coords)) => Ok(coords),
        Ok(Err(LocationError::Unsupported)) => Err(FetchError::location_unsupported()),
        Ok(Err(err)) => {
            warn!(error = %err, "position lookup failed");
            Err(FetchError::location_unavailable())
        }
        Err(_) => {
            warn!(?limit, "position lookup timed out");
            Err(FetchError::location_unavailable())
        }
    }
}
