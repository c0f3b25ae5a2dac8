//! Fetch orchestration: current conditions, then forecast, then the display
//! records built from both.

use std::{fmt::Debug, sync::Arc};

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::FetchError,
    forecast::{Forecast, aggregate},
    model::{Coordinates, Location, UnitSystem},
    provider::{ApiError, WeatherApi},
    snapshot::{DisplaySnapshot, normalize},
};

/// Source of "now" for local-time and day-label computations.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the machine's zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Everything the display layer needs for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Canonical place name from the upstream response.
    pub city: String,
    pub country: String,
    /// What was asked for; used to repeat the lookup.
    pub location: Location,
    pub unit: UnitSystem,
    pub snapshot: DisplaySnapshot,
    pub forecast: Forecast,
}

pub type RequestOutcome = Result<WeatherReport, FetchError>;

#[derive(Debug)]
pub struct WeatherService<A> {
    api: A,
    clock: Arc<dyn Clock>,
}

impl<A: WeatherApi> WeatherService<A> {
    pub fn new(api: A) -> Self {
        Self::with_clock(api, Arc::new(SystemClock))
    }

    pub fn with_clock(api: A, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Blank names are rejected with [`crate::ErrorKind::EmptyInput`] before
    /// anything goes out.
    pub async fn fetch_by_city(&self, name: &str, unit: UnitSystem) -> RequestOutcome {
        let name = name.trim();
        if name.is_empty() {
            debug!("ignoring blank city query");
            return Err(FetchError::empty_input());
        }

        self.fetch(Location::City(name.to_string()), unit).await
    }

    pub async fn fetch_by_coordinates(&self, coords: Coordinates, unit: UnitSystem) -> RequestOutcome {
        self.fetch(Location::Coordinates(coords), unit).await
    }

    /// Repeats a lookup for a location obtained earlier.
    pub async fn fetch(&self, location: Location, unit: UnitSystem) -> RequestOutcome {
        let outcome = self.fetch_inner(location.clone(), unit).await;

        if let Err(err) = &outcome {
            warn!(%location, kind = ?err.kind, "weather lookup failed: {err}");
        }

        outcome
    }

    async fn fetch_inner(&self, location: Location, unit: UnitSystem) -> RequestOutcome {
        let wording = Wording::for_location(&location);

        let current = self
            .api
            .current(&location, unit)
            .await
            .map_err(|e| classify_current(&e, wording))?;

        let forecast = self.api.forecast(&location, unit).await.map_err(|e| {
            debug!(error = %e, "forecast request failed");
            FetchError::upstream(wording.forecast)
        })?;

        let now = self.clock.now();

        let snapshot = normalize(&current, unit, now).map_err(|e| {
            debug!(error = %e, "current conditions payload rejected");
            FetchError::upstream(wording.current)
        })?;
        let forecast = aggregate(&forecast.list, unit, now);

        Ok(WeatherReport {
            city: current.name,
            country: current.sys.country,
            location,
            unit,
            snapshot,
            forecast,
        })
    }
}

/// Catch-all messages differ between name and position lookups.
#[derive(Debug, Clone, Copy)]
struct Wording {
    current: &'static str,
    forecast: &'static str,
}

impl Wording {
    fn for_location(location: &Location) -> Self {
        if location.is_coordinates() {
            Self {
                current: "Failed to fetch location weather data.",
                forecast: "Failed to fetch location forecast data.",
            }
        } else {
            Self {
                current: "Failed to fetch weather data. Please try again later.",
                forecast: "Failed to fetch forecast data.",
            }
        }
    }
}

fn classify_current(err: &ApiError, wording: Wording) -> FetchError {
    debug!(error = %err, "current conditions request failed");

    match err.status() {
        Some(404) => FetchError::city_not_found(),
        Some(401) => FetchError::invalid_credentials(),
        Some(429) => FetchError::rate_limited(),
        _ => FetchError::upstream(wording.current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        forecast::ForecastSummary,
        model::{Clouds, Condition, MainReadings, RawConditions, RawForecast, RawForecastSample, SampleReadings, Sys, Wind},
        provider::fixed::{FixedApi, Reply},
    };
    use chrono::TimeZone;

    fn conditions(name: &str) -> RawConditions {
        RawConditions {
            name: name.into(),
            sys: Sys { country: "JP".into(), sunrise: 1_792_357_200 },
            weather: vec![Condition {
                main: "Clear".into(),
                description: "clear sky".into(),
                icon: "01d".into(),
            }],
            main: MainReadings { temp: 21.6, feels_like: 20.9, humidity: 55, pressure: 1018 },
            wind: Wind { speed: 3.1, deg: 90 },
            visibility: 10_000,
            clouds: Some(Clouds { all: 0 }),
            timezone: 9 * 3600,
        }
    }

    fn forecast() -> RawForecast {
        RawForecast {
            list: (0..16)
                .map(|i| RawForecastSample {
                    dt: 1_792_368_000 + i * 3 * 3600,
                    weather: vec![Condition {
                        main: if i == 10 { "Rain" } else { "Clear" }.into(),
                        description: "clear sky".into(),
                        icon: "01d".into(),
                    }],
                    main: SampleReadings { temp: 18.0 },
                })
                .collect(),
        }
    }

    fn service(current: Reply<RawConditions>, forecast: Reply<RawForecast>) -> WeatherService<FixedApi> {
        let now = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        WeatherService::with_clock(FixedApi::new(current, forecast), Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn city_lookup_builds_full_report() {
        let svc = service(Reply::Payload(conditions("Tokyo")), Reply::Payload(forecast()));

        let report = svc.fetch_by_city("  Tokyo ", UnitSystem::Metric).await.expect("lookup succeeds");

        assert_eq!(report.city, "Tokyo");
        assert_eq!(report.snapshot.location, "Tokyo, JP");
        assert_eq!(report.snapshot.temperature, "22°C");
        assert_eq!(report.snapshot.feels_like, "21°C");
        assert_eq!(report.snapshot.local_time, "05:00 PM");
        assert_eq!(report.forecast.days.len(), 2);
        assert_eq!(report.forecast.summary, ForecastSummary::RainExpected);

        let calls = svc.api().calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].endpoint, "weather");
        assert_eq!(calls[1].endpoint, "forecast");
        assert_eq!(calls[0].location, Location::City("Tokyo".into()));
    }

    #[tokio::test]
    async fn not_found_skips_forecast_call() {
        let svc = service(Reply::Status(404), Reply::Payload(forecast()));

        let err = svc.fetch_by_city("Atlantis", UnitSystem::Metric).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::CityNotFound);
        assert_eq!(svc.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn current_statuses_are_classified() {
        let cases = [
            (Reply::Status(401), ErrorKind::InvalidCredentials),
            (Reply::Status(429), ErrorKind::RateLimited),
            (Reply::Status(500), ErrorKind::UpstreamFailure),
            (Reply::Status(400), ErrorKind::UpstreamFailure),
            (Reply::Offline, ErrorKind::UpstreamFailure),
        ];

        for (reply, kind) in cases {
            let svc = service(reply, Reply::Payload(forecast()));
            let err = svc.fetch_by_city("Paris", UnitSystem::Metric).await.unwrap_err();
            assert_eq!(err.kind, kind);
        }
    }

    #[tokio::test]
    async fn any_forecast_failure_is_upstream() {
        for reply in [Reply::Status(404), Reply::Status(401), Reply::Offline] {
            let svc = service(Reply::Payload(conditions("Paris")), reply);
            let err = svc.fetch_by_city("Paris", UnitSystem::Metric).await.unwrap_err();

            assert_eq!(err.kind, ErrorKind::UpstreamFailure);
            assert_eq!(err.message, "Failed to fetch forecast data.");
        }
    }

    #[tokio::test]
    async fn blank_query_sends_nothing() {
        let svc = service(Reply::Payload(conditions("Paris")), Reply::Payload(forecast()));

        let err = svc.fetch_by_city("   ", UnitSystem::Metric).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::EmptyInput);
        assert!(svc.api().calls().is_empty());
    }

    #[tokio::test]
    async fn coordinates_resolve_canonical_name() {
        let svc = service(Reply::Payload(conditions("Shinjuku")), Reply::Payload(forecast()));
        let coords = Coordinates { lat: 35.69, lon: 139.70 };

        let report = svc.fetch_by_coordinates(coords, UnitSystem::Imperial).await.unwrap();

        assert_eq!(report.city, "Shinjuku");
        assert_eq!(report.location, Location::Coordinates(coords));
        assert_eq!(report.unit, UnitSystem::Imperial);
        assert_eq!(svc.api().calls()[0].unit, UnitSystem::Imperial);
    }

    #[tokio::test]
    async fn coordinate_failures_use_location_wording() {
        let svc = service(Reply::Status(503), Reply::Payload(forecast()));
        let err = svc
            .fetch_by_coordinates(Coordinates { lat: 0.0, lon: 0.0 }, UnitSystem::Metric)
            .await
            .unwrap_err();
        assert_eq!(err.message, "Failed to fetch location weather data.");

        let svc = service(Reply::Payload(conditions("Null Island")), Reply::Offline);
        let err = svc
            .fetch_by_coordinates(Coordinates { lat: 0.0, lon: 0.0 }, UnitSystem::Metric)
            .await
            .unwrap_err();
        assert_eq!(err.message, "Failed to fetch location forecast data.");
    }

    #[tokio::test]
    async fn payload_without_condition_is_upstream_failure() {
        let mut payload = conditions("Paris");
        payload.weather.clear();
        let svc = service(Reply::Payload(payload), Reply::Payload(forecast()));

        let err = svc.fetch_by_city("Paris", UnitSystem::Metric).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::UpstreamFailure);
    }
}
