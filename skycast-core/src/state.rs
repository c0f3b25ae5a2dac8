//! Dashboard state and the controller that drives it.
//!
//! [`DashboardState`] is a plain value. Every transition consumes the old
//! state and returns a new one. Requests are tagged with a [`RequestToken`]
//! when they start, and a result is only applied if its token is still the
//! pending one, so an older lookup that finishes late cannot overwrite a newer
//! one.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::{
    config::DEFAULT_CITY,
    location::{LocationSource, locate_within},
    model::{Location, UnitSystem},
    provider::WeatherApi,
    service::{RequestOutcome, WeatherReport, WeatherService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub city: String,
    pub unit: UnitSystem,
    pub loading: bool,
    pub error: Option<String>,
    pub report: Option<WeatherReport>,
    pending: Option<RequestToken>,
    issued: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_CITY, UnitSystem::Metric)
    }
}

impl DashboardState {
    pub fn new(city: impl Into<String>, unit: UnitSystem) -> Self {
        Self {
            city: city.into(),
            unit,
            loading: false,
            error: None,
            report: None,
            pending: None,
            issued: 0,
        }
    }

    pub fn pending(&self) -> Option<RequestToken> {
        self.pending
    }

    /// Starts a request. Any request started earlier becomes stale.
    pub fn begin(self) -> (Self, RequestToken) {
        let token = RequestToken(self.issued + 1);
        let next = Self {
            loading: true,
            error: None,
            pending: Some(token),
            issued: token.0,
            ..self
        };

        (next, token)
    }

    /// Applies the result of the request identified by `token`.
    pub fn resolve(self, token: RequestToken, outcome: RequestOutcome) -> Self {
        if self.pending != Some(token) {
            debug!(?token, pending = ?self.pending, "discarding stale response");
            return self;
        }

        match outcome {
            Ok(report) => Self {
                city: report.city.clone(),
                unit: report.unit,
                loading: false,
                error: None,
                report: Some(report),
                pending: None,
                ..self
            },
            Err(err) if err.is_silent() => Self {
                loading: false,
                pending: None,
                ..self
            },
            Err(err) => Self {
                loading: false,
                error: Some(err.message),
                pending: None,
                ..self
            },
        }
    }

    /// Flips the unit. The shown report still carries the old unit until it
    /// is fetched again.
    pub fn toggle_unit(self) -> Self {
        Self {
            unit: self.unit.toggled(),
            ..self
        }
    }

    /// Where a refresh should look: the last successful lookup, or the
    /// current city name.
    pub fn refresh_target(&self) -> Location {
        match &self.report {
            Some(report) => report.location.clone(),
            None => Location::City(self.city.clone()),
        }
    }
}

/// Owns the state and runs lookups through a [`WeatherService`].
#[derive(Debug)]
pub struct Dashboard<A> {
    service: WeatherService<A>,
    state: DashboardState,
}

impl<A: WeatherApi> Dashboard<A> {
    pub fn new(service: WeatherService<A>, state: DashboardState) -> Self {
        Self { service, state }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn service(&self) -> &WeatherService<A> {
        &self.service
    }

    /// Looks up a city by name. Blank queries leave the state untouched.
    pub async fn search(&mut self, query: &str) -> &DashboardState {
        if query.trim().is_empty() {
            debug!("ignoring blank search");
            return &self.state;
        }

        let token = self.start();
        let outcome = self.service.fetch_by_city(query, self.state.unit).await;
        self.finish(token, outcome)
    }

    /// Looks up the user's position, then the weather there.
    pub async fn locate(&mut self, source: &dyn LocationSource, limit: Duration) -> &DashboardState {
        let token = self.start();
        let outcome = match locate_within(source, limit).await {
            Ok(coords) => self.service.fetch_by_coordinates(coords, self.state.unit).await,
            Err(err) => Err(err),
        };
        self.finish(token, outcome)
    }

    /// Switches units and fetches the current place again.
    pub async fn toggle_unit(&mut self) -> &DashboardState {
        self.transition(DashboardState::toggle_unit);
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> &DashboardState {
        let target = self.state.refresh_target();
        let token = self.start();
        let outcome = self.service.fetch(target, self.state.unit).await;
        self.finish(token, outcome)
    }

    fn start(&mut self) -> RequestToken {
        let (next, token) = std::mem::take(&mut self.state).begin();
        self.state = next;
        token
    }

    fn finish(&mut self, token: RequestToken, outcome: RequestOutcome) -> &DashboardState {
        self.transition(|state| state.resolve(token, outcome));
        &self.state
    }

    fn transition(&mut self, f: impl FnOnce(DashboardState) -> DashboardState) {
        let state = std::mem::take(&mut self.state);
        self.state = f(state);
    }
}
