//! Forecast aggregation: 3-hourly samples in, one representative per
//! calendar day out, plus a one-line outlook.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::{
    icon::glyph_for,
    model::{RawForecastSample, UnitSystem},
    snapshot::format_temperature,
};

/// Upper bound on the number of days shown.
pub const MAX_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayForecastDay {
    pub date: NaiveDate,
    pub label: String,
    pub icon: &'static str,
    pub description: String,
    pub temperature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSummary {
    RainExpected,
    MixedClouds,
    ClearSkies,
    /// The feed returned no samples at all.
    NoData,
}

impl ForecastSummary {
    /// Rain beats clouds, clouds beat clear. Looks at every sample, not only
    /// the ones picked as daily representatives.
    pub fn from_samples(samples: &[RawForecastSample]) -> Self {
        if samples.is_empty() {
            return ForecastSummary::NoData;
        }

        let any = |category: &str| {
            samples
                .iter()
                .any(|s| s.condition().is_some_and(|c| c.main == category))
        };

        if any("Rain") {
            ForecastSummary::RainExpected
        } else if any("Clouds") {
            ForecastSummary::MixedClouds
        } else {
            ForecastSummary::ClearSkies
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            ForecastSummary::RainExpected => {
                "Rain expected in the coming days. Don't forget your umbrella! ☔"
            }
            ForecastSummary::MixedClouds => {
                "Mixed clouds and sunshine ahead. Perfect weather for outdoor activities! 🌤️"
            }
            ForecastSummary::ClearSkies => "Mostly clear skies ahead. Great weather for your plans! 🌞",
            ForecastSummary::NoData => "No forecast data available for this location.",
        }
    }
}

impl std::fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub days: Vec<DisplayForecastDay>,
    pub summary: ForecastSummary,
}

/// "Today", "Tomorrow", or e.g. "Wed, Oct 21".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(date) {
        "Tomorrow".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

/// Reduces `samples` (chronological) to at most [`MAX_DAYS`] days. Calendar
/// dates are taken in the zone of `now`, the same zone "today" comes from.
pub fn aggregate(
    samples: &[RawForecastSample],
    unit: UnitSystem,
    now: DateTime<FixedOffset>,
) -> Forecast {
    let zone = *now.offset();
    let today = now.date_naive();

    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(MAX_DAYS);

    for sample in samples {
        if days.len() == MAX_DAYS {
            break;
        }

        let Some(condition) = sample.condition() else {
            continue;
        };
        let Some(instant) = DateTime::from_timestamp(sample.dt, 0) else {
            continue;
        };

        let date = instant.with_timezone(&zone).date_naive();
        if !seen.insert(date) {
            continue;
        }

        days.push(DisplayForecastDay {
            date,
            label: day_label(date, today),
            icon: glyph_for(&condition.icon),
            description: condition.description.clone(),
            temperature: format_temperature(sample.main.temp, unit),
        });
    }

    let summary = ForecastSummary::from_samples(samples);
    debug!(samples = samples.len(), days = days.len(), ?summary, "aggregated forecast");

    Forecast { days, summary }
}
