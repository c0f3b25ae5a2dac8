//! Current-conditions normalizer.
//!
//! Turns a [`RawConditions`] payload into a [`DisplaySnapshot`]: every value
//! already formatted for display, nothing left optional.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use thiserror::Error;

use crate::{
    icon::glyph_for,
    model::{RawConditions, UnitSystem},
    theme::Backdrop,
};

/// 12-hour clock, zero-padded hour, e.g. `07:05 AM`.
pub const CLOCK_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("payload has no weather condition entry")]
    MissingCondition,

    #[error("timestamp {0} is out of range")]
    BadTimestamp(i64),

    #[error("UTC offset of {0} seconds is out of range")]
    BadOffset(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub location: String,
    pub description: String,
    pub local_time: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub pressure: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub visibility: String,
    pub cloudiness: String,
    pub sunrise: String,
    pub icon: &'static str,
    pub backdrop: Backdrop,
}

/// Rounds halves towards positive infinity, so 21.5 becomes 22 and -2.5
/// becomes -2.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn format_temperature(value: f64, unit: UnitSystem) -> String {
    format!("{}{}", round_half_up(value), unit.temperature_symbol())
}

/// Meters as kilometers with one decimal, ties rounded up (6250 m is "6.3 km").
pub fn format_visibility(meters: u32) -> String {
    let tenths = (u64::from(meters) + 50) / 100;
    format!("{}.{} km", tenths / 10, tenths % 10)
}

/// Time of day at a place `utc_offset` seconds away from UTC, as seen at `now`.
pub fn local_time_at(now: DateTime<FixedOffset>, utc_offset: i32) -> Result<String, NormalizeError> {
    let zone = FixedOffset::east_opt(utc_offset).ok_or(NormalizeError::BadOffset(utc_offset))?;
    Ok(now.with_timezone(&zone).format(CLOCK_FORMAT).to_string())
}

/// Clock time of an epoch instant in the viewer's zone.
pub fn clock_in_zone(epoch: i64, zone: &FixedOffset) -> Result<String, NormalizeError> {
    let instant = DateTime::from_timestamp(epoch, 0).ok_or(NormalizeError::BadTimestamp(epoch))?;
    Ok(instant.with_timezone(zone).format(CLOCK_FORMAT).to_string())
}

/// Builds the display record. `now` is the viewer's clock reading; its offset
/// is the viewer's zone and is used for the sunrise time.
pub fn normalize(
    raw: &RawConditions,
    unit: UnitSystem,
    now: DateTime<FixedOffset>,
) -> Result<DisplaySnapshot, NormalizeError> {
    let condition = raw.condition().ok_or(NormalizeError::MissingCondition)?;

    Ok(DisplaySnapshot {
        location: raw.location_label(),
        description: condition.description.clone(),
        local_time: local_time_at(now, raw.timezone)?,
        temperature: format_temperature(raw.main.temp, unit),
        feels_like: format_temperature(raw.main.feels_like, unit),
        humidity: format!("{}%", raw.main.humidity),
        pressure: format!("{} hPa", raw.main.pressure),
        wind_speed: format!("{} {}", raw.wind.speed, unit.speed_unit()),
        wind_direction: format!("{}°", raw.wind.deg),
        visibility: format_visibility(raw.visibility),
        cloudiness: format!("{}%", raw.cloudiness()),
        sunrise: clock_in_zone(raw.sys.sunrise, now.offset())?,
        icon: glyph_for(&condition.icon),
        backdrop: Backdrop::for_conditions(&condition.main, raw.main.temp, unit),
    })
}
