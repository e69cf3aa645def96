//! Wall-clock helpers.
//!
//! The pipeline works in whole minutes from midnight; these functions move
//! between that representation and `NaiveTime`. There is no timezone or DST
//! handling anywhere: every time is local wall-clock.

use chrono::{NaiveTime, Timelike};

use crate::error::ValidationError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Minutes elapsed since midnight, seconds truncated.
pub fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

/// Convert a minute offset back to a wall-clock time with zero seconds.
///
/// # Errors
/// Returns an error if `minutes` is outside `0..1440`.
pub fn time_from_minutes(minutes: i64) -> Result<NaiveTime, ValidationError> {
    if !(0..MINUTES_PER_DAY).contains(&minutes) {
        return Err(ValidationError::invalid_value(
            "time",
            format!("{minutes} minutes is outside a single day"),
        ));
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0).ok_or_else(|| {
        ValidationError::invalid_value("time", format!("{minutes} minutes is not a valid time"))
    })
}

/// Parse `HH:MM` or `HH:MM:SS`.
///
/// # Errors
/// Returns an error if the string matches neither format.
pub fn parse_clock(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| ValidationError::invalid_value("time", format!("'{value}' is not HH:MM")))
}

/// Format as `HH:MM`.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter storing a `NaiveTime` as `HH:MM` and accepting `HH:MM:SS`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock(&raw).map_err(serde::de::Error::custom)
    }
}
