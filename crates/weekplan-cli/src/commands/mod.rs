pub mod activity;
pub mod blocks;
pub mod config;
pub mod fixed;
pub mod generate;
pub mod profile;

use weekplan_core::timeline::clock;

/// Parse a `YYYY-MM-DD` argument.
pub(crate) fn parse_date(value: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{value}': {e} (expected YYYY-MM-DD)"))
}

/// Parse an `HH:MM` argument.
pub(crate) fn parse_time(value: &str) -> Result<chrono::NaiveTime, String> {
    clock::parse_clock(value).map_err(|e| e.to_string())
}
