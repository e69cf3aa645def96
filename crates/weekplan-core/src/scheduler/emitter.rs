//! Conversion of placements into generated schedule records.

use chrono::NaiveDate;

use super::packer::PlacedActivity;
use crate::error::ValidationError;
use crate::schedule::GeneratedBlock;
use crate::timeline::clock::time_from_minutes;

/// Map a day's placements to `scheduled` blocks on `date`, one per placement.
///
/// # Errors
/// Returns an error if a placement's offsets do not fall within one day.
pub fn emit(
    user_id: &str,
    date: NaiveDate,
    placements: &[PlacedActivity],
) -> Result<Vec<GeneratedBlock>, ValidationError> {
    placements
        .iter()
        .map(|p| {
            Ok(GeneratedBlock::new(
                user_id.to_string(),
                date,
                time_from_minutes(p.start)?,
                time_from_minutes(p.end)?,
                p.activity.id.clone(),
            ))
        })
        .collect()
}
