//! Free-interval detection inside a day's awake window.
//!
//! Gaps are the complement of the day's fixed blocks within the window,
//! computed in minutes from midnight.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schedule::FixedBlock;
use crate::timeline::clock::MINUTES_PER_DAY;

/// A free interval `[start, end)` in minutes from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub start: i64,
    pub end: i64,
}

impl Gap {
    /// Create a new gap.
    ///
    /// # Errors
    /// Returns an error unless `end > start`.
    pub fn new(start: i64, end: i64) -> Result<Self, ValidationError> {
        let gap = Self { start, end };
        gap.validate()?;
        Ok(gap)
    }

    /// # Errors
    /// Returns an error unless `end > start`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end <= self.start {
            return Err(ValidationError::InvalidGap {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.end - self.start
    }
}

/// Finds gaps for a fixed awake window.
#[derive(Debug, Clone, Copy)]
pub struct GapFinder {
    window_start: i64,
    window_end: i64,
}

impl GapFinder {
    /// # Errors
    /// Returns an error if the window is empty or does not fit in one day.
    pub fn new(window_start: i64, window_end: i64) -> Result<Self, ValidationError> {
        let invalid = |message: &str| ValidationError::InvalidWindow {
            start: window_start,
            end: window_end,
            message: message.to_string(),
        };
        if window_start < 0 || window_end >= MINUTES_PER_DAY {
            return Err(invalid("window must lie within a single day"));
        }
        if window_start >= window_end {
            return Err(invalid("window start must be before window end"));
        }
        Ok(Self {
            window_start,
            window_end,
        })
    }

    pub fn window(&self) -> (i64, i64) {
        (self.window_start, self.window_end)
    }

    /// Find the free intervals of one day, ordered by start.
    ///
    /// Blocks are clamped to the window; blocks wholly outside it are
    /// ignored. Overlapping blocks are rejected rather than merged.
    ///
    /// # Errors
    /// Returns an error if a block is malformed or two blocks overlap.
    pub fn find_gaps(&self, fixed_blocks: &[FixedBlock]) -> Result<Vec<Gap>, ValidationError> {
        let mut sorted: Vec<&FixedBlock> = fixed_blocks.iter().collect();
        sorted.sort_by_key(|b| (b.start_minute(), b.end_minute()));

        let mut previous: Option<&FixedBlock> = None;
        for block in &sorted {
            block.validate()?;
            if let Some(prev) = previous {
                if block.start_minute() < prev.end_minute() {
                    return Err(ValidationError::OverlappingFixedBlocks {
                        day: block.day_of_week,
                        first: prev.display_name().to_string(),
                        second: block.display_name().to_string(),
                    });
                }
            }
            previous = Some(block);
        }

        let mut gaps = Vec::new();
        let mut cursor = self.window_start;

        for block in sorted {
            let start = block.start_minute().max(self.window_start);
            let end = block.end_minute().min(self.window_end);
            if start >= end {
                // Entirely outside the window
                continue;
            }

            if start > cursor {
                gaps.push(Gap { start: cursor, end: start });
            }
            cursor = cursor.max(end);
        }

        if cursor < self.window_end {
            gaps.push(Gap {
                start: cursor,
                end: self.window_end,
            });
        }

        Ok(gaps)
    }
}

/// Convenience function: gaps for one day's fixed blocks within a window.
///
/// # Errors
/// See [`GapFinder::new`] and [`GapFinder::find_gaps`].
pub fn find_gaps(
    fixed_blocks_for_day: &[FixedBlock],
    window_start: i64,
    window_end: i64,
) -> Result<Vec<Gap>, ValidationError> {
    GapFinder::new(window_start, window_end)?.find_gaps(fixed_blocks_for_day)
}
