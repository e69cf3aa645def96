//! Time handling for the planner.
//!
//! This module provides:
//! - Minute-of-day conversions for wall-clock times
//! - Gap detection between a day's fixed blocks

pub mod clock;
mod gap;

pub use gap::{find_gaps, Gap, GapFinder};
