use chrono::NaiveDate;

use crate::error::DatabaseError;
use crate::schedule::{Activity, FixedBlock, GeneratedBlock, Profile};

/// Where the generator reads a user's profile from.
pub trait ProfileSource {
    /// `Ok(None)` when the user has no profile.
    fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DatabaseError>;
}

/// The global activity catalog. Not user-scoped.
pub trait ActivityCatalog {
    fn list_activities(&self) -> Result<Vec<Activity>, DatabaseError>;
}

/// A user's recurring fixed blocks, all weekdays.
pub trait FixedBlockSource {
    fn list_fixed_blocks(&self, user_id: &str) -> Result<Vec<FixedBlock>, DatabaseError>;
}

/// Destination for generated blocks.
pub trait GeneratedBlockSink {
    /// Append blocks as-is. Returns the number written.
    fn insert_generated_blocks(&self, blocks: &[GeneratedBlock]) -> Result<usize, DatabaseError>;

    /// Drop the user's blocks dated `from..=to`, then write `blocks`, atomically.
    /// Returns the number written.
    fn replace_generated_blocks(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        blocks: &[GeneratedBlock],
    ) -> Result<usize, DatabaseError>;
}

/// Everything one generation run reads from and writes to.
pub trait ScheduleStore: ProfileSource + ActivityCatalog + FixedBlockSource + GeneratedBlockSink {}

impl<T> ScheduleStore for T where
    T: ProfileSource + ActivityCatalog + FixedBlockSource + GeneratedBlockSink
{
}
