//! # Weekplan Core Library
//!
//! This library provides the planning logic for Weekplan, a generator that
//! fills a user's free time with activities from a shared catalog. All
//! operations are available via the standalone `weekplan` CLI, which is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Eligibility**: Narrows the catalog to what a profile's physical level allows
//! - **Timeline**: Minute-of-day arithmetic and free-gap detection around fixed blocks
//! - **Scheduler**: Greedy gap packing and the week-long generation run
//! - **Storage**: SQLite persistence and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ScheduleGenerator`]: Plans and persists a week for one user
//! - [`ScheduleDb`]: Profiles, activities, fixed blocks and generated blocks
//! - [`Config`]: Application configuration management
//! - [`ScheduleStore`]: The collaborators a generation run needs

pub mod eligibility;
pub mod error;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use eligibility::{filter_eligible, is_eligible};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use schedule::{
    Activity, AvailabilityIntensity, BlockStatus, DayOfWeek, FixedBlock, GeneratedBlock,
    IntensityLevel, PhysicalLevel, Profile,
};
pub use scheduler::{
    emit, DayPlan, GenerationMode, PlacedActivity, RandomSource, ScheduleGenerator,
    SchedulerConfig, SeededRandom, SlotPacker, WeekPlan, HORIZON_DAYS,
};
pub use storage::{
    ActivityCatalog, Config, FixedBlockSource, GeneratedBlockSink, ProfileSource, ScheduleDb,
    ScheduleStore,
};
pub use timeline::{find_gaps, Gap, GapFinder};
