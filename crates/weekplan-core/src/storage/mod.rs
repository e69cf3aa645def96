mod config;
pub mod migrations;
pub mod schedule_db;
mod traits;

pub use config::{Config, SchedulerSection};
pub use schedule_db::ScheduleDb;
pub use traits::{ActivityCatalog, FixedBlockSource, GeneratedBlockSink, ProfileSource, ScheduleStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/weekplan[-dev]/` based on WEEKPLAN_ENV.
///
/// Set WEEKPLAN_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WEEKPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("weekplan-dev")
    } else {
        base_dir.join("weekplan")
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
