//! Core error types for weekplan-core.
//!
//! Pipeline stages report malformed input through [`ValidationError`];
//! everything that touches the store or the config file has its own
//! error type, and [`CoreError`] ties them together for callers.

use std::path::PathBuf;
use thiserror::Error;

use crate::schedule::{DayOfWeek, GeneratedBlock};

/// Core error type for weekplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No profile is stored for the user the run was requested for.
    #[error("No profile found for user '{user_id}'")]
    MissingProfile { user_id: String },

    /// The schedule was computed but the sink rejected the write.
    ///
    /// The computed blocks travel with the error so the caller can retry
    /// the write without recomputing.
    #[error("Failed to persist {count} generated blocks: {source}", count = .blocks.len())]
    Persistence {
        blocks: Vec<GeneratedBlock>,
        #[source]
        source: DatabaseError,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded into a domain value
    #[error("Corrupt value in column {column}: {message}")]
    CorruptRow { column: usize, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be prepared
    #[error("Cannot prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange { start: String, end: String },

    /// Activity with a non-positive duration
    #[error("Activity '{activity_id}' has invalid duration {minutes} min (must be positive)")]
    InvalidDuration { activity_id: String, minutes: i64 },

    /// Gap whose end is not after its start
    #[error("Invalid gap: end ({end}) must be greater than start ({start})")]
    InvalidGap { start: i64, end: i64 },

    /// Awake window that is empty or leaves the day
    #[error("Invalid awake window {start}..{end}: {message}")]
    InvalidWindow {
        start: i64,
        end: i64,
        message: String,
    },

    /// Two fixed blocks on the same day overlap
    #[error("Fixed blocks '{first}' and '{second}' overlap on {day}")]
    OverlappingFixedBlocks {
        day: DayOfWeek,
        first: String,
        second: String,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked
                    || err.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            rusqlite::Error::FromSqlConversionFailure(column, _, source) => DatabaseError::CorruptRow {
                column: *column,
                message: source.to_string(),
            },
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
