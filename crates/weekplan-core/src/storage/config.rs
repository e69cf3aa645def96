//! TOML-based application configuration.
//!
//! Stores the planner defaults: the awake window, minimum slot, buffer,
//! horizon alignment, generation mode and an optional fixed seed.
//!
//! Configuration is stored at `~/.config/weekplan/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::schedule::DayOfWeek;
use crate::scheduler::{GenerationMode, SchedulerConfig};
use crate::timeline::clock;

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerSection {
    /// Start of the awake window, `HH:MM`.
    #[serde(default = "default_awake_start")]
    pub awake_start: String,
    /// End of the awake window, `HH:MM`.
    #[serde(default = "default_awake_end")]
    pub awake_end: String,
    #[serde(default = "default_min_slot_minutes")]
    pub min_slot_minutes: i64,
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: i64,
    /// Weekday the horizon starts on, or `"none"` to start on the given date.
    #[serde(default = "default_week_start")]
    pub week_start: String,
    #[serde(default)]
    pub mode: GenerationMode,
    /// Fixed seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/weekplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerSection,
}

// Default functions
fn default_awake_start() -> String {
    "08:00".into()
}
fn default_awake_end() -> String {
    "22:00".into()
}
fn default_min_slot_minutes() -> i64 {
    30
}
fn default_buffer_minutes() -> i64 {
    15
}
fn default_week_start() -> String {
    "monday".into()
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            awake_start: default_awake_start(),
            awake_end: default_awake_end(),
            min_slot_minutes: default_min_slot_minutes(),
            buffer_minutes: default_buffer_minutes(),
            week_start: default_week_start(),
            mode: GenerationMode::default(),
            seed: None,
        }
    }
}

fn invalid(key: &str, message: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(key, e))?,
                    ),
                    // "none" unsets optional values; required ones fail to deserialize
                    serde_json::Value::Number(_) | serde_json::Value::Null
                        if matches!(value, "none" | "null") =>
                    {
                        serde_json::Value::Null
                    }
                    serde_json::Value::Number(_) => {
                        let n = value.parse::<i64>().map_err(|e| invalid(key, e))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid(key, "not a single value"));
                    }
                    serde_json::Value::Null => match value {
                        "" => serde_json::Value::Null,
                        _ => match value.parse::<u64>() {
                            Ok(n) => serde_json::Value::Number(n.into()),
                            Err(_) => serde_json::Value::String(value.into()),
                        },
                    },
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be prepared.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing the defaults there when the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or the
    /// defaults cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some("none".to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Every leaf key with its current value, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if let Ok(serde_json::Value::Object(sections)) = serde_json::to_value(self) {
            for (section, fields) in sections {
                if let serde_json::Value::Object(fields) = fields {
                    for field in fields.keys() {
                        let key = format!("{section}.{field}");
                        if let Some(value) = self.get(&key) {
                            entries.push((key, value));
                        }
                    }
                }
            }
        }
        entries
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// The updated config must still produce a valid scheduler config.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(key, e))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(key, e))?;
        updated.scheduler_config()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Build the planner configuration from the `[scheduler]` section.
    ///
    /// # Errors
    /// Returns an error naming the offending key when a value does not parse
    /// or the resulting configuration is invalid.
    pub fn scheduler_config(&self) -> Result<SchedulerConfig, ConfigError> {
        let section = &self.scheduler;
        let window_start = clock::parse_clock(&section.awake_start)
            .map(clock::minute_of_day)
            .map_err(|e| invalid("scheduler.awake_start", e))?;
        let window_end = clock::parse_clock(&section.awake_end)
            .map(clock::minute_of_day)
            .map_err(|e| invalid("scheduler.awake_end", e))?;
        let week_start = match section.week_start.trim().to_ascii_lowercase().as_str() {
            "none" | "" => None,
            other => Some(
                other
                    .parse::<DayOfWeek>()
                    .map_err(|e| invalid("scheduler.week_start", e))?,
            ),
        };

        let config = SchedulerConfig {
            window_start,
            window_end,
            min_slot_minutes: section.min_slot_minutes,
            buffer_minutes: section.buffer_minutes,
            week_start,
            mode: section.mode,
        };
        config.validate().map_err(|e| invalid("scheduler", e))?;
        Ok(config)
    }
}
