//! Configuration commands.
//!
//! Keys live under `[scheduler]` in `config.toml`:
//! - `awake_start` / `awake_end`: the daily window activities are placed in (`HH:MM`)
//! - `min_slot_minutes`: smallest leftover the packer still tries to fill
//! - `buffer_minutes`: rest inserted after each placed activity
//! - `week_start`: weekday a generated week starts on, or `none`
//! - `mode`: `append` keeps stored blocks, `replace` overwrites the week
//! - `seed`: fixed random seed, or `none` for a fresh schedule every run

use clap::Subcommand;
use weekplan_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value, e.g. `scheduler.buffer_minutes`
    Get {
        /// Dot-separated key such as "scheduler.mode"
        key: String,
    },
    /// Change one value; rejected if the scheduler settings become invalid
    Set {
        /// Dot-separated key such as "scheduler.awake_start"
        key: String,
        /// New value; "none" clears `scheduler.seed`
        value: String,
    },
    /// Print every key as `key = value`
    List,
    /// Overwrite config.toml with the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => {
            for (key, value) in Config::load()?.entries() {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
