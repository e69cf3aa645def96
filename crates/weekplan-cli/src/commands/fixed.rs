//! Fixed block commands.

use chrono::NaiveTime;
use clap::Subcommand;
use uuid::Uuid;
use weekplan_core::{DayOfWeek, FixedBlock, ScheduleDb};

use super::parse_time;

#[derive(Subcommand)]
pub enum FixedAction {
    /// Add a recurring fixed block
    Add {
        /// User ID
        user: String,
        /// Day of the week, e.g. "monday"
        #[arg(long)]
        day: DayOfWeek,
        /// Start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// End time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// Display label
        #[arg(long)]
        label: Option<String>,
    },
    /// List a user's fixed blocks
    List {
        /// User ID
        user: String,
    },
    /// Remove a fixed block
    Remove {
        /// Fixed block ID
        id: String,
    },
}

pub fn run(action: FixedAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ScheduleDb::open()?;

    match action {
        FixedAction::Add {
            user,
            day,
            start,
            end,
            label,
        } => {
            let block = FixedBlock {
                id: Uuid::new_v4().to_string(),
                user_id: user,
                day_of_week: day,
                start_time: start,
                end_time: end,
                label,
            };
            block.validate()?;
            db.create_fixed_block(&block)?;
            println!("Fixed block created: {}", block.id);
            println!("{}", serde_json::to_string_pretty(&block)?);
        }
        FixedAction::List { user } => {
            let blocks = db.list_fixed_blocks(&user)?;
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        FixedAction::Remove { id } => {
            if !db.delete_fixed_block(&id)? {
                return Err(format!("fixed block not found: {id}").into());
            }
            println!("Fixed block removed: {id}");
        }
    }
    Ok(())
}
