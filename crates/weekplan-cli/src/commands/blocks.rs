//! Generated block commands.

use chrono::NaiveDate;
use clap::Subcommand;
use weekplan_core::ScheduleDb;

use super::parse_date;

#[derive(Subcommand)]
pub enum BlocksAction {
    /// List a user's generated blocks
    List {
        /// User ID
        user: String,
        /// First date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Last date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
    },
    /// Delete a user's generated blocks
    Clear {
        /// User ID
        user: String,
        /// First date to delete (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Last date to delete (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
    },
}

pub fn run(action: BlocksAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ScheduleDb::open()?;

    match action {
        BlocksAction::List { user, from, to } => {
            let blocks = db.list_generated_blocks(&user, from, to)?;
            println!("{}", serde_json::to_string_pretty(&blocks)?);
        }
        BlocksAction::Clear { user, from, to } => {
            let removed = db.delete_generated_blocks(&user, from, to)?;
            println!("{removed} blocks removed");
        }
    }
    Ok(())
}
