//! Activity catalog commands.

use clap::Subcommand;
use uuid::Uuid;
use weekplan_core::{Activity, IntensityLevel, PhysicalLevel, ScheduleDb};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Add an activity to the catalog
    Add {
        /// Activity name
        name: String,
        /// Duration in minutes
        #[arg(long)]
        duration: i64,
        /// Intensity: low, medium or high
        #[arg(long, default_value = "medium")]
        intensity: IntensityLevel,
        /// Minimum physical level: sedentary, active or athlete
        #[arg(long, default_value = "sedentary")]
        requires: PhysicalLevel,
        /// Free-form category
        #[arg(long, default_value = "")]
        category: String,
        /// Explicit ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },
    /// List the catalog
    List,
    /// Show one activity
    Show {
        /// Activity ID
        id: String,
    },
    /// Remove an activity
    Remove {
        /// Activity ID
        id: String,
    },
}

pub fn run(action: ActivityAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ScheduleDb::open()?;

    match action {
        ActivityAction::Add {
            name,
            duration,
            intensity,
            requires,
            category,
            id,
        } => {
            let activity = Activity {
                id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                name,
                duration_minutes: duration,
                intensity_level: intensity,
                required_physical_level: requires,
                category,
            };
            activity.validate()?;
            db.create_activity(&activity)?;
            println!("Activity created: {}", activity.id);
            println!("{}", serde_json::to_string_pretty(&activity)?);
        }
        ActivityAction::List => {
            let activities = db.list_activities()?;
            println!("{}", serde_json::to_string_pretty(&activities)?);
        }
        ActivityAction::Show { id } => match db.get_activity(&id)? {
            Some(activity) => println!("{}", serde_json::to_string_pretty(&activity)?),
            None => return Err(format!("activity not found: {id}").into()),
        },
        ActivityAction::Remove { id } => {
            if !db.delete_activity(&id)? {
                return Err(format!("activity not found: {id}").into());
            }
            println!("Activity removed: {id}");
        }
    }
    Ok(())
}
