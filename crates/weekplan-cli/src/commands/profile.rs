//! User profile commands.

use clap::Subcommand;
use weekplan_core::{AvailabilityIntensity, PhysicalLevel, Profile, ScheduleDb};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create or update a user's profile
    Set {
        /// User ID
        user: String,
        /// Physical level: sedentary, active or athlete
        #[arg(long)]
        level: PhysicalLevel,
        /// How much free time to fill: low, medium or high
        #[arg(long, default_value = "medium")]
        availability: AvailabilityIntensity,
    },
    /// Show a user's profile
    Show {
        /// User ID
        user: String,
    },
    /// List all profiles
    List,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ScheduleDb::open()?;

    match action {
        ProfileAction::Set {
            user,
            level,
            availability,
        } => {
            let profile = Profile {
                user_id: user,
                physical_level: level,
                availability_intensity: availability,
            };
            db.upsert_profile(&profile)?;
            println!("Profile saved: {}", profile.user_id);
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Show { user } => match db.get_profile(&user)? {
            Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
            None => return Err(format!("no profile for user '{user}'").into()),
        },
        ProfileAction::List => {
            let profiles = db.list_profiles()?;
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        }
    }
    Ok(())
}
