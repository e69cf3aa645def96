//! Profile-based eligibility for catalog activities.

use crate::schedule::{Activity, PhysicalLevel, Profile};

/// Whether a profile at `level` may be given an activity requiring `required`.
///
/// Athlete-only activities need an athlete, active ones need at least an
/// active profile, sedentary ones are open to everybody.
pub fn is_eligible(required: PhysicalLevel, level: PhysicalLevel) -> bool {
    match required {
        PhysicalLevel::Athlete => level == PhysicalLevel::Athlete,
        PhysicalLevel::Active => level != PhysicalLevel::Sedentary,
        PhysicalLevel::Sedentary => true,
    }
}

/// Narrow the catalog to activities the profile may be given.
///
/// Only the physical level gates eligibility; catalog order is preserved.
pub fn filter_eligible(activities: &[Activity], profile: &Profile) -> Vec<Activity> {
    activities
        .iter()
        .filter(|a| is_eligible(a.required_physical_level, profile.physical_level))
        .cloned()
        .collect()
}
