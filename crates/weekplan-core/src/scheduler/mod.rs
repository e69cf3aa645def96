//! Weekly schedule generation.
//!
//! This module turns a profile, the activity catalog and a user's fixed
//! blocks into a week of generated blocks:
//! - Filters the catalog down to activities the profile is eligible for
//! - Finds each day's free gaps inside the awake window
//! - Greedily packs each gap with random eligible activities and buffers
//! - Emits the placements as `scheduled` blocks and hands them to the store

mod emitter;
mod packer;
mod random;

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::eligibility::filter_eligible;
use crate::error::{CoreError, ValidationError};
use crate::schedule::{Activity, DayOfWeek, FixedBlock, GeneratedBlock, Profile};
use crate::storage::ScheduleStore;
use crate::timeline::{Gap, GapFinder};

pub use emitter::emit;
pub use packer::{PlacedActivity, SlotPacker};
pub use random::{RandomSource, SeededRandom};

/// Number of days in one generation horizon.
pub const HORIZON_DAYS: i64 = 7;

/// What to do with blocks already stored for the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Insert alongside whatever is stored; repeated runs duplicate.
    #[default]
    Append,
    /// Remove the user's blocks inside the horizon first.
    Replace,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GenerationMode::Append => "append",
            GenerationMode::Replace => "replace",
        })
    }
}

impl FromStr for GenerationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(GenerationMode::Append),
            "replace" => Ok(GenerationMode::Replace),
            other => Err(ValidationError::InvalidValue {
                field: "mode".to_string(),
                message: format!("expected 'append' or 'replace', got '{other}'"),
            }),
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Start of the awake window (minutes from midnight)
    pub window_start: i64,
    /// End of the awake window (minutes from midnight)
    pub window_end: i64,
    /// Smallest remainder worth trying to fill (minutes)
    pub min_slot_minutes: i64,
    /// Rest inserted after each placed activity (minutes)
    pub buffer_minutes: i64,
    /// Weekday the horizon is aligned back to; `None` starts on the given date
    pub week_start: Option<DayOfWeek>,
    pub mode: GenerationMode,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            window_start: 8 * 60,
            window_end: 22 * 60,
            min_slot_minutes: 30,
            buffer_minutes: 15,
            week_start: Some(DayOfWeek::Monday),
            mode: GenerationMode::Append,
        }
    }
}

impl SchedulerConfig {
    /// # Errors
    /// Returns an error for an invalid window, a minimum slot below one
    /// minute or a negative buffer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        GapFinder::new(self.window_start, self.window_end)?;
        if self.min_slot_minutes < 1 {
            return Err(ValidationError::InvalidValue {
                field: "min_slot_minutes".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.buffer_minutes < 0 {
            return Err(ValidationError::InvalidValue {
                field: "buffer_minutes".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// One day of the computed plan, before emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub day_of_week: DayOfWeek,
    pub gaps: Vec<Gap>,
    pub placements: Vec<PlacedActivity>,
}

impl DayPlan {
    /// Total free time inside the awake window.
    pub fn free_minutes(&self) -> i64 {
        self.gaps.iter().map(Gap::duration_minutes).sum()
    }

    pub fn scheduled_minutes(&self) -> i64 {
        self.placements.iter().map(PlacedActivity::duration_minutes).sum()
    }

    /// Gap minutes not covered by any placement.
    ///
    /// Buffers between placements count as unfilled, as does any remainder
    /// the packer could not use.
    pub fn unfilled_minutes(&self) -> i64 {
        self.free_minutes() - self.scheduled_minutes()
    }
}

/// The computed plan for a whole horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekPlan {
    pub user_id: String,
    pub start_date: NaiveDate,
    pub days: Vec<DayPlan>,
}

impl WeekPlan {
    /// Last date of the horizon, inclusive.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(HORIZON_DAYS - 1)
    }

    /// Emit every day's placements as generated blocks, in day order.
    ///
    /// # Errors
    /// Returns an error if a placement cannot be expressed as wall-clock time.
    pub fn to_blocks(&self) -> Result<Vec<GeneratedBlock>, ValidationError> {
        let mut blocks = Vec::new();
        for day in &self.days {
            blocks.extend(emit(&self.user_id, day.date, &day.placements)?);
        }
        Ok(blocks)
    }
}

/// Generates a week of activity blocks around a user's fixed commitments.
pub struct ScheduleGenerator {
    config: SchedulerConfig,
}

impl ScheduleGenerator {
    /// Create a new generator with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// First day of the horizon containing `start_date`.
    ///
    /// Moves back to the configured week start, or keeps the date when no
    /// week start is configured.
    pub fn horizon_start(&self, start_date: NaiveDate) -> NaiveDate {
        match self.config.week_start {
            Some(week_start) => {
                let current = start_date.weekday().num_days_from_monday();
                let anchor = week_start.to_weekday().num_days_from_monday();
                let back = (current + 7 - anchor) % 7;
                start_date - Duration::days(i64::from(back))
            }
            None => start_date,
        }
    }

    /// Compute a week plan from already-loaded inputs. Touches no store.
    ///
    /// # Errors
    /// Returns an error for invalid configuration, a catalog activity with a
    /// non-positive duration, or malformed or overlapping fixed blocks.
    pub fn plan_week(
        &self,
        profile: &Profile,
        activities: &[Activity],
        fixed_blocks: &[FixedBlock],
        start_date: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> Result<WeekPlan, ValidationError> {
        self.config.validate()?;
        for activity in activities {
            activity.validate()?;
        }
        for block in fixed_blocks {
            block.validate()?;
        }

        let eligible = filter_eligible(activities, profile);
        let finder = GapFinder::new(self.config.window_start, self.config.window_end)?;
        let packer = SlotPacker::new(self.config.min_slot_minutes, self.config.buffer_minutes);
        let first_day = self.horizon_start(start_date);

        tracing::debug!(
            user_id = %profile.user_id,
            catalog = activities.len(),
            eligible = eligible.len(),
            start = %first_day,
            "planning week"
        );

        let mut days = Vec::with_capacity(HORIZON_DAYS as usize);
        for offset in 0..HORIZON_DAYS {
            let date = first_day + Duration::days(offset);
            let day_of_week = DayOfWeek::from(date.weekday());
            let day_blocks: Vec<FixedBlock> = fixed_blocks
                .iter()
                .filter(|b| b.day_of_week == day_of_week)
                .cloned()
                .collect();

            let gaps = finder.find_gaps(&day_blocks)?;
            let mut placements = Vec::new();
            for gap in &gaps {
                placements.extend(packer.pack(*gap, &eligible, rng)?);
            }

            tracing::debug!(
                %date,
                day = %day_of_week,
                fixed = day_blocks.len(),
                gaps = gaps.len(),
                placed = placements.len(),
                "planned day"
            );

            days.push(DayPlan {
                date,
                day_of_week,
                gaps,
                placements,
            });
        }

        Ok(WeekPlan {
            user_id: profile.user_id.clone(),
            start_date: first_day,
            days,
        })
    }

    /// Load inputs for `user_id`, plan the week containing `start_date`,
    /// and persist the result according to the configured mode.
    ///
    /// # Errors
    /// - [`CoreError::MissingProfile`] when the user has no profile
    /// - [`CoreError::Validation`] for malformed catalog or fixed-block data
    /// - [`CoreError::Database`] when loading inputs fails
    /// - [`CoreError::Persistence`] when the write fails; it carries the blocks
    pub fn generate_schedule<S: ScheduleStore + ?Sized>(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        store: &S,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<GeneratedBlock>, CoreError> {
        let profile = store
            .get_profile(user_id)?
            .ok_or_else(|| CoreError::MissingProfile {
                user_id: user_id.to_string(),
            })?;
        let activities = store.list_activities()?;
        let fixed_blocks = store.list_fixed_blocks(user_id)?;

        let plan = self.plan_week(&profile, &activities, &fixed_blocks, start_date, rng)?;
        let blocks = plan.to_blocks()?;

        let written = match self.config.mode {
            GenerationMode::Append => store.insert_generated_blocks(&blocks),
            GenerationMode::Replace => {
                store.replace_generated_blocks(user_id, plan.start_date, plan.end_date(), &blocks)
            }
        };

        match written {
            Ok(count) => {
                tracing::info!(
                    user_id,
                    start = %plan.start_date,
                    mode = %self.config.mode,
                    blocks = count,
                    "generated schedule"
                );
                Ok(blocks)
            }
            Err(source) => {
                tracing::warn!(
                    user_id,
                    blocks = blocks.len(),
                    error = %source,
                    "failed to persist generated schedule"
                );
                Err(CoreError::Persistence { blocks, source })
            }
        }
    }
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{AvailabilityIntensity, IntensityLevel, PhysicalLevel};
    use crate::timeline::clock::parse_clock;

    fn profile(level: PhysicalLevel) -> Profile {
        Profile {
            user_id: "u1".to_string(),
            physical_level: level,
            availability_intensity: AvailabilityIntensity::High,
        }
    }

    fn activity(id: &str, minutes: i64, required: PhysicalLevel) -> Activity {
        Activity {
            id: id.to_string(),
            name: id.to_string(),
            duration_minutes: minutes,
            intensity_level: IntensityLevel::Medium,
            required_physical_level: required,
            category: "test".to_string(),
        }
    }

    fn fixed(id: &str, day: DayOfWeek, start: &str, end: &str) -> FixedBlock {
        FixedBlock {
            id: id.to_string(),
            user_id: "u1".to_string(),
            day_of_week: day,
            start_time: parse_clock(start).unwrap(),
            end_time: parse_clock(end).unwrap(),
            label: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn horizon_aligns_back_to_monday_by_default() {
        let generator = ScheduleGenerator::new();
        // 2026-10-21 is a Wednesday
        assert_eq!(generator.horizon_start(date(2026, 10, 21)), date(2026, 10, 19));
        assert_eq!(generator.horizon_start(date(2026, 10, 19)), date(2026, 10, 19));
        assert_eq!(generator.horizon_start(date(2026, 10, 25)), date(2026, 10, 19));
    }

    #[test]
    fn horizon_alignment_is_configurable() {
        let generator = ScheduleGenerator::with_config(SchedulerConfig {
            week_start: Some(DayOfWeek::Sunday),
            ..SchedulerConfig::default()
        });
        assert_eq!(generator.horizon_start(date(2026, 10, 21)), date(2026, 10, 18));

        let generator = ScheduleGenerator::with_config(SchedulerConfig {
            week_start: None,
            ..SchedulerConfig::default()
        });
        assert_eq!(generator.horizon_start(date(2026, 10, 21)), date(2026, 10, 21));
    }

    #[test]
    fn plans_seven_consecutive_days() {
        let generator = ScheduleGenerator::new();
        let plan = generator
            .plan_week(
                &profile(PhysicalLevel::Active),
                &[activity("walk", 45, PhysicalLevel::Sedentary)],
                &[],
                date(2026, 10, 21),
                &mut SeededRandom::from_seed(1),
            )
            .unwrap();

        assert_eq!(plan.days.len(), 7);
        assert_eq!(plan.start_date, date(2026, 10, 19));
        assert_eq!(plan.end_date(), date(2026, 10, 25));
        assert_eq!(plan.days[0].day_of_week, DayOfWeek::Monday);
        assert_eq!(plan.days[6].day_of_week, DayOfWeek::Sunday);
        for day in &plan.days {
            assert_eq!(day.free_minutes(), 840);
            assert!(day.scheduled_minutes() > 0);
        }
    }

    #[test]
    fn fixed_blocks_apply_only_to_their_weekday() {
        let generator = ScheduleGenerator::new();
        let blocks = vec![fixed("work", DayOfWeek::Tuesday, "09:00", "17:00")];
        let plan = generator
            .plan_week(
                &profile(PhysicalLevel::Athlete),
                &[activity("row", 60, PhysicalLevel::Athlete)],
                &blocks,
                date(2026, 10, 19),
                &mut SeededRandom::from_seed(8),
            )
            .unwrap();

        let tuesday = &plan.days[1];
        assert_eq!(tuesday.day_of_week, DayOfWeek::Tuesday);
        assert_eq!(
            tuesday.gaps,
            vec![Gap { start: 480, end: 540 }, Gap { start: 1020, end: 1320 }]
        );
        for p in &tuesday.placements {
            assert!(p.end <= 540 || p.start >= 1020);
        }
        assert_eq!(plan.days[2].gaps, vec![Gap { start: 480, end: 1320 }]);
    }

    #[test]
    fn unfilled_minutes_count_buffers_and_remainders() {
        let generator = ScheduleGenerator::new();
        // Monday 08:00-09:40 is the only free time: a 100 minute gap
        let blocks = vec![fixed("rest", DayOfWeek::Monday, "09:40", "22:00")];
        let plan = generator
            .plan_week(
                &profile(PhysicalLevel::Active),
                &[activity("forty", 40, PhysicalLevel::Sedentary)],
                &blocks,
                date(2026, 10, 19),
                &mut SeededRandom::from_seed(3),
            )
            .unwrap();

        let monday = &plan.days[0];
        assert_eq!(monday.free_minutes(), 100);
        assert_eq!(monday.scheduled_minutes(), 80);
        // 15 minute buffer plus 5 minute remainder
        assert_eq!(monday.unfilled_minutes(), 20);

        let tuesday = &plan.days[1];
        assert_eq!(
            tuesday.unfilled_minutes(),
            tuesday.free_minutes() - tuesday.scheduled_minutes()
        );
    }

    #[test]
    fn ineligible_catalog_leaves_week_empty() {
        let generator = ScheduleGenerator::new();
        let plan = generator
            .plan_week(
                &profile(PhysicalLevel::Sedentary),
                &[activity("sprint", 30, PhysicalLevel::Athlete)],
                &[],
                date(2026, 10, 19),
                &mut SeededRandom::from_seed(2),
            )
            .unwrap();
        assert!(plan.days.iter().all(|d| d.placements.is_empty()));
        assert!(plan.to_blocks().unwrap().is_empty());
    }

    #[test]
    fn overlapping_fixed_blocks_fail_the_plan() {
        let generator = ScheduleGenerator::new();
        let blocks = vec![
            fixed("a", DayOfWeek::Friday, "09:00", "11:00"),
            fixed("b", DayOfWeek::Friday, "10:30", "12:00"),
        ];
        let err = generator
            .plan_week(
                &profile(PhysicalLevel::Active),
                &[],
                &blocks,
                date(2026, 10, 19),
                &mut SeededRandom::from_seed(2),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::OverlappingFixedBlocks { day: DayOfWeek::Friday, .. }));
    }

    #[test]
    fn invalid_catalog_duration_is_rejected_up_front() {
        let generator = ScheduleGenerator::new();
        let err = generator
            .plan_week(
                &profile(PhysicalLevel::Sedentary),
                // Not eligible, still rejected
                &[activity("broken", 0, PhysicalLevel::Athlete)],
                &[],
                date(2026, 10, 19),
                &mut SeededRandom::from_seed(2),
            )
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDuration { .. }));
    }

    #[test]
    fn config_validation() {
        assert!(SchedulerConfig::default().validate().is_ok());
        let bad_window = SchedulerConfig {
            window_start: 900,
            window_end: 600,
            ..SchedulerConfig::default()
        };
        assert!(bad_window.validate().is_err());
        let bad_slot = SchedulerConfig {
            min_slot_minutes: 0,
            ..SchedulerConfig::default()
        };
        assert!(bad_slot.validate().is_err());
        let bad_buffer = SchedulerConfig {
            buffer_minutes: -1,
            ..SchedulerConfig::default()
        };
        assert!(bad_buffer.validate().is_err());
    }

    #[test]
    fn generation_mode_parses() {
        assert_eq!("Replace".parse::<GenerationMode>().unwrap(), GenerationMode::Replace);
        assert_eq!("append".parse::<GenerationMode>().unwrap(), GenerationMode::Append);
        assert!("merge".parse::<GenerationMode>().is_err());
        assert_eq!(GenerationMode::default(), GenerationMode::Append);
    }

    #[test]
    fn same_seed_same_week() {
        let generator = ScheduleGenerator::new();
        let catalog = vec![
            activity("a", 30, PhysicalLevel::Sedentary),
            activity("b", 50, PhysicalLevel::Sedentary),
            activity("c", 75, PhysicalLevel::Active),
        ];
        let run = |seed| {
            generator
                .plan_week(
                    &profile(PhysicalLevel::Active),
                    &catalog,
                    &[],
                    date(2026, 10, 19),
                    &mut SeededRandom::from_seed(seed),
                )
                .unwrap()
                .days
                .into_iter()
                .flat_map(|d| d.placements)
                .map(|p| (p.activity.id, p.start))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(77), run(77));
    }
}
