//! Schedule types: profiles, the activity catalog, fixed blocks and the
//! generated blocks the planner emits.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timeline::clock;

/// How physically demanding a user can handle, or an activity requires.
///
/// Ordered from least to most demanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalLevel {
    Sedentary,
    Active,
    Athlete,
}

/// How much of their free time a user wants filled.
///
/// Stored with the profile; the planner does not read it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityIntensity {
    Low,
    Medium,
    High,
}

/// Intensity tag carried by an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityLevel {
    Low,
    Medium,
    High,
}

/// Day of the week a fixed block recurs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(ValidationError::invalid_value(
                        stringify!($ty),
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

string_enum!(PhysicalLevel {
    Sedentary => "sedentary",
    Active => "active",
    Athlete => "athlete",
});

string_enum!(AvailabilityIntensity {
    Low => "low",
    Medium => "medium",
    High => "high",
});

string_enum!(IntensityLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
});

string_enum!(DayOfWeek {
    Monday => "monday",
    Tuesday => "tuesday",
    Wednesday => "wednesday",
    Thursday => "thursday",
    Friday => "friday",
    Saturday => "saturday",
    Sunday => "sunday",
});

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn to_weekday(self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        DayOfWeek::ALL[weekday.num_days_from_monday() as usize]
    }
}

/// A user's scheduling preferences. One per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub physical_level: PhysicalLevel,
    pub availability_intensity: AvailabilityIntensity,
}

/// A reusable activity template from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub duration_minutes: i64,
    pub intensity_level: IntensityLevel,
    pub required_physical_level: PhysicalLevel,
    pub category: String,
}

impl Activity {
    /// # Errors
    /// Returns an error if the duration is not positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_minutes <= 0 {
            return Err(ValidationError::InvalidDuration {
                activity_id: self.id.clone(),
                minutes: self.duration_minutes,
            });
        }
        Ok(())
    }
}

/// A recurring, immovable weekly commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedBlock {
    pub id: String,
    pub user_id: String,
    pub day_of_week: DayOfWeek,
    #[serde(with = "clock::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "clock::hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub label: Option<String>,
}

impl FixedBlock {
    pub fn start_minute(&self) -> i64 {
        clock::minute_of_day(self.start_time)
    }

    pub fn end_minute(&self) -> i64 {
        clock::minute_of_day(self.end_time)
    }

    /// # Errors
    /// Returns an error unless the block starts before it ends on the same day.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_minute() >= self.end_minute() {
            return Err(ValidationError::InvalidTimeRange {
                start: clock::format_clock(self.start_time),
                end: clock::format_clock(self.end_time),
            });
        }
        Ok(())
    }

    /// Name used in messages: the label when present, else the id.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Lifecycle state of a generated block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    Scheduled,
}

string_enum!(BlockStatus {
    Scheduled => "scheduled",
});

/// One placed activity instance on a concrete date.
///
/// Times serialize as `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedBlock {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub activity_id: String,
    pub status: BlockStatus,
}

impl GeneratedBlock {
    /// Create a scheduled block with a fresh id.
    pub fn new(
        user_id: String,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        activity_id: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            date,
            start_time,
            end_time,
            activity_id,
            status: BlockStatus::Scheduled,
        }
    }

    /// Get total duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        clock::minute_of_day(self.end_time) - clock::minute_of_day(self.start_time)
    }
}
