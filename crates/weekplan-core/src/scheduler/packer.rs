//! Greedy packing of eligible activities into a single gap.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::error::ValidationError;
use crate::schedule::Activity;
use crate::timeline::Gap;

/// An activity placed at `[start, end)` minutes from midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedActivity {
    pub activity: Activity,
    pub start: i64,
    pub end: i64,
}

impl PlacedActivity {
    pub fn duration_minutes(&self) -> i64 {
        self.end - self.start
    }
}

/// Fills gaps with randomly chosen activities that fit, separated by buffers.
#[derive(Debug, Clone, Copy)]
pub struct SlotPacker {
    min_slot_minutes: i64,
    buffer_minutes: i64,
}

impl SlotPacker {
    pub fn new(min_slot_minutes: i64, buffer_minutes: i64) -> Self {
        Self {
            min_slot_minutes,
            buffer_minutes,
        }
    }

    /// Pack one gap.
    ///
    /// Keeps placing a uniformly chosen candidate that fits the remaining
    /// time while at least `min_slot_minutes` remain, inserting a buffer
    /// after each placement when there is room for it. Stops early when no
    /// candidate fits; the remainder stays unfilled.
    ///
    /// # Errors
    /// Returns an error if the gap is empty or inverted, or if an activity
    /// has a non-positive duration.
    pub fn pack(
        &self,
        gap: Gap,
        eligible: &[Activity],
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<PlacedActivity>, ValidationError> {
        gap.validate()?;
        for activity in eligible {
            activity.validate()?;
        }

        let mut placed = Vec::new();
        let mut cursor = gap.start;
        let mut remaining = gap.duration_minutes();

        while remaining >= self.min_slot_minutes {
            let candidates: Vec<&Activity> = eligible
                .iter()
                .filter(|a| a.duration_minutes <= remaining)
                .collect();
            if candidates.is_empty() {
                break;
            }

            let picked = candidates[rng.pick_index(candidates.len())];
            let end = cursor + picked.duration_minutes;
            placed.push(PlacedActivity {
                activity: picked.clone(),
                start: cursor,
                end,
            });
            cursor = end;
            remaining -= picked.duration_minutes;

            if remaining >= self.buffer_minutes {
                cursor += self.buffer_minutes;
                remaining -= self.buffer_minutes;
            }
        }

        tracing::trace!(
            gap_start = gap.start,
            gap_end = gap.end,
            placed = placed.len(),
            unfilled = remaining,
            "packed gap"
        );

        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::random::SeededRandom;
    use crate::schedule::{IntensityLevel, PhysicalLevel};

    /// Replays a fixed list of picks, wrapping around.
    struct ScriptedPicks {
        picks: Vec<usize>,
        next: usize,
    }

    impl RandomSource for ScriptedPicks {
        fn pick_index(&mut self, len: usize) -> usize {
            let pick = self.picks[self.next % self.picks.len()];
            self.next += 1;
            pick % len
        }
    }

    fn activity(id: &str, minutes: i64) -> Activity {
        Activity {
            id: id.to_string(),
            name: id.to_string(),
            duration_minutes: minutes,
            intensity_level: IntensityLevel::Low,
            required_physical_level: PhysicalLevel::Sedentary,
            category: "test".to_string(),
        }
    }

    fn packer() -> SlotPacker {
        SlotPacker::new(30, 15)
    }

    #[test]
    fn nothing_fits_leaves_gap_unfilled() {
        let gap = Gap::new(600, 640).unwrap();
        let eligible = vec![activity("swim", 45), activity("ride", 60)];
        let placed = packer()
            .pack(gap, &eligible, &mut SeededRandom::from_seed(1))
            .unwrap();
        assert!(placed.is_empty());
    }

    #[test]
    fn two_placements_and_one_buffer_in_hundred_minutes() {
        let gap = Gap::new(480, 580).unwrap();
        let eligible = vec![activity("walk", 40)];
        let placed = packer()
            .pack(gap, &eligible, &mut SeededRandom::from_seed(9))
            .unwrap();

        assert_eq!(placed.len(), 2);
        assert_eq!((placed[0].start, placed[0].end), (480, 520));
        assert_eq!((placed[1].start, placed[1].end), (535, 575));
        assert_eq!(gap.end - placed[1].end, 5);
    }

    #[test]
    fn gap_below_minimum_slot_is_skipped() {
        let gap = Gap::new(0, 29).unwrap();
        let eligible = vec![activity("breathe", 10)];
        let placed = packer()
            .pack(gap, &eligible, &mut SeededRandom::from_seed(3))
            .unwrap();
        assert!(placed.is_empty());
    }

    #[test]
    fn buffer_skipped_when_it_does_not_fit() {
        // 30 + 10 left after the first placement: no buffer, then loop ends
        let gap = Gap::new(0, 40).unwrap();
        let eligible = vec![activity("read", 30)];
        let placed = packer()
            .pack(gap, &eligible, &mut SeededRandom::from_seed(3))
            .unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].end, 30);
    }

    #[test]
    fn scripted_picks_choose_among_fitting_candidates() {
        let gap = Gap::new(0, 120).unwrap();
        let eligible = vec![activity("long", 90), activity("short", 30)];
        let mut rng = ScriptedPicks {
            picks: vec![0, 0],
            next: 0,
        };
        let placed = packer().pack(gap, &eligible, &mut rng).unwrap();

        // "long" first (0..90), buffer to 105, then only "short" would need 30
        // but 15 remain, so the packer stops.
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].activity.id, "long");

        let mut rng = ScriptedPicks {
            picks: vec![1],
            next: 0,
        };
        let placed = packer().pack(gap, &eligible, &mut rng).unwrap();
        let ids: Vec<&str> = placed.iter().map(|p| p.activity.id.as_str()).collect();
        // short 0..30, buffer, then only short fits the 75 left: 45..75,
        // buffer, 30 left: 90..120
        assert_eq!(ids, vec!["short", "short", "short"]);
        assert_eq!(placed.last().unwrap().end, 120);
    }

    #[test]
    fn placements_respect_durations_and_bounds() {
        let gap = Gap::new(600, 1320).unwrap();
        let eligible = vec![
            activity("a", 30),
            activity("b", 45),
            activity("c", 60),
            activity("d", 90),
        ];
        let placed = packer()
            .pack(gap, &eligible, &mut SeededRandom::from_seed(2024))
            .unwrap();

        assert!(!placed.is_empty());
        let mut last_end = gap.start;
        for p in &placed {
            assert_eq!(p.duration_minutes(), p.activity.duration_minutes);
            assert!(p.start >= last_end);
            assert!(p.end <= gap.end);
            last_end = p.end;
        }
        assert!(gap.end - last_end < 30 + 15);
    }

    #[test]
    fn rejects_malformed_input() {
        let bad_gap = Gap { start: 700, end: 650 };
        let err = packer()
            .pack(bad_gap, &[activity("a", 30)], &mut SeededRandom::from_seed(1))
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidGap { start: 700, end: 650 });

        let gap = Gap::new(0, 100).unwrap();
        let err = packer()
            .pack(gap, &[activity("neg", -10)], &mut SeededRandom::from_seed(1))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDuration { .. }));
    }

    #[test]
    fn empty_eligible_set_places_nothing() {
        let gap = Gap::new(480, 1320).unwrap();
        let placed = packer()
            .pack(gap, &[], &mut SeededRandom::from_seed(5))
            .unwrap();
        assert!(placed.is_empty());
    }
}
