//! Property tests for gap detection and slot packing.
//!
//! Fixed blocks are generated non-overlapping; windows and catalogs are
//! random. Every property is checked against the public API only.

use proptest::prelude::*;

use weekplan_core::timeline::clock::time_from_minutes;
use weekplan_core::{
    filter_eligible, find_gaps, Activity, AvailabilityIntensity, DayOfWeek, FixedBlock, Gap,
    IntensityLevel, PhysicalLevel, Profile, SeededRandom, SlotPacker,
};

// ============================================================================
// Strategies
// ============================================================================

/// Non-overlapping `(start, end)` pairs inside one day, in random order.
fn day_blocks() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..180, 1i64..240), 0..8)
        .prop_map(|steps| {
            let mut blocks = Vec::new();
            let mut cursor = 0;
            for (skip, len) in steps {
                let start = cursor + skip;
                let end = start + len;
                if end > 1439 {
                    break;
                }
                blocks.push((start, end));
                cursor = end;
            }
            blocks
        })
        .prop_shuffle()
}

fn window() -> impl Strategy<Value = (i64, i64)> {
    (0i64..720, 1i64..720).prop_map(|(start, len)| (start, start + len))
}

fn catalog() -> impl Strategy<Value = Vec<Activity>> {
    prop::collection::vec(
        (
            1i64..150,
            prop_oneof![
                Just(PhysicalLevel::Sedentary),
                Just(PhysicalLevel::Active),
                Just(PhysicalLevel::Athlete),
            ],
        ),
        0..6,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (minutes, required))| Activity {
                id: format!("act-{i}"),
                name: format!("Activity {i}"),
                duration_minutes: minutes,
                intensity_level: IntensityLevel::Medium,
                required_physical_level: required,
                category: "generated".to_string(),
            })
            .collect()
    })
}

fn to_fixed(blocks: &[(i64, i64)]) -> Vec<FixedBlock> {
    blocks
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| FixedBlock {
            id: format!("fb-{i}"),
            user_id: "prop".to_string(),
            day_of_week: DayOfWeek::Monday,
            start_time: time_from_minutes(start).unwrap(),
            end_time: time_from_minutes(end).unwrap(),
            label: None,
        })
        .collect()
}

fn overlap(a: (i64, i64), b: (i64, i64)) -> i64 {
    (a.1.min(b.1) - a.0.max(b.0)).max(0)
}

// ============================================================================
// Gap detection
// ============================================================================

proptest! {
    #[test]
    fn gaps_cover_exactly_the_free_time(blocks in day_blocks(), (ws, we) in window()) {
        let gaps = find_gaps(&to_fixed(&blocks), ws, we).unwrap();

        let busy: i64 = blocks.iter().map(|&b| overlap(b, (ws, we))).sum();
        let free: i64 = gaps.iter().map(Gap::duration_minutes).sum();
        prop_assert_eq!(free + busy, we - ws);

        for gap in &gaps {
            prop_assert!(gap.start >= ws && gap.end <= we);
            prop_assert!(gap.end > gap.start);
            for &block in &blocks {
                prop_assert_eq!(overlap((gap.start, gap.end), block), 0);
            }
        }
        for pair in gaps.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn gap_detection_is_order_independent(blocks in day_blocks(), (ws, we) in window()) {
        let mut sorted = blocks.clone();
        sorted.sort();
        let shuffled = find_gaps(&to_fixed(&blocks), ws, we).unwrap();
        let ordered = find_gaps(&to_fixed(&sorted), ws, we).unwrap();
        prop_assert_eq!(&shuffled, &ordered);
        prop_assert_eq!(shuffled, find_gaps(&to_fixed(&blocks), ws, we).unwrap());
    }

    // ========================================================================
    // Slot packing
    // ========================================================================

    #[test]
    fn placements_fit_their_gap(
        start in 0i64..1000,
        len in 1i64..400,
        activities in catalog(),
        min_slot in 1i64..60,
        buffer in 0i64..30,
        seed in any::<u64>(),
    ) {
        let gap = Gap::new(start, start + len).unwrap();
        let packer = SlotPacker::new(min_slot, buffer);
        let placed = packer
            .pack(gap, &activities, &mut SeededRandom::from_seed(seed))
            .unwrap();

        for p in &placed {
            prop_assert!(p.start >= gap.start && p.end <= gap.end);
            prop_assert_eq!(p.duration_minutes(), p.activity.duration_minutes);
            prop_assert!(activities.contains(&p.activity));
        }
        for pair in placed.windows(2) {
            let spacing = pair[1].start - pair[0].end;
            prop_assert!(spacing == buffer || spacing == 0);
        }
        if let Some(first) = placed.first() {
            prop_assert_eq!(first.start, gap.start);
        }
    }

    #[test]
    fn packing_stops_below_minimum_slot(
        len in 1i64..400,
        activities in catalog(),
        min_slot in 1i64..60,
        buffer in 0i64..30,
        seed in any::<u64>(),
    ) {
        let gap = Gap::new(0, len).unwrap();
        let placed = SlotPacker::new(min_slot, buffer)
            .pack(gap, &activities, &mut SeededRandom::from_seed(seed))
            .unwrap();

        let cursor = match placed.last() {
            Some(last) if gap.end - last.end >= buffer => last.end + buffer,
            Some(last) => last.end,
            None => gap.start,
        };
        let remainder = gap.end - cursor;
        let short_fits = activities
            .iter()
            .any(|a| a.duration_minutes <= remainder);
        // Whatever is left is either below the minimum or fits nothing
        prop_assert!(remainder < min_slot || !short_fits);
    }

    #[test]
    fn packing_never_picks_ineligible_activities(
        activities in catalog(),
        seed in any::<u64>(),
    ) {
        let profile = Profile {
            user_id: "prop".to_string(),
            physical_level: PhysicalLevel::Sedentary,
            availability_intensity: AvailabilityIntensity::Medium,
        };
        let eligible = filter_eligible(&activities, &profile);
        let placed = SlotPacker::new(30, 15)
            .pack(Gap::new(480, 1320).unwrap(), &eligible, &mut SeededRandom::from_seed(seed))
            .unwrap();
        for p in placed {
            prop_assert_eq!(p.activity.required_physical_level, PhysicalLevel::Sedentary);
        }
    }
}

// ============================================================================
// Worked examples
// ============================================================================

fn activity(id: &str, minutes: i64, required: PhysicalLevel) -> Activity {
    Activity {
        id: id.to_string(),
        name: id.to_string(),
        duration_minutes: minutes,
        intensity_level: IntensityLevel::Low,
        required_physical_level: required,
        category: "example".to_string(),
    }
}

#[test]
fn empty_day_is_one_gap() {
    let gaps = find_gaps(&[], 480, 1320).unwrap();
    assert_eq!(gaps, vec![Gap { start: 480, end: 1320 }]);
    assert_eq!(gaps[0].duration_minutes(), 840);
}

#[test]
fn one_fixed_block_splits_the_window() {
    let gaps = find_gaps(&to_fixed(&[(540, 600)]), 480, 1320).unwrap();
    assert_eq!(
        gaps,
        vec![Gap { start: 480, end: 540 }, Gap { start: 600, end: 1320 }]
    );
}

#[test]
fn short_gap_stays_unfilled() {
    let catalog = vec![
        activity("long-a", 45, PhysicalLevel::Sedentary),
        activity("long-b", 60, PhysicalLevel::Sedentary),
    ];
    let placed = SlotPacker::new(30, 15)
        .pack(Gap::new(600, 640).unwrap(), &catalog, &mut SeededRandom::from_seed(3))
        .unwrap();
    assert!(placed.is_empty());
}

#[test]
fn hundred_minute_gap_takes_two_forty_minute_sessions() {
    let catalog = vec![activity("forty", 40, PhysicalLevel::Sedentary)];
    let placed = SlotPacker::new(30, 15)
        .pack(Gap::new(600, 700).unwrap(), &catalog, &mut SeededRandom::from_seed(11))
        .unwrap();

    let spans: Vec<(i64, i64)> = placed.iter().map(|p| (p.start, p.end)).collect();
    assert_eq!(spans, vec![(600, 640), (655, 695)]);
}

#[test]
fn sedentary_profile_only_gets_sedentary_activities() {
    let profile = Profile {
        user_id: "u1".to_string(),
        physical_level: PhysicalLevel::Sedentary,
        availability_intensity: AvailabilityIntensity::Low,
    };
    let catalog = vec![
        activity("marathon", 240, PhysicalLevel::Athlete),
        activity("stretch", 20, PhysicalLevel::Sedentary),
    ];
    let eligible = filter_eligible(&catalog, &profile);
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].id, "stretch");
}
