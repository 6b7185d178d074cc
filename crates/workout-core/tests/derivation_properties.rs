use chrono::{Datelike, Days, NaiveDate};
use proptest::prelude::*;
use proptest::test_runner::Config;
use workout_core::codec::{decode, encode};
use workout_core::derive::{
    build_visible_date_range, date_key, entry_volume, progress_buckets, Granularity, WeekStart,
};
use workout_core::model::preset;
use workout_core::{
    Category, EntryDraft, ModelError, RestTimer, SessionTimer, WeightUnit, WorkoutState,
};

fn anchor_strategy() -> impl Strategy<Value = NaiveDate> {
    // 1970-01-01 .. roughly 2100
    (0_u64..47_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .expect("date in range")
    })
}

fn week_start_strategy() -> impl Strategy<Value = WeekStart> {
    prop_oneof![Just(WeekStart::Sunday), Just(WeekStart::Monday)]
}

/// (day offset within March 2024, weight in half-kilos, reps, sets)
fn entry_rows() -> impl Strategy<Value = Vec<(u64, u32, u32, u32)>> {
    prop::collection::vec((0_u64..60, 0_u32..400, 0_u32..20, 0_u32..10), 0..24)
}

fn state_with_rows(rows: &[(u64, u32, u32, u32)]) -> (WorkoutState, String) {
    let mut state = WorkoutState::default();
    let id = state.add_exercise("Squat", Category::Legs).expect("add");
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
    for &(offset, half_kilos, reps, sets) in rows {
        let day = date_key(start + Days::new(offset));
        let draft = EntryDraft {
            weight: f64::from(half_kilos) / 2.0,
            unit: WeightUnit::Kg,
            reps,
            sets,
            note: String::new(),
        };
        state.add_entry(&day, &id, draft).expect("entry");
    }
    (state, id)
}

/// Finite, non-negative weights across the whole double range.
fn weight_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        0.0_f64..1_000.0,
        0.0_f64..1e6,
        prop::num::f64::NORMAL.prop_map(f64::abs),
    ]
}

fn logged_entry() -> impl Strategy<Value = (u64, f64, bool, u32, u32, String)> {
    (
        0_u64..60,
        weight_strategy(),
        any::<bool>(),
        0_u32..50,
        0_u32..10,
        ".{0,24}",
    )
}

/// Wall-clock stamps between 2020 and 2027.
fn stamp() -> impl Strategy<Value = u64> {
    1_600_000_000_000_u64..1_800_000_000_000
}

fn session_strategy() -> impl Strategy<Value = SessionTimer> {
    (0_u64..1_000_000, any::<bool>(), stamp())
        .prop_map(|(elapsed, running, at)| SessionTimer::from_parts(elapsed, running, at))
}

fn rest_strategy() -> impl Strategy<Value = RestTimer> {
    (0_u32..120, 0_u32..70, 0_u64..7_000, any::<bool>(), stamp()).prop_map(
        |(minutes, seconds, remaining, running, at)| {
            RestTimer::from_parts(minutes, seconds, remaining, running, at)
        },
    )
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn visible_range_is_28_consecutive_days_containing_anchor(
        anchor in anchor_strategy(),
        week_start in week_start_strategy(),
    ) {
        let days = build_visible_date_range(anchor, week_start);
        prop_assert_eq!(days.len(), 28);
        prop_assert!(days.iter().any(|d| d.date == anchor));
        prop_assert_eq!(days[0].date.weekday(), week_start.weekday());
        for pair in days.windows(2) {
            prop_assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
    }

    #[test]
    fn adding_a_case_variant_name_is_rejected(name in "[A-Za-z][A-Za-z ]{0,20}") {
        let mut state = WorkoutState::default();
        state.add_exercise(&name, Category::Arms).expect("first add");
        let before = state.clone();
        let variant = format!("  {}  ", name.to_uppercase());
        prop_assert!(
            matches!(
                state.add_exercise(&variant, Category::Back),
                Err(ModelError::DuplicateName(_))
            ),
            "case variant must be rejected"
        );
        prop_assert_eq!(state, before);
    }

    #[test]
    fn zero_factor_means_zero_volume(rows in entry_rows()) {
        let (state, _) = state_with_rows(&rows);
        for entry in state.entries() {
            if entry.weight == 0.0 || entry.reps == 0 || entry.sets == 0 {
                prop_assert_eq!(entry_volume(entry), 0.0);
            }
        }
    }

    #[test]
    fn day_and_month_buckets_sum_to_total_volume(rows in entry_rows()) {
        let (state, id) = state_with_rows(&rows);
        let total: f64 = state.entries().iter().map(entry_volume).sum();
        let by_day: f64 = progress_buckets(state.entries(), &id, Granularity::Day)
            .iter()
            .map(|b| b.value)
            .sum();
        let by_month: f64 = progress_buckets(state.entries(), &id, Granularity::Month)
            .iter()
            .map(|b| b.value)
            .sum();
        prop_assert!((total - by_day).abs() < 1e-6);
        prop_assert!((total - by_month).abs() < 1e-6);
    }

    #[test]
    fn encode_then_decode_preserves_state(rows in entry_rows(), memo in ".{0,40}") {
        let (mut state, _) = state_with_rows(&rows);
        state.set_record_memo(memo);
        let raw = encode(&state).expect("encode");
        prop_assert_eq!(decode(&raw), state);
    }

    #[test]
    fn encode_then_decode_preserves_every_stored_field(
        rows in prop::collection::vec(logged_entry(), 0..12),
        memo in ".{0,40}",
        selected in anchor_strategy(),
        seed_version in prop::option::of("[0-9]{1,2}\\.[0-9]{1,2}"),
        session in session_strategy(),
        rest in rest_strategy(),
    ) {
        let mut state = WorkoutState::default();
        if let Some(version) = &seed_version {
            state.seed_preset_exercises(preset::catalog(), version);
        }
        let id = match state.exercise_by_name("Squat") {
            Some(existing) => existing.id.clone(),
            None => state.add_exercise("Squat", Category::Legs).expect("add"),
        };
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        for (offset, weight, pounds, reps, sets, note) in rows {
            let draft = EntryDraft {
                weight,
                unit: if pounds { WeightUnit::Lb } else { WeightUnit::Kg },
                reps,
                sets,
                note,
            };
            state
                .add_entry(&date_key(start + Days::new(offset)), &id, draft)
                .expect("entry");
        }
        state.set_record_memo(memo);
        state.select_date(selected);
        *state.session_timer_mut() = session;
        *state.rest_timer_mut() = rest;

        let raw = encode(&state).expect("encode");
        let decoded = decode(&raw);
        for (got, want) in decoded.entries().iter().zip(state.entries()) {
            prop_assert_eq!(got.weight.to_bits(), want.weight.to_bits());
        }
        prop_assert_eq!(decoded.preset_version_applied(), seed_version.as_deref());
        prop_assert_eq!(decoded, state);
    }

    #[test]
    fn rename_reaches_every_entry_of_the_exercise(
        rows in entry_rows(),
        new_name in "[A-Z][a-z]{2,12}",
    ) {
        let (mut state, id) = state_with_rows(&rows);
        let other = state.add_exercise("Zz Other Move", Category::Back).expect("add");
        state
            .add_entry("2024-03-02", &other, EntryDraft::default())
            .expect("entry");

        state.rename_exercise(&id, &new_name).expect("rename");
        for entry in state.entries() {
            if entry.exercise_id == id {
                prop_assert_eq!(&entry.exercise_name, &new_name);
            } else {
                prop_assert_eq!(entry.exercise_name.as_str(), "Zz Other Move");
            }
        }
    }

    #[test]
    fn deleting_an_exercise_keeps_entry_snapshots(rows in entry_rows()) {
        let (mut state, id) = state_with_rows(&rows);
        let before = state.entries().to_vec();
        state.delete_exercise(&id).expect("delete");
        prop_assert!(state.exercise(&id).is_none());
        prop_assert_eq!(state.entries(), before.as_slice());
    }
}
