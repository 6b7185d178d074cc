//! Tracker persistence against an on-disk SQLite slot.

use chrono::NaiveDate;
use workout_core::derive::Granularity;
use workout_core::model::preset;
use workout_core::{
    Category, Config, Database, EntryDraft, EntryField, Persistence, RestPhase, SlotStore,
    Tracker, WeightUnit,
};

const T0: u64 = 1_700_000_000_000;

fn open(dir: &std::path::Path, config: &Config) -> Tracker<Database> {
    Tracker::open(Database::open(dir).unwrap(), config)
}

#[test]
fn state_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();

    let entry_id = {
        let mut tracker = open(dir.path(), &config);
        tracker.seed_presets();
        let squat = tracker.state().exercise_by_name("squat").unwrap().id.clone();
        let id = tracker
            .add_entry(
                "2024-03-01",
                &squat,
                EntryDraft::from_input("225", WeightUnit::Lb, "5", "3").with_note("belt"),
            )
            .unwrap();
        tracker.rename_exercise(&squat, "Back Squat").unwrap();
        tracker.select_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        tracker.set_record_memo("felt heavy");
        tracker.start_rest(T0);
        assert_eq!(tracker.persistence(), &Persistence::Healthy);
        id
    };

    let tracker = open(dir.path(), &config);
    let state = tracker.state();
    assert_eq!(state.exercises().len(), preset::catalog().len());
    let entry = state.entry(&entry_id).unwrap();
    assert_eq!(entry.exercise_name, "Back Squat");
    assert_eq!(entry.unit, WeightUnit::Lb);
    assert_eq!(entry.note, "belt");
    assert_eq!(state.record_memo(), "felt heavy");
    assert_eq!(state.selected_date_key(), "2024-03-01");
    assert_eq!(tracker.schedule().len(), 1);
    assert_eq!(tracker.timers(T0 + 40_000).rest_remaining_secs, 50);
}

#[test]
fn rest_defaults_come_from_config_for_a_fresh_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.set("rest_timer.default_minutes", "2").unwrap();
    config.set("rest_timer.default_seconds", "0").unwrap();

    let tracker = open(dir.path(), &config);
    let snap = tracker.timers(T0);
    assert_eq!(snap.rest_configured_secs, 120);
    assert_eq!(snap.rest_phase, RestPhase::Idle);
}

#[test]
fn corrupted_slot_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    {
        let mut db = Database::open(dir.path()).unwrap();
        db.write(&config.storage.slot_key, "{not json").unwrap();
    }

    let mut tracker = open(dir.path(), &config);
    assert!(tracker.state().exercises().is_empty());
    tracker.add_exercise("Farmer Carry", Category::Arms).unwrap();

    let reopened = open(dir.path(), &config);
    assert!(reopened.state().exercise_by_name("farmer carry").is_some());
}

#[test]
fn edits_and_progress_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();
    let id = {
        let mut tracker = open(dir.path(), &config);
        let id = tracker.add_exercise("Press", Category::Shoulders).unwrap();
        let first = tracker
            .add_entry("2024-03-01", &id, EntryDraft::from_input("10", WeightUnit::Kg, "5", "2"))
            .unwrap();
        let copy = tracker.duplicate_entry(&first).unwrap();
        tracker
            .update_entry_field(&copy, EntryField::Date, "2024-03-15")
            .unwrap();
        tracker.update_entry_field(&copy, EntryField::Weight, "5").unwrap();
        id
    };

    let tracker = open(dir.path(), &config);
    let view = tracker.progress(&id, Granularity::Month);
    assert_eq!(view.buckets.len(), 1);
    assert_eq!(view.buckets[0].label, "2024-03");
    assert_eq!(view.buckets[0].value, 150.0);
    assert_eq!(tracker.progress(&id, Granularity::Day).buckets.len(), 2);
}
