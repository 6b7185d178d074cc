//! The single root object holding every exercise, entry and scalar.
//!
//! All mutators validate first and only then write, so an `Err` always
//! leaves the state exactly as it was. Persistence is the caller's job
//! (see [`Tracker`](crate::Tracker)).

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::derive::{date_key, parse_date_key, today};
use crate::error::ModelError;
use crate::model::preset::PresetExercise;
use crate::model::{
    coerce_count, coerce_weight, new_id, sanitize_weight, Category, Entry,
    EntryDraft, EntryField, Exercise, WeightUnit,
};
use crate::timer::{RestTimer, SessionTimer};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutState {
    pub(crate) exercises: Vec<Exercise>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) preset_version_applied: Option<String>,
    pub(crate) record_memo: String,
    pub(crate) selected_date: NaiveDate,
    pub(crate) session_timer: SessionTimer,
    pub(crate) rest_timer: RestTimer,
}

impl Default for WorkoutState {
    fn default() -> Self {
        Self {
            exercises: Vec::new(),
            entries: Vec::new(),
            preset_version_applied: None,
            record_memo: String::new(),
            selected_date: today(),
            session_timer: SessionTimer::default(),
            rest_timer: RestTimer::default(),
        }
    }
}

impl WorkoutState {
    /// Fresh state with a custom rest duration.
    pub fn with_rest_duration(minutes: u32, seconds: u32) -> Self {
        Self {
            rest_timer: RestTimer::new(minutes, seconds),
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Case-insensitive name lookup.
    pub fn exercise_by_name(&self, name: &str) -> Option<&Exercise> {
        let needle = name.trim().to_lowercase();
        self.exercises
            .iter()
            .find(|e| e.name.to_lowercase() == needle)
    }

    pub fn preset_version_applied(&self) -> Option<&str> {
        self.preset_version_applied.as_deref()
    }

    pub fn record_memo(&self) -> &str {
        &self.record_memo
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selected_date_key(&self) -> String {
        date_key(self.selected_date)
    }

    pub fn session_timer(&self) -> &SessionTimer {
        &self.session_timer
    }

    pub fn rest_timer(&self) -> &RestTimer {
        &self.rest_timer
    }

    pub fn session_timer_mut(&mut self) -> &mut SessionTimer {
        &mut self.session_timer
    }

    pub fn rest_timer_mut(&mut self) -> &mut RestTimer {
        &mut self.rest_timer
    }

    // ── Exercises ────────────────────────────────────────────────────

    /// Add an exercise and return its id.
    pub fn add_exercise(&mut self, name: &str, category: Category) -> Result<String, ModelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.name_taken(name, None) {
            return Err(ModelError::DuplicateName(name.to_string()));
        }
        let id = new_id();
        self.exercises.push(Exercise {
            id: id.clone(),
            name: name.to_string(),
            category,
            created_at: Utc::now(),
        });
        debug!(%id, exercise = name, %category, "exercise added");
        Ok(id)
    }

    /// Rename an exercise and refresh every entry's snapshot.
    pub fn rename_exercise(&mut self, id: &str, new_name: &str) -> Result<(), ModelError> {
        let new_name = new_name.trim();
        let index = self.exercise_index(id)?;
        if new_name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        if self.name_taken(new_name, Some(id)) {
            return Err(ModelError::DuplicateName(new_name.to_string()));
        }
        self.exercises[index].name = new_name.to_string();
        let synced = self.sync_snapshot(id);
        debug!(id, new_name, synced, "exercise renamed");
        Ok(())
    }

    pub fn set_exercise_category(&mut self, id: &str, category: Category) -> Result<(), ModelError> {
        let index = self.exercise_index(id)?;
        self.exercises[index].category = category;
        let synced = self.sync_snapshot(id);
        debug!(id, %category, synced, "exercise category changed");
        Ok(())
    }

    /// Remove an exercise. Its entries stay, keeping their snapshot.
    pub fn delete_exercise(&mut self, id: &str) -> Result<Exercise, ModelError> {
        let index = self.exercise_index(id)?;
        let removed = self.exercises.remove(index);
        debug!(id, exercise = %removed.name, "exercise deleted");
        Ok(removed)
    }

    /// Insert every preset not already present, once per `version`.
    /// Returns how many were inserted.
    pub fn seed_preset_exercises(&mut self, presets: &[PresetExercise], version: &str) -> usize {
        if self.preset_version_applied.as_deref() == Some(version) {
            return 0;
        }
        let mut inserted = 0;
        for preset in presets {
            // Data from earlier releases already holds the preset under its old name.
            if self.exercise_by_name(preset.legacy_name).is_some() {
                continue;
            }
            if self.add_exercise(preset.name, preset.category).is_ok() {
                inserted += 1;
            }
        }
        self.preset_version_applied = Some(version.to_string());
        debug!(version, inserted, "preset exercises seeded");
        inserted
    }

    // ── Entries ──────────────────────────────────────────────────────

    /// Log an entry for `exercise_id` on `day` and return its id.
    pub fn add_entry(
        &mut self,
        day: &str,
        exercise_id: &str,
        draft: EntryDraft,
    ) -> Result<String, ModelError> {
        let date = parse_date_key(day).ok_or_else(|| ModelError::InvalidDate(day.to_string()))?;
        let exercise = self
            .exercise(exercise_id)
            .ok_or_else(|| ModelError::ExerciseNotFound(exercise_id.to_string()))?;
        let id = new_id();
        let entry = Entry {
            id: id.clone(),
            date_key: date_key(date),
            exercise_id: exercise.id.clone(),
            exercise_name: exercise.name.clone(),
            exercise_category: exercise.category,
            weight: sanitize_weight(draft.weight),
            unit: draft.unit,
            reps: draft.reps,
            sets: draft.sets,
            note: draft.note,
            created_at: Utc::now(),
        };
        debug!(%id, date_key = %entry.date_key, exercise = %entry.exercise_name, "entry added");
        self.entries.push(entry);
        Ok(id)
    }

    /// Edit one field from raw input.
    ///
    /// Numeric fields coerce empty or invalid input to 0. Dates and units
    /// that do not parse are rejected.
    pub fn update_entry_field(
        &mut self,
        entry_id: &str,
        field: EntryField,
        raw: &str,
    ) -> Result<(), ModelError> {
        let index = self.entry_index(entry_id)?;
        let entry = &mut self.entries[index];
        match field {
            EntryField::Weight => entry.weight = coerce_weight(raw),
            EntryField::Reps => entry.reps = coerce_count(raw),
            EntryField::Sets => entry.sets = coerce_count(raw),
            EntryField::Unit => entry.unit = raw.parse::<WeightUnit>()?,
            EntryField::Note => entry.note = raw.to_string(),
            EntryField::Date => {
                let date =
                    parse_date_key(raw).ok_or_else(|| ModelError::InvalidDate(raw.to_string()))?;
                entry.date_key = date_key(date);
            }
        }
        debug!(entry_id, ?field, "entry field updated");
        Ok(())
    }

    /// Clone an entry under a new id, appended to the end of the log.
    pub fn duplicate_entry(&mut self, entry_id: &str) -> Result<String, ModelError> {
        let index = self.entry_index(entry_id)?;
        let id = new_id();
        let copy = Entry {
            id: id.clone(),
            created_at: Utc::now(),
            ..self.entries[index].clone()
        };
        self.entries.push(copy);
        debug!(source = entry_id, %id, "entry duplicated");
        Ok(id)
    }

    pub fn delete_entry(&mut self, entry_id: &str) -> Result<Entry, ModelError> {
        let index = self.entry_index(entry_id)?;
        debug!(entry_id, "entry deleted");
        Ok(self.entries.remove(index))
    }

    // ── Scalars ──────────────────────────────────────────────────────

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    pub fn set_record_memo(&mut self, memo: impl Into<String>) {
        self.record_memo = memo.into();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn exercise_index(&self, id: &str) -> Result<usize, ModelError> {
        self.exercises
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ModelError::ExerciseNotFound(id.to_string()))
    }

    fn entry_index(&self, id: &str) -> Result<usize, ModelError> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ModelError::EntryNotFound(id.to_string()))
    }

    fn name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        let needle = name.to_lowercase();
        self.exercises
            .iter()
            .filter(|e| Some(e.id.as_str()) != except_id)
            .any(|e| e.name.to_lowercase() == needle)
    }

    /// Copy the exercise's current name and category onto its entries.
    fn sync_snapshot(&mut self, exercise_id: &str) -> usize {
        let Some(exercise) = self.exercises.iter().find(|e| e.id == exercise_id) else {
            return 0;
        };
        let mut synced = 0;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| e.exercise_id == exercise_id)
        {
            entry.exercise_name = exercise.name.clone();
            entry.exercise_category = exercise.category;
            synced += 1;
        }
        synced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::preset;

    fn draft(weight: f64, reps: u32, sets: u32) -> EntryDraft {
        EntryDraft {
            weight,
            unit: WeightUnit::Kg,
            reps,
            sets,
            note: String::new(),
        }
    }

    #[test]
    fn add_exercise_trims_and_rejects_duplicates() {
        let mut state = WorkoutState::default();
        let id = state.add_exercise("  Squat ", Category::Legs).unwrap();
        assert_eq!(state.exercise(&id).unwrap().name, "Squat");

        assert_eq!(
            state.add_exercise("sQUAT", Category::Legs),
            Err(ModelError::DuplicateName("sQUAT".into()))
        );
        assert_eq!(state.add_exercise("   ", Category::Legs), Err(ModelError::EmptyName));
        assert_eq!(state.exercises().len(), 1);
    }

    #[test]
    fn rename_propagates_to_own_entries_only() {
        let mut state = WorkoutState::default();
        let squat = state.add_exercise("Squat", Category::Legs).unwrap();
        let bench = state.add_exercise("Bench Press", Category::Chest).unwrap();
        let e1 = state.add_entry("2024-03-01", &squat, draft(100.0, 5, 3)).unwrap();
        let e2 = state.add_entry("2024-03-02", &bench, draft(80.0, 5, 3)).unwrap();

        state.rename_exercise(&squat, "Back Squat").unwrap();
        assert_eq!(state.entry(&e1).unwrap().exercise_name, "Back Squat");
        assert_eq!(state.entry(&e2).unwrap().exercise_name, "Bench Press");
    }

    #[test]
    fn colliding_rename_is_atomic() {
        let mut state = WorkoutState::default();
        let squat = state.add_exercise("Squat", Category::Legs).unwrap();
        state.add_exercise("Deadlift", Category::Glutes).unwrap();
        let before = state.clone();

        assert_eq!(
            state.rename_exercise(&squat, "DEADLIFT"),
            Err(ModelError::DuplicateName("DEADLIFT".into()))
        );
        assert_eq!(state.rename_exercise(&squat, " "), Err(ModelError::EmptyName));
        assert_eq!(
            state.rename_exercise("missing", "Anything"),
            Err(ModelError::ExerciseNotFound("missing".into()))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn rename_may_change_case_of_own_name() {
        let mut state = WorkoutState::default();
        let id = state.add_exercise("squat", Category::Legs).unwrap();
        state.rename_exercise(&id, "Squat").unwrap();
        assert_eq!(state.exercise(&id).unwrap().name, "Squat");
    }

    #[test]
    fn category_change_resyncs_snapshot() {
        let mut state = WorkoutState::default();
        let id = state.add_exercise("Hip Thrust", Category::Legs).unwrap();
        let entry = state.add_entry("2024-03-01", &id, draft(60.0, 10, 3)).unwrap();
        state.set_exercise_category(&id, Category::Glutes).unwrap();
        assert_eq!(state.entry(&entry).unwrap().exercise_category, Category::Glutes);
    }

    #[test]
    fn delete_exercise_keeps_entry_snapshot() {
        let mut state = WorkoutState::default();
        let id = state.add_exercise("Squat", Category::Legs).unwrap();
        let entry = state.add_entry("2024-03-01", &id, draft(100.0, 5, 3)).unwrap();

        state.delete_exercise(&id).unwrap();
        let kept = state.entry(&entry).unwrap();
        assert_eq!(kept.exercise_name, "Squat");
        assert_eq!(kept.exercise_category, Category::Legs);
        assert_eq!(kept.exercise_id, id);
        assert!(state.exercise(&id).is_none());
    }

    #[test]
    fn add_entry_requires_live_exercise_and_valid_date() {
        let mut state = WorkoutState::default();
        assert_eq!(
            state.add_entry("2024-03-01", "ghost", draft(1.0, 1, 1)),
            Err(ModelError::ExerciseNotFound("ghost".into()))
        );
        let id = state.add_exercise("Squat", Category::Legs).unwrap();
        assert_eq!(
            state.add_entry("2024-13-01", &id, draft(1.0, 1, 1)),
            Err(ModelError::InvalidDate("2024-13-01".into()))
        );
        assert!(state.entries().is_empty());
    }

    #[test]
    fn field_updates_validate_per_field() {
        let mut state = WorkoutState::default();
        let id = state.add_exercise("Squat", Category::Legs).unwrap();
        let entry = state.add_entry("2024-03-01", &id, draft(100.0, 5, 3)).unwrap();

        state.update_entry_field(&entry, EntryField::Weight, "").unwrap();
        state.update_entry_field(&entry, EntryField::Reps, "12").unwrap();
        state.update_entry_field(&entry, EntryField::Sets, "x").unwrap();
        state.update_entry_field(&entry, EntryField::Unit, "lb").unwrap();
        state.update_entry_field(&entry, EntryField::Note, "felt heavy").unwrap();
        state.update_entry_field(&entry, EntryField::Date, "2024-03-05").unwrap();

        let e = state.entry(&entry).unwrap();
        assert_eq!(e.weight, 0.0);
        assert_eq!(e.reps, 12);
        assert_eq!(e.sets, 0);
        assert_eq!(e.unit, WeightUnit::Lb);
        assert_eq!(e.note, "felt heavy");
        assert_eq!(e.date_key, "2024-03-05");

        let before = state.clone();
        assert!(state.update_entry_field(&entry, EntryField::Date, "2024-02-30").is_err());
        assert!(state.update_entry_field(&entry, EntryField::Unit, "stone").is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn duplicate_entry_appends_clone_with_new_id() {
        let mut state = WorkoutState::default();
        let id = state.add_exercise("Squat", Category::Legs).unwrap();
        let first = state.add_entry("2024-03-01", &id, draft(100.0, 5, 3)).unwrap();
        let _second = state.add_entry("2024-03-02", &id, draft(90.0, 5, 3)).unwrap();

        let copy = state.duplicate_entry(&first).unwrap();
        assert_ne!(copy, first);
        let last = state.entries().last().unwrap();
        assert_eq!(last.id, copy);
        assert_eq!(last.date_key, "2024-03-01");
        assert_eq!(last.weight, 100.0);
        assert!(state.duplicate_entry("missing").is_err());
        assert_eq!(state.entries().len(), 3);
    }

    #[test]
    fn seeding_is_once_per_version_and_skips_existing_names() {
        let mut state = WorkoutState::default();
        state.add_exercise("SQUAT", Category::Legs).unwrap();

        let inserted = state.seed_preset_exercises(preset::catalog(), "v1");
        assert_eq!(inserted, preset::catalog().len() - 1);
        assert_eq!(state.preset_version_applied(), Some("v1"));

        let count = state.exercises().len();
        assert_eq!(state.seed_preset_exercises(preset::catalog(), "v1"), 0);
        assert_eq!(state.exercises().len(), count);

        // A new version only fills gaps.
        assert_eq!(state.seed_preset_exercises(preset::catalog(), "v2"), 0);
        assert_eq!(state.preset_version_applied(), Some("v2"));
    }

    #[test]
    fn seeding_skips_presets_stored_under_legacy_names() {
        let mut state = WorkoutState::default();
        state.add_exercise("深蹲", Category::Legs).unwrap();

        let inserted = state.seed_preset_exercises(preset::catalog(), "v1");
        assert_eq!(inserted, preset::catalog().len() - 1);
        assert!(state.exercise_by_name("Squat").is_none());
        assert!(state.exercise_by_name("Front Squat").is_some());
    }
}
