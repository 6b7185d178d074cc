use clap::Subcommand;
use serde_json::Value;
use workout_core::derive::{date_key, entries_for_day, weight_in_kg};
use workout_core::{Entry, EntryDraft, EntryField, WeightUnit};

use super::{
    ensure_persisted, parse_date, print_json, resolve_exercise_id, CliResult, Context,
};

#[derive(Subcommand)]
pub enum EntryAction {
    /// Log an exercise on a day
    Add {
        /// Exercise ID or name
        exercise: String,
        /// Day as YYYY-MM-DD; defaults to the selected date
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        weight: String,
        /// kg or lb; defaults to units.default_unit
        #[arg(long)]
        unit: Option<WeightUnit>,
        #[arg(long, default_value = "0")]
        reps: String,
        #[arg(long, default_value = "0")]
        sets: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Update one field of an entry
    Set {
        entry_id: String,
        /// weight, unit, reps, sets, note or date
        field: EntryField,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Duplicate an entry on the same day
    Copy { entry_id: String },
    /// Delete an entry
    Delete { entry_id: String },
    /// List the entries of one day
    List {
        /// Day as YYYY-MM-DD; defaults to the selected date
        #[arg(long, value_parser = parse_date)]
        date: Option<chrono::NaiveDate>,
    },
}

pub fn run(ctx: &Context, action: EntryAction) -> CliResult {
    let mut tracker = ctx.tracker()?;
    match action {
        EntryAction::Add {
            exercise,
            date,
            weight,
            unit,
            reps,
            sets,
            note,
        } => {
            let exercise_id = resolve_exercise_id(&tracker, &exercise)?;
            let day = date.unwrap_or_else(|| tracker.state().selected_date_key());
            let unit = match unit {
                Some(unit) => unit,
                None => ctx.config()?.units.default_unit,
            };
            let draft = EntryDraft::from_input(&weight, unit, &reps, &sets).with_note(note);
            let id = tracker.add_entry(&day, &exercise_id, draft)?;
            print_json(&tracker.state().entry(&id).map(with_kg_hint))?;
        }
        EntryAction::Set {
            entry_id,
            field,
            value,
        } => {
            tracker.update_entry_field(&entry_id, field, &value)?;
            print_json(&tracker.state().entry(&entry_id).map(with_kg_hint))?;
        }
        EntryAction::Copy { entry_id } => {
            let id = tracker.duplicate_entry(&entry_id)?;
            print_json(&tracker.state().entry(&id).map(with_kg_hint))?;
        }
        EntryAction::Delete { entry_id } => {
            let removed = tracker.delete_entry(&entry_id)?;
            print_json(&with_kg_hint(&removed))?;
        }
        EntryAction::List { date } => {
            let day = match date {
                Some(date) => entries_for_day(tracker.state().entries(), &date_key(date)),
                None => tracker.schedule(),
            };
            let rows: Vec<Value> = day.into_iter().map(with_kg_hint).collect();
            print_json(&rows)?;
        }
    }
    ensure_persisted(&tracker)
}

/// Entry JSON plus `weightKg` for pound entries.
fn with_kg_hint(entry: &Entry) -> Value {
    let mut value = serde_json::to_value(entry).unwrap_or(Value::Null);
    if entry.unit == WeightUnit::Lb {
        if let Some(obj) = value.as_object_mut() {
            let kg = (weight_in_kg(entry.weight, entry.unit) * 10.0).round() / 10.0;
            obj.insert("weightKg".into(), kg.into());
        }
    }
    value
}
