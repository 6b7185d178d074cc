use clap::Subcommand;
use serde_json::json;
use workout_core::derive::CategoryFilter;
use workout_core::model::preset::{infer_category, PRESET_VERSION};
use workout_core::{Category, Event};

use super::{ensure_persisted, parse_category, print_json, resolve_exercise_id, CliResult, Context};

#[derive(Subcommand)]
pub enum ExerciseAction {
    /// Add an exercise to the catalog
    Add {
        name: String,
        /// Category; inferred from the name when omitted
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
    },
    /// Rename an exercise (entries follow)
    Rename {
        /// Exercise ID or name
        exercise: String,
        new_name: String,
    },
    /// Change an exercise's category (entries follow)
    Category {
        /// Exercise ID or name
        exercise: String,
        #[arg(value_parser = parse_category)]
        category: Category,
    },
    /// Delete an exercise; logged entries keep their snapshot
    Delete {
        /// Exercise ID or name
        exercise: String,
    },
    /// List exercises, sorted by name
    List {
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// Case-insensitive substring filter
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Apply the built-in preset catalog if not applied yet
    Seed,
}

pub fn run(ctx: &Context, action: ExerciseAction) -> CliResult {
    let mut tracker = ctx.tracker()?;
    match action {
        ExerciseAction::Add { name, category } => {
            let category = category
                .or_else(|| infer_category(&name))
                .unwrap_or_default();
            let id = tracker.add_exercise(&name, category)?;
            print_json(&tracker.state().exercise(&id))?;
        }
        ExerciseAction::Rename { exercise, new_name } => {
            let id = resolve_exercise_id(&tracker, &exercise)?;
            tracker.rename_exercise(&id, &new_name)?;
            print_json(&tracker.state().exercise(&id))?;
        }
        ExerciseAction::Category { exercise, category } => {
            let id = resolve_exercise_id(&tracker, &exercise)?;
            tracker.set_exercise_category(&id, category)?;
            print_json(&tracker.state().exercise(&id))?;
        }
        ExerciseAction::Delete { exercise } => {
            let id = resolve_exercise_id(&tracker, &exercise)?;
            let removed = tracker.delete_exercise(&id)?;
            print_json(&removed)?;
        }
        ExerciseAction::List { category, search } => {
            print_json(&tracker.exercise_list(category, &search))?;
        }
        ExerciseAction::Seed => {
            // Opening the tracker already seeded; report what happened.
            let inserted = tracker
                .drain_events()
                .into_iter()
                .find_map(|e| match e {
                    Event::PresetsSeeded { inserted, .. } => Some(inserted),
                    _ => None,
                })
                .unwrap_or(0);
            print_json(&json!({
                "version": PRESET_VERSION,
                "applied": tracker.state().preset_version_applied(),
                "inserted": inserted,
                "total": tracker.state().exercises().len(),
            }))?;
        }
    }
    ensure_persisted(&tracker)
}
