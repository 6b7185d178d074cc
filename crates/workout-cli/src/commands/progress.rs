use clap::Args;
use workout_core::derive::Granularity;

use super::{ensure_persisted, print_json, resolve_exercise_id, CliResult, Context};

#[derive(Args)]
pub struct ProgressArgs {
    /// Exercise ID or name
    exercise: String,
    /// Bucket size: day or month
    #[arg(long, default_value = "day")]
    by: Granularity,
}

pub fn run(ctx: &Context, args: ProgressArgs) -> CliResult {
    let tracker = ctx.tracker()?;
    // Deleted exercises keep their entries, so an unknown id is still valid.
    let id = resolve_exercise_id(&tracker, &args.exercise).unwrap_or(args.exercise);
    print_json(&tracker.progress(&id, args.by))?;
    ensure_persisted(&tracker)
}
