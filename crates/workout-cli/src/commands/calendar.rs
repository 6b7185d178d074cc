use chrono::NaiveDate;
use clap::Args;
use serde_json::json;
use workout_core::derive::{date_key, today};

use super::{ensure_persisted, parse_date, print_json, CliResult, Context};

#[derive(Args)]
pub struct CalendarArgs {
    /// Date the window is built around; defaults to the selected date
    #[arg(long, value_parser = parse_date)]
    anchor: Option<NaiveDate>,
    /// Show the six-week month grid instead of the rolling four weeks
    #[arg(long)]
    month: bool,
}

pub fn run(ctx: &Context, args: CalendarArgs) -> CliResult {
    let tracker = ctx.tracker()?;
    let anchor = args.anchor.unwrap_or_else(|| tracker.state().selected_date());
    let days = tracker.calendar(anchor, args.month, today());
    print_json(&json!({
        "anchor": date_key(anchor),
        "selectedDate": tracker.state().selected_date_key(),
        "days": days,
    }))?;
    ensure_persisted(&tracker)
}

pub fn select(ctx: &Context, raw: &str) -> CliResult {
    let date = parse_date(raw)?;
    let mut tracker = ctx.tracker()?;
    tracker.select_date(date);
    print_json(&json!({
        "selectedDate": tracker.state().selected_date_key(),
        "entries": tracker.schedule(),
    }))?;
    ensure_persisted(&tracker)
}

pub fn memo(ctx: &Context, text: &str) -> CliResult {
    let mut tracker = ctx.tracker()?;
    tracker.set_record_memo(text);
    print_json(&json!({ "recordMemo": tracker.state().record_memo() }))?;
    ensure_persisted(&tracker)
}
