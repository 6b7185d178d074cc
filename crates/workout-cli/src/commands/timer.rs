use clap::Subcommand;
use serde_json::json;
use workout_core::{now_ms, Database, Event, Tracker};

use super::{ensure_persisted, print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Session (count-up) timer
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Rest (count-down) timer
    Rest {
        #[command(subcommand)]
        action: RestAction,
    },
    /// Print both timers as JSON
    Status,
}

#[derive(Subcommand)]
pub enum SessionAction {
    Start,
    Pause,
    /// Reset to zero and keep running
    Restart,
    Status,
}

#[derive(Subcommand)]
pub enum RestAction {
    Start,
    Pause,
    /// Configure the countdown (only while stopped)
    Set { minutes: u32, seconds: u32 },
    Status,
    /// Check for expiry and ring the alarm if the countdown ran out
    Tick,
}

pub fn run(ctx: &Context, action: TimerAction) -> CliResult {
    let mut tracker = ctx.tracker()?;
    let now = now_ms();
    let events: Vec<Event> = match action {
        TimerAction::Session { action } => match action {
            SessionAction::Start => tracker.start_session(now).into_iter().collect(),
            SessionAction::Pause => tracker.pause_session(now).into_iter().collect(),
            SessionAction::Restart => vec![tracker.restart_session(now)],
            SessionAction::Status => Vec::new(),
        },
        TimerAction::Rest { action } => match action {
            RestAction::Start => tracker.start_rest(now).into_iter().collect(),
            RestAction::Pause => tracker.pause_rest(now).into_iter().collect(),
            RestAction::Set { minutes, seconds } => {
                vec![tracker.set_rest_duration(minutes, seconds, now)?]
            }
            RestAction::Status => Vec::new(),
            RestAction::Tick => tracker.tick(now),
        },
        TimerAction::Status => Vec::new(),
    };
    report(&tracker, &events, now)?;
    ensure_persisted(&tracker)
}

fn report(tracker: &Tracker<Database>, events: &[Event], now: u64) -> CliResult {
    print_json(&json!({
        "events": events,
        "timers": tracker.timers(now),
    }))
}
