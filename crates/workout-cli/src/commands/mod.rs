pub mod calendar;
pub mod config;
pub mod entry;
pub mod exercise;
pub mod progress;
pub mod timer;

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use workout_core::derive::parse_date_key;
use workout_core::storage;
use workout_core::{Alarm, AlarmError, Category, Config, Database, Persistence, Tracker};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Where this invocation reads and writes its files.
pub struct Context {
    pub data_dir: PathBuf,
}

impl Context {
    pub fn resolve(data_dir: Option<PathBuf>) -> workout_core::Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                dir
            }
            None => storage::data_dir()?,
        };
        Ok(Self { data_dir })
    }

    pub fn config(&self) -> workout_core::Result<Config> {
        Ok(Config::load_from(&self.data_dir)?)
    }

    /// Open the tracker over `workout.db`, seeding the preset catalog on
    /// first use.
    pub fn tracker(&self) -> workout_core::Result<Tracker<Database>> {
        let config = self.config()?;
        debug!(data_dir = %self.data_dir.display(), "opening workout database");
        let db = Database::open(&self.data_dir)?;
        let mut tracker = Tracker::open(db, &config).with_alarm(Box::new(TerminalBell));
        tracker.seed_presets();
        Ok(tracker)
    }
}

/// Fail the command if the last write did not reach the database.
pub fn ensure_persisted(tracker: &Tracker<Database>) -> CliResult {
    match tracker.persistence() {
        Persistence::Healthy => Ok(()),
        Persistence::Degraded { error } => Err(format!("changes were not saved: {error}").into()),
    }
}

/// Look an exercise up by id, falling back to a case-insensitive name match.
pub fn resolve_exercise_id(
    tracker: &Tracker<Database>,
    id_or_name: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let state = tracker.state();
    state
        .exercise(id_or_name)
        .or_else(|| state.exercise_by_name(id_or_name))
        .map(|e| e.id.clone())
        .ok_or_else(|| format!("exercise not found: {id_or_name}").into())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        format!("unknown category '{raw}' (expected one of: {})", known.join(", "))
    })
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_date_key(raw).ok_or_else(|| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
}

/// Rings the terminal bell on stderr.
struct TerminalBell;

impl Alarm for TerminalBell {
    fn sound(&mut self) -> Result<(), AlarmError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|()| err.flush())
            .map_err(|e| AlarmError::Playback(e.to_string()))
    }

    fn silence(&mut self) {}
}
