//! Single-slot state storage.
//!
//! The whole [`WorkoutState`](crate::WorkoutState) lives in one string slot,
//! replaced on every write. [`Database`] keeps the slot in SQLite on disk;
//! [`MemoryStore`] keeps it in memory for tests and ephemeral runs.

mod config;
pub mod database;
mod memory;

pub use config::{AlarmConfig, CalendarConfig, Config, RestTimerConfig, StorageConfig, UnitsConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

/// Slot key used by every release so far.
pub const DEFAULT_SLOT_KEY: &str = "workoutCalendar.v1";

/// A key-value slot backend.
pub trait SlotStore {
    /// Read a slot. `Ok(None)` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the slot's content.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns `<config dir>/workout-calendar/`, creating it if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("workout-calendar");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
