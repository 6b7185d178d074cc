use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every timer transition and notable tracker change produces an Event.
/// The shell prints them; a GUI would turn them into toasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionRestarted {
        at: DateTime<Utc>,
    },
    RestStarted {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    RestPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero while running. Emitted once per run.
    RestExpired {
        at: DateTime<Utc>,
    },
    RestDurationChanged {
        configured_secs: u64,
        at: DateTime<Utc>,
    },
    /// The repeating alarm was stopped, either by the user or because its
    /// bounded duration ran out.
    AlarmSilenced {
        at: DateTime<Utc>,
    },
    PresetsSeeded {
        version: String,
        inserted: usize,
    },
    /// A slot write failed; memory is now ahead of storage.
    PersistenceDegraded {
        message: String,
    },
    PersistenceRestored,
}
