//! # Workout Calendar Core Library
//!
//! Core logic for a personal workout tracker: an exercise catalog, dated
//! workout entries, derived calendar and progress views, and two wall-clock
//! timers. The CLI (and any other shell) is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Model**: [`WorkoutState`] owns exercises, entries and timer state.
//!   Every mutator validates first and leaves the state untouched on error.
//! - **Derivations**: pure functions in [`derive`] build the calendar window,
//!   the filtered exercise list and progress buckets.
//! - **Timers**: [`SessionTimer`] counts up, [`RestTimer`] counts down. Both
//!   take `now_ms` explicitly and survive reloads.
//! - **Storage**: the whole state is one JSON document in a single slot of a
//!   [`SlotStore`] ([`Database`] on disk, [`MemoryStore`] in memory), read
//!   back leniently by [`codec`].
//! - **Tracker**: [`Tracker`] ties these together and persists after every
//!   mutation.

pub mod codec;
pub mod derive;
pub mod error;
pub mod events;
pub mod model;
pub mod state;
pub mod storage;
pub mod timer;
pub mod tracker;

pub use error::{AlarmError, ConfigError, CoreError, ModelError, Result, StorageError, TimerError};
pub use events::Event;
pub use model::{Category, Entry, EntryDraft, EntryField, Exercise, WeightUnit};
pub use state::WorkoutState;
pub use storage::{Config, Database, MemoryStore, SlotStore};
pub use timer::{now_ms, Alarm, RestPhase, RestTimer, SessionTimer, SilentAlarm};
pub use tracker::{Persistence, ProgressView, TimerSnapshot, Tracker, View};
