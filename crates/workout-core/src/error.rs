//! Core error types for workout-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! rejections ([`ModelError`]) never change state; storage failures
//! ([`StorageError`]) are surfaced to the [`Tracker`](crate::Tracker), which
//! keeps the in-memory mutation and reports degraded persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for workout-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Domain model validation errors
    #[error("Validation error: {0}")]
    Model(#[from] ModelError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Timer command rejected
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected domain mutations. The state is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Name was empty after trimming
    #[error("Exercise name must not be empty")]
    EmptyName,

    /// Another exercise already uses this name (case-insensitive)
    #[error("An exercise named '{0}' already exists")]
    DuplicateName(String),

    #[error("Exercise not found: {0}")]
    ExerciseNotFound(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Text did not parse as a calendar date
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid unit '{0}': expected kg or lb")]
    InvalidUnit(String),

    #[error("Unknown entry field: {0}")]
    UnknownField(String),
}

/// Slot storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Storage is locked")]
    Locked,

    /// Write would exceed the storage quota
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} available")]
    QuotaExceeded { needed: usize, quota: usize },

    /// The state could not be serialized
    #[error("Failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    /// IO errors (data directory creation)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Timer commands that cannot be applied in the current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Rest duration fields are locked while the countdown runs
    #[error("Rest timer duration cannot change while it is running")]
    RunningLocked,
}

/// Alarm playback failures. Logged by the tracker, never fatal.
#[derive(Error, Debug)]
pub enum AlarmError {
    #[error("No audio output available")]
    Unavailable,

    #[error("Alarm playback failed: {0}")]
    Playback(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
