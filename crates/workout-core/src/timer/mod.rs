//! Session and rest timers.
//!
//! Both timers are wall-clock based: they store an accumulated value plus
//! the epoch-millisecond timestamp of the last resume, and compute the
//! displayed value from `now`, so a suspended or restarted process shows the
//! right values without having ticked in between.
//!
//! Nothing here reads the clock. Every command takes `now_ms`; the caller
//! passes [`now_ms()`] in production and fixed values in tests.

mod alarm;
mod rest;
mod session;

pub use alarm::{Alarm, AlarmLoop, SilentAlarm, DEFAULT_ALARM_SECS};
pub use rest::{
    RestPhase, RestTimer, DEFAULT_REST_MINUTES, DEFAULT_REST_SECONDS, MAX_REST_MINUTES,
    MAX_REST_SECONDS,
};
pub use session::{SessionTimer, MAX_ELAPSED_SECS, SESSION_CYCLE_SECS};

use chrono::{DateTime, Utc};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Whole seconds between two stamps. Zero if the clock went backwards.
pub(crate) fn whole_secs_between(since_ms: u64, now_ms: u64) -> u64 {
    now_ms.saturating_sub(since_ms) / 1000
}

pub(crate) fn timestamp(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default()
}
