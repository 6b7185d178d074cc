//! Count-up timer for the current training session.
//!
//! ```text
//! Paused --start--> Running --pause--> Paused
//!   any  --restart--> Running (elapsed = 0)
//! ```

use serde::{Deserialize, Serialize};

use super::{timestamp, whole_secs_between};
use crate::events::Event;

/// Length of one lap of the progress ring. Cosmetic only.
pub const SESSION_CYCLE_SECS: u64 = 60 * 60;

/// Ceiling for a stored elapsed value. Anything above is a corrupt slot.
pub const MAX_ELAPSED_SECS: u64 = u32::MAX as u64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    /// Seconds accumulated before the last resume.
    elapsed_seconds: u64,
    running: bool,
    /// Epoch milliseconds of the last start/restart.
    resumed_at_ms: u64,
}

impl SessionTimer {
    /// Rebuild from stored fields, capping elapsed at [`MAX_ELAPSED_SECS`].
    pub fn from_parts(elapsed_seconds: u64, running: bool, resumed_at_ms: u64) -> Self {
        Self {
            elapsed_seconds: elapsed_seconds.min(MAX_ELAPSED_SECS),
            running,
            resumed_at_ms,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stored value, excluding the in-flight run.
    pub fn stored_elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn resumed_at_ms(&self) -> u64 {
        self.resumed_at_ms
    }

    /// Elapsed seconds as displayed at `now_ms`.
    pub fn elapsed_at(&self, now_ms: u64) -> u64 {
        if self.running {
            self.elapsed_seconds
                .saturating_add(whole_secs_between(self.resumed_at_ms, now_ms))
        } else {
            self.elapsed_seconds
        }
    }

    /// 0.0 .. 1.0 position within the current hour.
    pub fn cycle_progress(&self, now_ms: u64) -> f64 {
        (self.elapsed_at(now_ms) % SESSION_CYCLE_SECS) as f64 / SESSION_CYCLE_SECS as f64
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        self.resumed_at_ms = now_ms;
        Some(Event::SessionStarted {
            elapsed_secs: self.elapsed_seconds,
            at: timestamp(now_ms),
        })
    }

    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.elapsed_seconds = self.elapsed_at(now_ms);
        self.running = false;
        Some(Event::SessionPaused {
            elapsed_secs: self.elapsed_seconds,
            at: timestamp(now_ms),
        })
    }

    /// Reset to zero and run. Used when the schedule view opens.
    pub fn restart(&mut self, now_ms: u64) -> Event {
        self.elapsed_seconds = 0;
        self.running = true;
        self.resumed_at_ms = now_ms;
        Event::SessionRestarted {
            at: timestamp(now_ms),
        }
    }
}
