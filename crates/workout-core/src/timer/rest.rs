//! Count-down timer between sets.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Idle (remaining = snapshot)
//!                 Running --reaches 0--> Expired (alarm fires once)
//! Expired --start--> Running (remaining reset to configured)
//! Idle --set_duration--> Idle (remaining = new configured)
//! ```
//!
//! Duration fields are locked while the countdown runs.

use serde::{Deserialize, Serialize};

use super::{timestamp, whole_secs_between};
use crate::error::TimerError;
use crate::events::Event;

pub const MAX_REST_MINUTES: u8 = 99;
pub const MAX_REST_SECONDS: u8 = 59;
pub const DEFAULT_REST_MINUTES: u8 = 1;
pub const DEFAULT_REST_SECONDS: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestPhase {
    Idle,
    Running,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestTimer {
    minutes: u8,
    seconds: u8,
    /// Snapshot taken at the last pause/start.
    remaining_seconds: u64,
    running: bool,
    /// Epoch milliseconds of the last start.
    resumed_at_ms: u64,
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new(
            u32::from(DEFAULT_REST_MINUTES),
            u32::from(DEFAULT_REST_SECONDS),
        )
    }
}

impl RestTimer {
    /// Idle timer with the given duration. Fields are clamped independently.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        let minutes = clamp_minutes(minutes);
        let seconds = clamp_seconds(seconds);
        Self {
            minutes,
            seconds,
            remaining_seconds: total_secs(minutes, seconds),
            running: false,
            resumed_at_ms: 0,
        }
    }

    /// Rebuild from stored fields, clamping the duration. Remaining never
    /// exceeds the configured duration.
    pub fn from_parts(
        minutes: u32,
        seconds: u32,
        remaining_seconds: u64,
        running: bool,
        resumed_at_ms: u64,
    ) -> Self {
        let minutes = clamp_minutes(minutes);
        let seconds = clamp_seconds(seconds);
        Self {
            minutes,
            seconds,
            remaining_seconds: remaining_seconds.min(total_secs(minutes, seconds)),
            running,
            resumed_at_ms,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn configured_seconds(&self) -> u64 {
        total_secs(self.minutes, self.seconds)
    }

    /// Stored snapshot, excluding the in-flight run.
    pub fn stored_remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn resumed_at_ms(&self) -> u64 {
        self.resumed_at_ms
    }

    /// Remaining seconds as displayed at `now_ms`.
    pub fn remaining_at(&self, now_ms: u64) -> u64 {
        if self.running {
            self.remaining_seconds
                .saturating_sub(whole_secs_between(self.resumed_at_ms, now_ms))
        } else {
            self.remaining_seconds
        }
    }

    /// Phase as stored, without looking at the clock. A running timer whose
    /// deadline already passed still reads `Running` until ticked.
    pub fn phase(&self) -> RestPhase {
        if self.running {
            RestPhase::Running
        } else if self.remaining_seconds == 0 && self.configured_seconds() > 0 {
            RestPhase::Expired
        } else {
            RestPhase::Idle
        }
    }

    /// Phase as displayed at `now_ms`: a running timer with nothing left
    /// reads `Expired` even before the next tick.
    pub fn phase_at(&self, now_ms: u64) -> RestPhase {
        if self.running && self.remaining_at(now_ms) == 0 {
            RestPhase::Expired
        } else {
            self.phase()
        }
    }

    /// 0.0 .. 1.0 share of the configured rest already used.
    pub fn progress(&self, now_ms: u64) -> f64 {
        let total = self.configured_seconds();
        if total == 0 {
            return 0.0;
        }
        let remaining = self.remaining_at(now_ms).min(total);
        1.0 - remaining as f64 / total as f64
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.running || self.configured_seconds() == 0 {
            return None;
        }
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.configured_seconds();
        }
        self.running = true;
        self.resumed_at_ms = now_ms;
        Some(Event::RestStarted {
            remaining_secs: self.remaining_seconds,
            at: timestamp(now_ms),
        })
    }

    /// Stop the countdown, keeping the remaining time.
    ///
    /// If the deadline already passed without a tick observing it, this is
    /// the expiry and `RestExpired` is returned instead of `RestPaused`.
    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.remaining_seconds = self.remaining_at(now_ms);
        self.running = false;
        if self.remaining_seconds == 0 {
            return Some(Event::RestExpired {
                at: timestamp(now_ms),
            });
        }
        Some(Event::RestPaused {
            remaining_secs: self.remaining_seconds,
            at: timestamp(now_ms),
        })
    }

    /// Change the configured duration and reset the remaining time to it.
    pub fn set_duration(
        &mut self,
        minutes: u32,
        seconds: u32,
        now_ms: u64,
    ) -> Result<Event, TimerError> {
        if self.running {
            return Err(TimerError::RunningLocked);
        }
        self.minutes = clamp_minutes(minutes);
        self.seconds = clamp_seconds(seconds);
        self.remaining_seconds = self.configured_seconds();
        Ok(Event::RestDurationChanged {
            configured_secs: self.remaining_seconds,
            at: timestamp(now_ms),
        })
    }

    /// Call periodically. Returns `Some(Event::RestExpired)` exactly once
    /// when a running countdown reaches zero.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        if !self.running || self.remaining_at(now_ms) > 0 {
            return None;
        }
        self.running = false;
        self.remaining_seconds = 0;
        Some(Event::RestExpired {
            at: timestamp(now_ms),
        })
    }
}

fn clamp_minutes(minutes: u32) -> u8 {
    minutes.min(u32::from(MAX_REST_MINUTES)) as u8
}

fn clamp_seconds(seconds: u32) -> u8 {
    seconds.min(u32::from(MAX_REST_SECONDS)) as u8
}

fn total_secs(minutes: u8, seconds: u8) -> u64 {
    u64::from(minutes) * 60 + u64::from(seconds)
}
