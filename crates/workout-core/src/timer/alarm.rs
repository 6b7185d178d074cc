//! Rest-expiry alarm.
//!
//! The sound itself belongs to the shell ([`Alarm`]). [`AlarmLoop`] tracks
//! the bounded repeat window so the tracker can stop a looping sound when
//! the window runs out or the user navigates away.

use crate::error::AlarmError;

pub const DEFAULT_ALARM_SECS: u64 = 10;

/// Audible alarm provided by the shell.
pub trait Alarm {
    /// Begin playing the alarm pattern.
    fn sound(&mut self) -> Result<(), AlarmError>;

    /// Stop any playback. Must be safe to call when nothing is playing.
    fn silence(&mut self);
}

/// Alarm that does nothing. Used by tests and headless shells.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlarm;

impl Alarm for SilentAlarm {
    fn sound(&mut self) -> Result<(), AlarmError> {
        Ok(())
    }

    fn silence(&mut self) {}
}

/// Bounded alarm repeat window. Start and stop are idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmLoop {
    started_at_ms: Option<u64>,
    duration_ms: u64,
}

impl AlarmLoop {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            started_at_ms: None,
            duration_ms: duration_secs.saturating_mul(1000),
        }
    }

    /// Returns `false` if the loop was already active.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_active(now_ms) {
            return false;
        }
        self.started_at_ms = Some(now_ms);
        true
    }

    /// Returns `false` if nothing was running.
    pub fn stop(&mut self) -> bool {
        self.started_at_ms.take().is_some()
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        self.started_at_ms
            .is_some_and(|started| now_ms.saturating_sub(started) < self.duration_ms)
    }

    /// Clear the loop once its window has elapsed. Returns `true` on the
    /// call that clears it.
    pub fn expire_if_due(&mut self, now_ms: u64) -> bool {
        match self.started_at_ms {
            Some(_) if !self.is_active(now_ms) => {
                self.started_at_ms = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for AlarmLoop {
    fn default() -> Self {
        Self::new(DEFAULT_ALARM_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut alarm = AlarmLoop::new(10);
        assert!(alarm.start(0));
        assert!(!alarm.start(1_000));
        assert!(alarm.stop());
        assert!(!alarm.stop());
    }

    #[test]
    fn loop_expires_after_window() {
        let mut alarm = AlarmLoop::new(10);
        alarm.start(1_000);
        assert!(alarm.is_active(10_999));
        assert!(!alarm.expire_if_due(10_999));
        assert!(alarm.expire_if_due(11_000));
        assert!(!alarm.expire_if_due(12_000));
        assert!(!alarm.is_active(11_000));
    }
}
