//! State holder tying the model, storage, timers and alarm together.
//!
//! Every mutator runs to completion: validate, mutate, persist, return.
//! A failed write does not roll back the in-memory change; the tracker
//! switches to [`Persistence::Degraded`] and keeps retrying on the next
//! mutation (or an explicit [`Tracker::flush`]) until a write succeeds.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::codec;
use crate::derive::{
    build_month_grid, build_visible_date_range, decorate_days, entries_for_day, filter_exercises,
    progress_buckets, progress_summary, CalendarCell, CategoryFilter, Granularity, ProgressBucket,
    ProgressSummary, WeekStart,
};
use crate::error::{ModelError, StorageError, TimerError};
use crate::events::Event;
use crate::model::preset::{self, PRESET_VERSION};
use crate::model::{Category, Entry, EntryDraft, EntryField, Exercise};
use crate::state::WorkoutState;
use crate::storage::{Config, SlotStore};
use crate::timer::{timestamp, Alarm, AlarmLoop, RestPhase, SilentAlarm};

/// Whether the last write reached storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Persistence {
    Healthy,
    /// Memory is ahead of storage.
    Degraded { error: String },
}

/// Top-level screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Calendar,
    Exercises,
    Schedule,
    Progress,
}

/// Displayed timer values at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub session_elapsed_secs: u64,
    pub session_running: bool,
    pub session_cycle_progress: f64,
    pub rest_remaining_secs: u64,
    pub rest_configured_secs: u64,
    pub rest_phase: RestPhase,
    pub rest_progress: f64,
    pub alarm_active: bool,
}

/// Progress chart data for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub exercise_id: String,
    pub granularity: Granularity,
    pub buckets: Vec<ProgressBucket>,
    pub summary: ProgressSummary,
}

pub struct Tracker<S: SlotStore> {
    state: WorkoutState,
    store: S,
    slot_key: String,
    persistence: Persistence,
    events: Vec<Event>,
    alarm: Box<dyn Alarm>,
    alarm_loop: AlarmLoop,
    alarm_enabled: bool,
    week_start: WeekStart,
    view: View,
}

impl<S: SlotStore> Tracker<S> {
    /// Load the state from `store` (or start fresh) using `config`.
    pub fn open(store: S, config: &Config) -> Self {
        let defaults = WorkoutState::with_rest_duration(
            config.rest_timer.default_minutes,
            config.rest_timer.default_seconds,
        );
        let state = codec::load(&store, &config.storage.slot_key, defaults);
        info!(
            exercises = state.exercises().len(),
            entries = state.entries().len(),
            "workout state loaded"
        );
        Self {
            state,
            store,
            slot_key: config.storage.slot_key.clone(),
            persistence: Persistence::Healthy,
            events: Vec::new(),
            alarm: Box::new(SilentAlarm),
            alarm_loop: AlarmLoop::new(config.alarm.duration_secs),
            alarm_enabled: config.alarm.enabled,
            week_start: config.calendar.week_start,
            view: View::Calendar,
        }
    }

    pub fn with_alarm(mut self, alarm: Box<dyn Alarm>) -> Self {
        self.alarm = alarm;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &WorkoutState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Take queued tracker events (persistence transitions, seeding).
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn timers(&self, now_ms: u64) -> TimerSnapshot {
        let session = self.state.session_timer();
        let rest = self.state.rest_timer();
        TimerSnapshot {
            session_elapsed_secs: session.elapsed_at(now_ms),
            session_running: session.is_running(),
            session_cycle_progress: session.cycle_progress(now_ms),
            rest_remaining_secs: rest.remaining_at(now_ms),
            rest_configured_secs: rest.configured_seconds(),
            rest_phase: rest.phase_at(now_ms),
            rest_progress: rest.progress(now_ms),
            alarm_active: self.alarm_loop.is_active(now_ms),
        }
    }

    /// Rolling 28-day calendar around `anchor`, or the full month grid.
    pub fn calendar(&self, anchor: NaiveDate, month_grid: bool, today: NaiveDate) -> Vec<CalendarCell> {
        let days = if month_grid {
            build_month_grid(anchor, self.week_start)
        } else {
            build_visible_date_range(anchor, self.week_start)
        };
        decorate_days(days, self.state.entries(), self.state.selected_date(), today)
    }

    pub fn exercise_list(&self, filter: CategoryFilter, search: &str) -> Vec<&Exercise> {
        filter_exercises(self.state.exercises(), filter, search)
    }

    /// Entries logged on the selected day.
    pub fn schedule(&self) -> Vec<&Entry> {
        entries_for_day(self.state.entries(), &self.state.selected_date_key())
    }

    pub fn progress(&self, exercise_id: &str, granularity: Granularity) -> ProgressView {
        let buckets = progress_buckets(self.state.entries(), exercise_id, granularity);
        let summary = progress_summary(&buckets);
        ProgressView {
            exercise_id: exercise_id.to_string(),
            granularity,
            buckets,
            summary,
        }
    }

    // ── Model commands ───────────────────────────────────────────────

    pub fn add_exercise(&mut self, name: &str, category: Category) -> Result<String, ModelError> {
        self.mutate(|s| s.add_exercise(name, category))
    }

    pub fn rename_exercise(&mut self, id: &str, new_name: &str) -> Result<(), ModelError> {
        self.mutate(|s| s.rename_exercise(id, new_name))
    }

    pub fn set_exercise_category(&mut self, id: &str, category: Category) -> Result<(), ModelError> {
        self.mutate(|s| s.set_exercise_category(id, category))
    }

    pub fn delete_exercise(&mut self, id: &str) -> Result<Exercise, ModelError> {
        self.mutate(|s| s.delete_exercise(id))
    }

    pub fn add_entry(
        &mut self,
        day: &str,
        exercise_id: &str,
        draft: EntryDraft,
    ) -> Result<String, ModelError> {
        self.mutate(|s| s.add_entry(day, exercise_id, draft))
    }

    pub fn update_entry_field(
        &mut self,
        entry_id: &str,
        field: EntryField,
        raw: &str,
    ) -> Result<(), ModelError> {
        self.mutate(|s| s.update_entry_field(entry_id, field, raw))
    }

    pub fn duplicate_entry(&mut self, entry_id: &str) -> Result<String, ModelError> {
        self.mutate(|s| s.duplicate_entry(entry_id))
    }

    pub fn delete_entry(&mut self, entry_id: &str) -> Result<Entry, ModelError> {
        self.mutate(|s| s.delete_entry(entry_id))
    }

    /// Seed the built-in catalog once per [`PRESET_VERSION`].
    pub fn seed_presets(&mut self) -> usize {
        if self.state.preset_version_applied() == Some(PRESET_VERSION) {
            return 0;
        }
        let inserted = self
            .state
            .seed_preset_exercises(preset::catalog(), PRESET_VERSION);
        self.events.push(Event::PresetsSeeded {
            version: PRESET_VERSION.to_string(),
            inserted,
        });
        self.commit();
        inserted
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.state.select_date(date);
        self.commit();
    }

    pub fn set_record_memo(&mut self, memo: &str) {
        self.state.set_record_memo(memo);
        self.commit();
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start_session(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.state.session_timer_mut().start(now_ms)?;
        self.commit();
        Some(event)
    }

    pub fn pause_session(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.state.session_timer_mut().pause(now_ms)?;
        self.commit();
        Some(event)
    }

    pub fn restart_session(&mut self, now_ms: u64) -> Event {
        let event = self.state.session_timer_mut().restart(now_ms);
        self.commit();
        event
    }

    pub fn start_rest(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.state.rest_timer_mut().start(now_ms)?;
        self.commit();
        Some(event)
    }

    pub fn pause_rest(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.state.rest_timer_mut().pause(now_ms)?;
        if matches!(event, Event::RestExpired { .. }) {
            self.on_rest_expired(now_ms);
        }
        self.commit();
        Some(event)
    }

    pub fn set_rest_duration(
        &mut self,
        minutes: u32,
        seconds: u32,
        now_ms: u64,
    ) -> Result<Event, TimerError> {
        let event = self
            .state
            .rest_timer_mut()
            .set_duration(minutes, seconds, now_ms)?;
        self.commit();
        Ok(event)
    }

    /// One-second interval body: detect rest expiry and end the alarm
    /// window once it has run its course.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(expired) = self.state.rest_timer_mut().tick(now_ms) {
            self.on_rest_expired(now_ms);
            self.commit();
            events.push(expired);
        }
        if self.alarm_loop.expire_if_due(now_ms) {
            self.alarm.silence();
            events.push(Event::AlarmSilenced {
                at: timestamp(now_ms),
            });
        }
        events
    }

    /// Stop a sounding alarm.
    pub fn silence_alarm(&mut self, now_ms: u64) -> Option<Event> {
        if !self.alarm_loop.stop() {
            return None;
        }
        self.alarm.silence();
        Some(Event::AlarmSilenced {
            at: timestamp(now_ms),
        })
    }

    /// Navigate to `view`. Leaving any view silences the alarm; entering
    /// the schedule restarts the session timer.
    pub fn switch_view(&mut self, view: View, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        events.extend(self.silence_alarm(now_ms));
        if view == View::Schedule && self.view != View::Schedule {
            events.push(self.restart_session(now_ms));
        }
        debug!(from = ?self.view, to = ?view, "view switched");
        self.view = view;
        events
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Write the state now, returning the storage error if it fails.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        let result = codec::save(&mut self.store, &self.slot_key, &self.state);
        self.record_save(result.as_ref().err().map(ToString::to_string));
        result
    }

    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut WorkoutState) -> Result<T, ModelError>,
    ) -> Result<T, ModelError> {
        let value = op(&mut self.state)?;
        self.commit();
        Ok(value)
    }

    fn commit(&mut self) {
        // The error is recorded in `persistence`; callers read it from there.
        let _ = self.flush();
    }

    fn record_save(&mut self, failure: Option<String>) {
        let was_healthy = self.persistence == Persistence::Healthy;
        match failure {
            None if was_healthy => {}
            None => {
                info!("state persisted again; leaving degraded mode");
                self.persistence = Persistence::Healthy;
                self.events.push(Event::PersistenceRestored);
            }
            Some(message) => {
                error!(error = %message, "failed to persist state; changes kept in memory only");
                if was_healthy {
                    self.events.push(Event::PersistenceDegraded {
                        message: message.clone(),
                    });
                }
                self.persistence = Persistence::Degraded { error: message };
            }
        }
    }

    fn on_rest_expired(&mut self, now_ms: u64) {
        info!("rest timer expired");
        if !self.alarm_enabled {
            return;
        }
        if self.alarm_loop.start(now_ms) {
            if let Err(e) = self.alarm.sound() {
                warn!(error = %e, "alarm could not be played");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlarmError;
    use crate::model::WeightUnit;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    const T0: u64 = 1_700_000_000_000;

    #[derive(Default)]
    struct Calls {
        sounded: usize,
        silenced: usize,
    }

    struct RecordingAlarm {
        calls: Rc<RefCell<Calls>>,
        fail: bool,
    }

    impl Alarm for RecordingAlarm {
        fn sound(&mut self) -> Result<(), AlarmError> {
            self.calls.borrow_mut().sounded += 1;
            if self.fail {
                Err(AlarmError::Unavailable)
            } else {
                Ok(())
            }
        }

        fn silence(&mut self) {
            self.calls.borrow_mut().silenced += 1;
        }
    }

    fn tracker_with_alarm(fail: bool) -> (Tracker<MemoryStore>, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let tracker = Tracker::open(MemoryStore::new(), &Config::default()).with_alarm(Box::new(
            RecordingAlarm {
                calls: Rc::clone(&calls),
                fail,
            },
        ));
        (tracker, calls)
    }

    #[test]
    fn mutations_persist_immediately() {
        let config = Config::default();
        let mut tracker = Tracker::open(MemoryStore::new(), &config);
        let id = tracker.add_exercise("Squat", Category::Legs).unwrap();
        tracker
            .add_entry("2024-03-01", &id, EntryDraft::from_input("100", WeightUnit::Kg, "5", "3"))
            .unwrap();

        let reloaded = Tracker::open(tracker.into_store(), &config);
        assert_eq!(reloaded.state().exercises().len(), 1);
        assert_eq!(reloaded.state().entries()[0].exercise_name, "Squat");
    }

    #[test]
    fn rejected_mutation_does_not_write() {
        let mut tracker = Tracker::open(MemoryStore::new(), &Config::default());
        assert!(tracker.add_exercise("  ", Category::Legs).is_err());
        assert!(tracker
            .store()
            .read(&Config::default().storage.slot_key)
            .unwrap()
            .is_none());
    }

    #[test]
    fn quota_failure_enters_and_leaves_degraded_mode() {
        let mut tracker = Tracker::open(MemoryStore::with_quota(8), &Config::default());
        tracker.add_exercise("Squat", Category::Legs).unwrap();

        assert!(matches!(tracker.persistence(), Persistence::Degraded { .. }));
        // Memory keeps the change.
        assert_eq!(tracker.state().exercises().len(), 1);
        assert!(matches!(
            tracker.drain_events().as_slice(),
            [Event::PersistenceDegraded { .. }]
        ));

        // A second failure does not repeat the event.
        tracker.set_record_memo("legs");
        assert!(tracker.drain_events().is_empty());

        tracker.store_mut().set_quota(None);
        tracker.flush().unwrap();
        assert_eq!(tracker.persistence(), &Persistence::Healthy);
        assert_eq!(tracker.drain_events(), vec![Event::PersistenceRestored]);
    }

    #[test]
    fn rest_expiry_sounds_alarm_once_and_window_ends() {
        let (mut tracker, calls) = tracker_with_alarm(false);
        tracker.set_rest_duration(0, 5, T0).unwrap();
        tracker.start_rest(T0).unwrap();

        assert!(tracker.tick(T0 + 4_000).is_empty());
        let events = tracker.tick(T0 + 5_000);
        assert!(matches!(events.as_slice(), [Event::RestExpired { .. }]));
        assert!(tracker.tick(T0 + 6_000).is_empty());
        assert_eq!(calls.borrow().sounded, 1);
        assert!(tracker.timers(T0 + 6_000).alarm_active);

        let events = tracker.tick(T0 + 15_000);
        assert!(matches!(events.as_slice(), [Event::AlarmSilenced { .. }]));
        assert_eq!(calls.borrow().silenced, 1);
        assert_eq!(tracker.timers(T0 + 15_000).rest_phase, RestPhase::Expired);
    }

    #[test]
    fn alarm_failure_does_not_block_expiry() {
        let (mut tracker, calls) = tracker_with_alarm(true);
        tracker.set_rest_duration(0, 1, T0).unwrap();
        tracker.start_rest(T0);
        let events = tracker.tick(T0 + 1_000);
        assert_eq!(events.len(), 1);
        assert_eq!(calls.borrow().sounded, 1);
        assert_eq!(tracker.state().rest_timer().phase(), RestPhase::Expired);
    }

    #[test]
    fn switching_view_silences_alarm_and_restarts_session() {
        let (mut tracker, calls) = tracker_with_alarm(false);
        tracker.set_rest_duration(0, 1, T0).unwrap();
        tracker.start_rest(T0);
        tracker.tick(T0 + 1_000);

        let events = tracker.switch_view(View::Schedule, T0 + 2_000);
        assert!(matches!(
            events.as_slice(),
            [Event::AlarmSilenced { .. }, Event::SessionRestarted { .. }]
        ));
        assert_eq!(calls.borrow().silenced, 1);
        assert_eq!(tracker.timers(T0 + 12_000).session_elapsed_secs, 10);

        // Staying on the schedule view does not restart again.
        assert!(tracker.switch_view(View::Schedule, T0 + 20_000).is_empty());
        assert_eq!(tracker.timers(T0 + 22_000).session_elapsed_secs, 20);
    }

    #[test]
    fn rest_duration_locked_while_running() {
        let mut tracker = Tracker::open(MemoryStore::new(), &Config::default());
        tracker.start_rest(T0);
        assert_eq!(
            tracker.set_rest_duration(5, 0, T0 + 1_000),
            Err(TimerError::RunningLocked)
        );
    }

    #[test]
    fn timers_survive_reload() {
        let config = Config::default();
        let mut tracker = Tracker::open(MemoryStore::new(), &config);
        tracker.start_session(T0);
        tracker.start_rest(T0);

        let reloaded = Tracker::open(tracker.into_store(), &config);
        let snap = reloaded.timers(T0 + 40_000);
        assert_eq!(snap.session_elapsed_secs, 40);
        assert_eq!(snap.rest_remaining_secs, 50);
        assert!(snap.session_running);
        assert_eq!(snap.rest_phase, RestPhase::Running);
    }

    #[test]
    fn snapshot_reports_overdue_rest_as_expired_before_tick() {
        let config = Config::default();
        let mut tracker = Tracker::open(MemoryStore::new(), &config);
        tracker.start_rest(T0);

        let reloaded = Tracker::open(tracker.into_store(), &config);
        let snap = reloaded.timers(T0 + 200_000);
        assert_eq!(snap.rest_remaining_secs, 0);
        assert_eq!(snap.rest_phase, RestPhase::Expired);
        assert!((snap.rest_progress - 1.0).abs() < 1e-9);
    }

    #[test]
    fn seeding_runs_once() {
        let mut tracker = Tracker::open(MemoryStore::new(), &Config::default());
        let inserted = tracker.seed_presets();
        assert_eq!(inserted, preset::catalog().len());
        assert_eq!(tracker.seed_presets(), 0);
        assert_eq!(tracker.drain_events().len(), 1);
    }
}
