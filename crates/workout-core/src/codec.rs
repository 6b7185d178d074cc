//! Persistence codec for the state slot.
//!
//! Encoding is a plain serde serialization of the whole state. Decoding
//! never trusts the stored shape: the text is parsed into a
//! `serde_json::Value` and every field is read on its own, falling back to
//! its default when missing or mistyped. One bad entry drops that entry,
//! not the whole document.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::derive::{date_key, local_date, parse_date_key, today};
use crate::error::StorageError;
use crate::model::preset::infer_category;
use crate::model::{
    coerce_count, coerce_weight, new_id, sanitize_count, sanitize_weight, Category, Entry,
    Exercise, WeightUnit, FALLBACK_EXERCISE_NAME,
};
use crate::state::WorkoutState;
use crate::storage::SlotStore;
use crate::timer::{RestTimer, SessionTimer};

/// On-disk layout. Field names are part of the stored format.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState<'a> {
    exercises: &'a [Exercise],
    entries: &'a [Entry],
    preset_version_applied: Option<&'a str>,
    record_memo: &'a str,
    schedule_timer_elapsed_seconds: u64,
    schedule_timer_running: bool,
    schedule_session_started_at: u64,
    rest_timer_minutes: u8,
    rest_timer_seconds: u8,
    rest_timer_remaining_seconds: u64,
    rest_timer_running: bool,
    rest_timer_started_at: u64,
    selected_date: String,
}

/// Serialize the full state.
pub fn encode(state: &WorkoutState) -> Result<String, serde_json::Error> {
    let session = &state.session_timer;
    let rest = &state.rest_timer;
    serde_json::to_string(&PersistedState {
        exercises: &state.exercises,
        entries: &state.entries,
        preset_version_applied: state.preset_version_applied.as_deref(),
        record_memo: &state.record_memo,
        schedule_timer_elapsed_seconds: session.stored_elapsed_seconds(),
        schedule_timer_running: session.is_running(),
        schedule_session_started_at: session.resumed_at_ms(),
        rest_timer_minutes: rest.minutes(),
        rest_timer_seconds: rest.seconds(),
        rest_timer_remaining_seconds: rest.stored_remaining_seconds(),
        rest_timer_running: rest.is_running(),
        rest_timer_started_at: rest.resumed_at_ms(),
        selected_date: date_key(state.selected_date),
    })
}

/// Parse stored text. Anything that is not a JSON object yields the
/// default state; inside an object, fields default one by one.
pub fn decode(raw: &str) -> WorkoutState {
    decode_with_defaults(raw, WorkoutState::default())
}

/// [`decode`] with a caller-supplied baseline for absent scalars.
pub fn decode_with_defaults(raw: &str, defaults: WorkoutState) -> WorkoutState {
    let root = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(root)) => root,
        Ok(_) => {
            warn!("stored state is not an object; using defaults");
            return defaults;
        }
        Err(e) => {
            warn!(error = %e, "stored state failed to parse; using defaults");
            return defaults;
        }
    };

    let exercises = decode_exercises(root.get("exercises"));
    let entries = decode_entries(root.get("entries"), &exercises);

    let session_running = bool_field(&root, "scheduleTimerRunning").unwrap_or(false);
    let session_started = u64_field(&root, "scheduleSessionStartedAt").unwrap_or(0);
    let session_timer = SessionTimer::from_parts(
        u64_field(&root, "scheduleTimerElapsedSeconds").unwrap_or(0),
        session_running && session_started > 0,
        session_started,
    );

    let base_rest = &defaults.rest_timer;
    let minutes = u64_field(&root, "restTimerMinutes")
        .map_or(u32::from(base_rest.minutes()), saturate_u32);
    let seconds = u64_field(&root, "restTimerSeconds")
        .map_or(u32::from(base_rest.seconds()), saturate_u32);
    let configured = RestTimer::new(minutes, seconds).configured_seconds();
    let rest_running = bool_field(&root, "restTimerRunning").unwrap_or(false);
    let rest_started = u64_field(&root, "restTimerStartedAt").unwrap_or(0);
    let rest_timer = RestTimer::from_parts(
        minutes,
        seconds,
        u64_field(&root, "restTimerRemainingSeconds").unwrap_or(configured),
        rest_running && rest_started > 0,
        rest_started,
    );

    let selected_date = root
        .get("selectedDate")
        .and_then(Value::as_str)
        .and_then(parse_selected_date)
        .unwrap_or_else(today);

    debug!(
        exercises = exercises.len(),
        entries = entries.len(),
        "state decoded"
    );

    WorkoutState {
        exercises,
        entries,
        preset_version_applied: root
            .get("presetVersionApplied")
            .and_then(Value::as_str)
            .map(str::to_string),
        record_memo: str_field(&root, "recordMemo").unwrap_or_default().to_string(),
        selected_date,
        session_timer,
        rest_timer,
    }
}

/// Read and decode the slot. Never fails: unreadable slots log a warning
/// and produce `defaults`.
pub fn load<S: SlotStore + ?Sized>(store: &S, key: &str, defaults: WorkoutState) -> WorkoutState {
    match store.read(key) {
        Ok(Some(raw)) => decode_with_defaults(&raw, defaults),
        Ok(None) => defaults,
        Err(e) => {
            warn!(error = %e, key, "failed to read state slot; using defaults");
            defaults
        }
    }
}

/// Encode the full state and overwrite the slot.
pub fn save<S: SlotStore + ?Sized>(
    store: &mut S,
    key: &str,
    state: &WorkoutState,
) -> Result<(), StorageError> {
    let raw = encode(state)?;
    store.write(key, &raw)?;
    debug!(key, bytes = raw.len(), "state saved");
    Ok(())
}

fn decode_exercises(value: Option<&Value>) -> Vec<Exercise> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Some(obj) = item.as_object() else {
            continue;
        };
        let Some(name) = str_field(obj, "name").filter(|n| !n.trim().is_empty()) else {
            warn!("dropping stored exercise without a name");
            continue;
        };
        if !names.insert(name.to_lowercase()) {
            warn!(name, "dropping stored exercise with duplicate name");
            continue;
        }
        let id = str_field(obj, "id")
            .filter(|id| !id.is_empty() && !ids.contains(*id))
            .map_or_else(new_id, str::to_string);
        ids.insert(id.clone());
        let category = str_field(obj, "category")
            .and_then(Category::parse)
            .or_else(|| infer_category(name))
            .unwrap_or_default();
        out.push(Exercise {
            id,
            name: name.to_string(),
            category,
            created_at: timestamp_field(obj, "createdAt"),
        });
    }
    out
}

fn decode_entries(value: Option<&Value>, exercises: &[Exercise]) -> Vec<Entry> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut ids = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Some(obj) = item.as_object() else {
            continue;
        };
        let Some(date) = str_field(obj, "dateKey").and_then(parse_date_key) else {
            warn!("dropping stored entry without a valid date");
            continue;
        };
        let id = str_field(obj, "id")
            .filter(|id| !id.is_empty() && !ids.contains(*id))
            .map_or_else(new_id, str::to_string);
        ids.insert(id.clone());
        let exercise_id = str_field(obj, "exerciseId").unwrap_or_default().to_string();
        let live = exercises.iter().find(|e| e.id == exercise_id);
        let exercise_name = str_field(obj, "exerciseName")
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .or_else(|| live.map(|e| e.name.clone()))
            .unwrap_or_else(|| FALLBACK_EXERCISE_NAME.to_string());
        let exercise_category = str_field(obj, "exerciseCategory")
            .and_then(Category::parse)
            .or_else(|| live.map(|e| e.category))
            .or_else(|| infer_category(&exercise_name))
            .unwrap_or_default();
        out.push(Entry {
            id,
            date_key: date_key(date),
            exercise_id,
            exercise_name,
            exercise_category,
            weight: weight_field(obj, "weight"),
            unit: str_field(obj, "unit")
                .and_then(|u| u.parse::<WeightUnit>().ok())
                .unwrap_or_default(),
            reps: count_field(obj, "reps"),
            sets: count_field(obj, "sets"),
            note: str_field(obj, "note").unwrap_or_default().to_string(),
            created_at: timestamp_field(obj, "createdAt"),
        });
    }
    out
}

fn parse_selected_date(raw: &str) -> Option<NaiveDate> {
    parse_date_key(raw).or_else(|| {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| local_date(dt.with_timezone(&Utc)))
    })
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

/// Non-negative whole number; fractional values are floored.
fn u64_field(obj: &Map<String, Value>, key: &str) -> Option<u64> {
    let value = obj.get(key)?;
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.floor().min(u64::MAX as f64) as u64)
    })
}

fn weight_field(obj: &Map<String, Value>, key: &str) -> f64 {
    match obj.get(key) {
        Some(Value::Number(n)) => sanitize_weight(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => coerce_weight(s),
        _ => 0.0,
    }
}

fn count_field(obj: &Map<String, Value>, key: &str) -> u32 {
    match obj.get(key) {
        Some(Value::Number(n)) => sanitize_count(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => coerce_count(s),
        _ => 0,
    }
}

/// RFC 3339 string or epoch milliseconds; the Unix epoch otherwise.
fn timestamp_field(obj: &Map<String, Value>, key: &str) -> DateTime<Utc> {
    match obj.get(key) {
        Some(v @ Value::String(_)) => {
            serde_json::from_value::<DateTime<Utc>>(v.clone()).unwrap_or_default()
        }
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_default(),
        _ => DateTime::<Utc>::default(),
    }
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
