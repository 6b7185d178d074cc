//! Date keys and calendar windows.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::Entry;

/// Cells in the rolling calendar window.
pub const VISIBLE_RANGE_DAYS: u64 = 28;
/// Cells in the full month grid (six weeks).
pub const MONTH_GRID_DAYS: u64 = 42;

/// First day of the calendar week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

/// One cell of a calendar view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub date_key: String,
    /// Day falls outside the anchor's month. Display-only.
    pub outside: bool,
}

/// Canonical `YYYY-MM-DD` key, zero-padded.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `YYYY-MM-DD` key. Rejects dates that do not exist (`2023-02-29`).
pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Calendar date of a timestamp in the local time zone.
pub fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the week containing `date`.
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = (date.weekday().num_days_from_sunday() + 7
        - week_start.weekday().num_days_from_sunday())
        % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Rolling 28-day window: the two weeks before the anchor's week, the
/// anchor's week, and the week after.
pub fn build_visible_date_range(anchor: NaiveDate, week_start: WeekStart) -> Vec<CalendarDay> {
    let week = start_of_week(anchor, week_start);
    let first = week.checked_sub_days(Days::new(14)).unwrap_or(week);
    days_from(first, VISIBLE_RANGE_DAYS, anchor)
}

/// Six-week grid covering the anchor's whole month, padded with the
/// neighbouring months' days.
pub fn build_month_grid(anchor: NaiveDate, week_start: WeekStart) -> Vec<CalendarDay> {
    let first_of_month = anchor.with_day(1).unwrap_or(anchor);
    let first = start_of_week(first_of_month, week_start);
    days_from(first, MONTH_GRID_DAYS, anchor)
}

fn days_from(first: NaiveDate, count: u64, anchor: NaiveDate) -> Vec<CalendarDay> {
    (0..count)
        .filter_map(|offset| first.checked_add_days(Days::new(offset)))
        .map(|date| CalendarDay {
            date,
            date_key: date_key(date),
            outside: date.year() != anchor.year() || date.month() != anchor.month(),
        })
        .collect()
}

/// A calendar cell decorated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    #[serde(flatten)]
    pub day: CalendarDay,
    pub entry_count: usize,
    pub selected: bool,
    pub today: bool,
}

/// Attach entry counts and selection/today flags to a window of days.
pub fn decorate_days(
    days: Vec<CalendarDay>,
    entries: &[Entry],
    selected: NaiveDate,
    today: NaiveDate,
) -> Vec<CalendarCell> {
    let counts = count_entries_by_day(entries);
    days.into_iter()
        .map(|day| CalendarCell {
            entry_count: counts.get(&day.date_key).copied().unwrap_or(0),
            selected: day.date == selected,
            today: day.date == today,
            day,
        })
        .collect()
}

/// Every distinct day with at least one entry.
pub fn aggregate_workout_days(entries: &[Entry]) -> BTreeSet<String> {
    entries.iter().map(|e| e.date_key.clone()).collect()
}

/// Entry count per day.
pub fn count_entries_by_day(entries: &[Entry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.date_key.clone()).or_insert(0) += 1;
    }
    counts
}

/// Entries logged on one day, in insertion order.
pub fn entries_for_day<'a>(entries: &'a [Entry], key: &str) -> Vec<&'a Entry> {
    entries.iter().filter(|e| e.date_key == key).collect()
}
