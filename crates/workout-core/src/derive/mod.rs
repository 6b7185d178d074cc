//! Derivation engine: pure functions every view is redrawn from.
//!
//! Nothing here mutates or performs I/O.

mod calendar;
mod catalog;
mod progress;

pub use calendar::{
    aggregate_workout_days, build_month_grid, build_visible_date_range, count_entries_by_day,
    date_key, decorate_days, entries_for_day, local_date, parse_date_key, start_of_week,
    today, CalendarCell, CalendarDay, WeekStart, MONTH_GRID_DAYS, VISIBLE_RANGE_DAYS,
};
pub use catalog::{filter_exercises, CategoryFilter};
pub use progress::{
    entry_volume, progress_buckets, progress_summary, weight_in_kg, Granularity, ProgressBucket,
    ProgressSummary,
};
