//! Volume bucketing for the progress chart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::model::{sanitize_weight, Entry, WeightUnit, LB_TO_KG};

/// Bucket size for the progress chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Month,
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressBucket {
    /// `YYYY-MM-DD` or `YYYY-MM`
    pub label: String,
    pub value: f64,
}

/// Aggregate figures over a bucket series.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ProgressSummary {
    pub bucket_count: usize,
    pub total_volume: f64,
    pub average_volume: f64,
    pub peak: Option<ProgressBucket>,
    pub latest: Option<ProgressBucket>,
    /// Latest bucket minus first bucket.
    pub change_from_first: f64,
}

/// `weight * reps * sets`, in the entry's own unit.
pub fn entry_volume(entry: &Entry) -> f64 {
    sanitize_weight(entry.weight) * f64::from(entry.reps) * f64::from(entry.sets)
}

pub fn weight_in_kg(weight: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Kg => weight,
        WeightUnit::Lb => weight * LB_TO_KG,
    }
}

/// Summed volume per day or month for one exercise, ascending by label.
pub fn progress_buckets(
    entries: &[Entry],
    exercise_id: &str,
    granularity: Granularity,
) -> Vec<ProgressBucket> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.exercise_id == exercise_id) {
        let label = match granularity {
            Granularity::Day => entry.date_key.as_str(),
            Granularity::Month => entry.date_key.get(..7).unwrap_or(&entry.date_key),
        };
        *sums.entry(label).or_insert(0.0) += entry_volume(entry);
    }
    sums.into_iter()
        .map(|(label, value)| ProgressBucket {
            label: label.to_string(),
            value,
        })
        .collect()
}

pub fn progress_summary(buckets: &[ProgressBucket]) -> ProgressSummary {
    let Some(first) = buckets.first() else {
        return ProgressSummary::default();
    };
    let total_volume: f64 = buckets.iter().map(|b| b.value).sum();
    // Earliest bucket wins ties.
    let peak = buckets.iter().fold(first, |best, b| {
        if b.value > best.value {
            b
        } else {
            best
        }
    });
    let latest = buckets.last().unwrap_or(first);
    ProgressSummary {
        bucket_count: buckets.len(),
        total_volume,
        average_volume: total_volume / buckets.len() as f64,
        peak: Some(peak.clone()),
        latest: Some(latest.clone()),
        change_from_first: latest.value - first.value,
    }
}
