//! Exercise and entry records.
//!
//! An [`Entry`] keeps a denormalized copy of its exercise's name and
//! category. The copy is refreshed on rename/category edits and survives
//! deletion of the exercise, so history stays readable.

pub mod preset;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Pounds to kilograms.
pub const LB_TO_KG: f64 = 0.45359237;

/// Snapshot name used when an entry has lost every trace of its exercise.
pub const FALLBACK_EXERCISE_NAME: &str = "Workout";

/// Muscle-group category of an exercise.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Glutes,
    Cardio,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Chest,
        Category::Back,
        Category::Legs,
        Category::Shoulders,
        Category::Arms,
        Category::Glutes,
        Category::Cardio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Chest => "chest",
            Category::Back => "back",
            Category::Legs => "legs",
            Category::Shoulders => "shoulders",
            Category::Arms => "arms",
            Category::Glutes => "glutes",
            Category::Cardio => "cardio",
        }
    }

    /// Parse a category label.
    ///
    /// Case-insensitive. Also accepts the labels written by the first
    /// release of the web app, so older stored data keeps its grouping.
    pub fn parse(raw: &str) -> Option<Category> {
        let label = raw.trim();
        let category = match label.to_lowercase().as_str() {
            "chest" | "胸" => Category::Chest,
            "back" | "背" => Category::Back,
            "legs" | "leg" | "腿" => Category::Legs,
            "shoulders" | "shoulder" | "肩膀" => Category::Shoulders,
            "arms" | "arm" | "手臂" => Category::Arms,
            "glutes" | "glute" | "臀" => Category::Glutes,
            "cardio" | "有氧" => Category::Cardio,
            _ => return None,
        };
        Some(category)
    }

    /// Parse, falling back to [`Category::default`] for unknown labels.
    pub fn parse_or_default(raw: &str) -> Category {
        Self::parse(raw).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit a weight was logged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lb => "lb",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "kg" => Ok(WeightUnit::Kg),
            "lb" => Ok(WeightUnit::Lb),
            other => Err(ModelError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

/// One logged set-group for an exercise on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date_key: String,
    /// Weak reference; may dangle after the exercise is deleted.
    pub exercise_id: String,
    pub exercise_name: String,
    pub exercise_category: Category,
    pub weight: f64,
    pub unit: WeightUnit,
    pub reps: u32,
    pub sets: u32,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Field values for a new entry. Snapshot fields come from the exercise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntryDraft {
    pub weight: f64,
    pub unit: WeightUnit,
    pub reps: u32,
    pub sets: u32,
    pub note: String,
}

impl EntryDraft {
    /// Build a draft from raw form input, coercing each numeric field.
    pub fn from_input(weight: &str, unit: WeightUnit, reps: &str, sets: &str) -> Self {
        Self {
            weight: coerce_weight(weight),
            unit,
            reps: coerce_count(reps),
            sets: coerce_count(sets),
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Editable entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Weight,
    Unit,
    Reps,
    Sets,
    Note,
    Date,
}

impl FromStr for EntryField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weight" => Ok(EntryField::Weight),
            "unit" => Ok(EntryField::Unit),
            "reps" => Ok(EntryField::Reps),
            "sets" => Ok(EntryField::Sets),
            "note" => Ok(EntryField::Note),
            "date" | "datekey" => Ok(EntryField::Date),
            other => Err(ModelError::UnknownField(other.to_string())),
        }
    }
}

/// Coerce weight input: empty, invalid, non-finite and negative become 0.
pub fn coerce_weight(raw: &str) -> f64 {
    sanitize_weight(raw.trim().parse::<f64>().unwrap_or(0.0))
}

pub fn sanitize_weight(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Coerce a reps/sets input to a whole count. Fractions truncate.
pub fn coerce_count(raw: &str) -> u32 {
    sanitize_count(raw.trim().parse::<f64>().unwrap_or(0.0))
}

pub fn sanitize_count(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.trunc().min(u32::MAX as f64) as u32
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
