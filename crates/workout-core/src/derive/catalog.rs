//! Exercise list filtering and search.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::{Category, Exercise};

/// Category selector for the exercise list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        Category::parse(s)
            .map(CategoryFilter::Only)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => c.fmt(f),
        }
    }
}

/// Exercises matching the category filter whose name contains `search`
/// (case-insensitive), sorted by name.
pub fn filter_exercises<'a>(
    exercises: &'a [Exercise],
    filter: CategoryFilter,
    search: &str,
) -> Vec<&'a Exercise> {
    let needle = search.trim().to_lowercase();
    let mut matched: Vec<&Exercise> = exercises
        .iter()
        .filter(|e| filter.matches(e.category))
        .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
        .collect();
    matched.sort_by(|a, b| compare_names(&a.name, &b.name));
    matched
}

/// Case-folded comparison, ties broken by the raw text so the order is total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
