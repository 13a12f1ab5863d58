//! Searchable, sorted listing of logged sessions with totals.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    models::{CanonicalDate, MetadataLog, WorkoutLog},
    utils::round1,
};

/// How far back from today a session may be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
    ThreeMonths,
}

impl Period {
    /// Maximum age in days; `None` for no limit. Future dates always pass.
    pub fn max_age_days(self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::ThreeMonths => Some(90),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionSort {
    /// Newest first.
    #[default]
    DateDesc,
    DateAsc,
    /// Highest reported volume first; newest first among equal volumes.
    Volume,
}

#[derive(Debug, Clone, Default)]
pub struct SessionQuery {
    /// Case-insensitive match on exercise names and title, or a fragment of the date key.
    pub search: Option<String>,
    pub period: Period,
    pub sort: SessionSort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub date: CanonicalDate,
    pub title: Option<String>,
    pub duration: Option<String>,
    pub volume_text: Option<String>,
    pub exercises: Vec<String>,
    pub sets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_workouts: usize,
    pub total_exercises: usize,
    pub total_sets: usize,
    pub avg_exercises_per_workout: f64,
}

/// Numeric value of a reported volume such as `8.450 kg` (8450) or `1.234,5 kg`.
///
/// Dots are thousands separators and a comma is the decimal mark. Text without a
/// usable number counts as zero.
pub fn volume_value(volume_text: &str) -> f64 {
    let digits: String = volume_text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    digits.replace(',', ".").parse().unwrap_or(0.0)
}

fn matches_search(row: &SessionRow, needle: &str) -> bool {
    let lower = needle.to_lowercase();
    row.exercises.iter().any(|e| e.to_lowercase().contains(&lower))
        || row
            .title
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(&lower))
        || row.date.as_str().contains(needle)
}

/// Sessions in the log that pass `query`, in the requested order.
///
/// Dates with no exercises are never listed.
pub fn list_sessions(
    log: &WorkoutLog,
    metadata: &MetadataLog,
    today: &CanonicalDate,
    query: &SessionQuery,
) -> Vec<SessionRow> {
    let needle = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let max_age = query.period.max_age_days();

    let mut rows: Vec<SessionRow> = log
        .iter()
        .filter(|(_, day)| !day.is_empty())
        .filter(|(date, _)| {
            max_age.is_none_or(|max| (today.naive() - date.naive()).num_days() <= max)
        })
        .map(|(date, day)| {
            let meta = metadata.get(date);
            SessionRow {
                date: date.clone(),
                title: meta.and_then(|m| m.title.clone()),
                duration: meta.and_then(|m| m.duration.clone()),
                volume_text: meta.and_then(|m| m.volume_text.clone()),
                exercises: day.keys().cloned().collect(),
                sets: day.values().map(|sets| sets.len()).sum(),
            }
        })
        .filter(|row| needle.is_none_or(|n| matches_search(row, n)))
        .collect();

    match query.sort {
        SessionSort::DateAsc => {}
        SessionSort::DateDesc => rows.reverse(),
        SessionSort::Volume => {
            rows.reverse();
            let volume = |r: &SessionRow| r.volume_text.as_deref().map_or(0.0, volume_value);
            rows.sort_by(|a, b| volume(b).total_cmp(&volume(a)));
        }
    }

    rows
}

pub fn session_stats(rows: &[SessionRow]) -> SessionStats {
    let total_exercises: usize = rows.iter().map(|r| r.exercises.len()).sum();
    let avg = if rows.is_empty() {
        0.0
    } else {
        round1(total_exercises as f64 / rows.len() as f64)
    };

    SessionStats {
        total_workouts: rows.len(),
        total_exercises,
        total_sets: rows.iter().map(|r| r.sets).sum(),
        avg_exercises_per_workout: avg,
    }
}
