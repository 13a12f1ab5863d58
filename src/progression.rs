//! Strength progression derived from the canonical log.
//!
//! For a given exercise every logged date contributes its best set, the one with the
//! largest `weight × reps`, and from it an estimated one-rep max. Only sets whose
//! load is a plain number take part; bodyweight markers, ranges and timed sets are
//! left out rather than guessed at.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    models::{DecodedSet, ExerciseHistoryEntry, ExerciseSets, OneRMFormula, WorkoutLog},
    utils::calculate_1rm,
};

/// Fewer entries than this and there is no trend to show.
pub const MIN_HISTORY_ENTRIES: usize = 2;

// `60`, `60 kg`, `22,5 kg`, `135 lbs`
static PLAIN_WEIGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+(?:[.,]\d+)?)\s*(?:kg|kgs|lb|lbs)?$").unwrap());

/// The load of a set as a number, if its text is a bare number with an optional unit.
pub fn plain_weight(weight_text: &str) -> Option<f64> {
    let caps = PLAIN_WEIGHT.captures(weight_text.trim())?;
    caps[1].replace(',', ".").parse().ok()
}

/// Best `(weight, reps)` among the numeric sets, first one wins on equal products.
fn best_set(sets: &ExerciseSets) -> Option<(f64, u32)> {
    let mut best: Option<(f64, u32)> = None;

    for logged in sets.values() {
        let DecodedSet::RepBased { reps, weight_text } = &logged.set else {
            continue;
        };
        if *reps == 0 {
            continue;
        }
        let Some(weight) = plain_weight(weight_text) else {
            continue;
        };

        let score = weight * *reps as f64;
        match best {
            Some((w, r)) if score <= w * r as f64 => {}
            _ => best = Some((weight, *reps)),
        }
    }

    best
}

/// Per-date history of `exercise_name` with Epley estimates, oldest first.
pub fn history(log: &WorkoutLog, exercise_name: &str) -> Vec<ExerciseHistoryEntry> {
    history_with(log, exercise_name, OneRMFormula::Epley)
}

/// Same as [`history`] with a chosen one-rep-max formula.
pub fn history_with(
    log: &WorkoutLog,
    exercise_name: &str,
    formula: OneRMFormula,
) -> Vec<ExerciseHistoryEntry> {
    let mut entries: Vec<ExerciseHistoryEntry> = log
        .iter()
        .filter_map(|(date, day)| {
            let (weight, reps) = best_set(day.get(exercise_name)?)?;
            Some(ExerciseHistoryEntry {
                date: date.clone(),
                max_weight: weight,
                reps_at_max: reps,
                volume: weight * reps as f64,
                estimated_1rm: calculate_1rm(weight, reps, formula),
            })
        })
        .collect();

    entries.sort_by(|a, b| a.date.cmp(&b.date));
    entries
}

/// First-to-last comparison of a history, as shown next to charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionSummary {
    pub sessions: usize,
    pub start_weight: f64,
    pub current_weight: f64,
    pub weight_progress: f64,
    pub start_1rm: f64,
    pub current_1rm: f64,
    pub rm_progress: f64,
    pub max_weight: f64,
    pub max_volume: f64,
}

/// `None` means there is not enough history yet, which is not an error.
pub fn summarize(history: &[ExerciseHistoryEntry]) -> Option<ProgressionSummary> {
    if history.len() < MIN_HISTORY_ENTRIES {
        return None;
    }
    let first = history.first()?;
    let last = history.last()?;

    Some(ProgressionSummary {
        sessions: history.len(),
        start_weight: first.max_weight,
        current_weight: last.max_weight,
        weight_progress: last.max_weight - first.max_weight,
        start_1rm: first.estimated_1rm,
        current_1rm: last.estimated_1rm,
        rm_progress: last.estimated_1rm - first.estimated_1rm,
        max_weight: history.iter().map(|e| e.max_weight).fold(f64::MIN, f64::max),
        max_volume: history.iter().map(|e| e.volume).fold(f64::MIN, f64::max),
    })
}

/// Every exercise name in the log, sorted and without duplicates.
pub fn all_exercises(log: &WorkoutLog) -> Vec<String> {
    log.iter()
        .flat_map(|(_, day)| day.keys())
        .sorted()
        .dedup()
        .cloned()
        .collect()
}

/// How many dates each exercise appears on, most frequent first.
pub fn exercise_frequency(log: &WorkoutLog) -> Vec<(String, usize)> {
    log.iter()
        .flat_map(|(_, day)| day.keys())
        .counts()
        .into_iter()
        .map(|(name, n)| (name.clone(), n))
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}
