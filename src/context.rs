//! Plain-text training summary handed to the coaching model as context.

use crate::{
    dates::{days_between, display_full},
    models::{CanonicalDate, FeelingsLog, MetadataLog, WorkoutLog},
    progression::{exercise_frequency, history, summarize},
    utils::format_weight,
};

const RECENT_SESSIONS: usize = 5;
const TOP_EXERCISES: usize = 5;
const RECENT_FEELINGS: usize = 3;

/// Builds the natural-language context for the coaching model.
///
/// Contains the five most recent sessions, progression of the five most frequent
/// exercises that have at least two comparable sessions, the three most recent
/// well-being entries, and overall totals.
pub fn build_training_context(
    log: &WorkoutLog,
    metadata: &MetadataLog,
    feelings: &FeelingsLog,
    today: &CanonicalDate,
) -> String {
    let mut lines = vec![format!(
        "Training context for {} ({}).",
        display_full(today),
        today
    )];

    lines.push(String::new());
    if log.is_empty() {
        lines.push("No workouts logged yet.".to_string());
    } else {
        lines.push("Recent sessions:".to_string());
        for (date, day) in log.iter().rev().take(RECENT_SESSIONS) {
            let sets: usize = day.values().map(|s| s.len()).sum();
            let mut line = format!("- {}: {} exercises, {} sets", date, day.len(), sets);

            if let Some(meta) = metadata.get(date) {
                if let Some(title) = &meta.title {
                    line.push_str(&format!(" ({})", title));
                }
                if let Some(duration) = &meta.duration {
                    line.push_str(&format!(", duration {}", duration));
                }
                if let Some(volume) = &meta.volume_text {
                    line.push_str(&format!(", volume {}", volume));
                }
            }
            lines.push(line);
        }
    }

    let progressions: Vec<String> = exercise_frequency(log)
        .into_iter()
        .take(TOP_EXERCISES)
        .filter_map(|(name, _)| {
            let s = summarize(&history(log, &name))?;
            let sign = if s.weight_progress > 0.0 { "+" } else { "" };
            Some(format!(
                "- {}: {} kg -> {} kg ({}{} kg over {} sessions), estimated 1RM {} kg",
                name,
                format_weight(s.start_weight),
                format_weight(s.current_weight),
                sign,
                format_weight(s.weight_progress),
                s.sessions,
                s.current_1rm.round()
            ))
        })
        .collect();

    if !progressions.is_empty() {
        lines.push(String::new());
        lines.push("Progression in main exercises:".to_string());
        lines.extend(progressions);
    }

    if !feelings.is_empty() {
        lines.push(String::new());
        lines.push("Recent well-being:".to_string());
        for (date, f) in feelings.iter().rev().take(RECENT_FEELINGS) {
            lines.push(format!(
                "- {}: energy {}/10, sleep {}/10, motivation {}/10",
                date, f.energy, f.sleep, f.motivation
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("Total workouts logged: {}", log.len()));
    lines.push(format!(
        "Distinct exercises: {}",
        exercise_frequency(log).len()
    ));
    if let Some((last, _)) = log.iter().next_back() {
        lines.push(format!("Days since last workout: {}", days_between(last, today)));
    }

    lines.join("\n")
}
