use anyhow::Result;
use colored::Colorize;
use ironlog::{
    db::{self, DB},
    models::{ExerciseHistoryEntry, OneRMFormula},
    progression::{ProgressionSummary, all_exercises, history_with, summarize},
    types::{OutputFmt, best_suggestion, emit},
    utils::format_weight,
};
use serde::Serialize;

#[derive(Serialize)]
struct HistoryJson<'a> {
    exercise: &'a str,
    formula: OneRMFormula,
    entries: &'a [ExerciseHistoryEntry],
    summary: Option<ProgressionSummary>,
}

fn create_ascii_graph(data: &[(String, f64)], width: usize, height: usize, title: &str) -> Vec<String> {
    if data.is_empty() {
        return vec!["No data available".to_string()];
    }

    let min_value = data.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max_value = data.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let range = max_value - min_value;

    if range == 0.0 || data.len() < 2 {
        return vec!["No variation in data".to_string()];
    }

    let mut grid = vec![vec![' '; width]; height];
    let col = |i: usize| (i as f64 / (data.len() - 1) as f64 * (width - 1) as f64) as usize;
    let row = |v: f64| height - 1 - ((v - min_value) / range * (height - 1) as f64) as usize;

    for (i, (_, value)) in data.iter().enumerate() {
        let (x, y) = (col(i), row(*value));
        grid[y][x] = '●';

        // Connect to the previous point.
        if i > 0 {
            let (prev_x, prev_y) = (col(i - 1), row(data[i - 1].1));
            let dx = x as isize - prev_x as isize;
            let dy = y as isize - prev_y as isize;
            let steps = dx.abs().max(dy.abs());

            for step in 1..steps {
                let px = (prev_x as isize + dx * step / steps) as usize;
                let py = (prev_y as isize + dy * step / steps) as usize;
                if py < height && px < width && grid[py][px] == ' ' {
                    grid[py][px] = '·';
                }
            }
        }
    }

    let mut result = Vec::new();
    let step = range / (height - 1) as f64;

    result.push(format!("\n{} {}", title.bold(), "estimated 1RM"));
    result.push("─".repeat(width + 7));

    for (i, cells) in grid.iter().enumerate() {
        let value = min_value + step * (height - 1 - i) as f64;
        result.push(format!("{:5.0} │{}", value, cells.iter().collect::<String>()));
    }

    result.push(format!("      └{}", "─".repeat(width)));
    if let (Some(first), Some(last)) = (data.first(), data.last()) {
        let gap = width.saturating_sub(first.0.len() + last.0.len());
        result.push(format!("       {}{}{}", first.0, " ".repeat(gap), last.0));
    }

    result
}

pub async fn handle(
    pool: &DB,
    exercise: &str,
    graph: bool,
    formula: OneRMFormula,
    fmt: OutputFmt,
) -> Result<()> {
    let log = db::load_workout_log(pool).await?;
    let entries = history_with(&log, exercise, formula);
    let summary = summarize(&entries);

    let json = HistoryJson {
        exercise,
        formula,
        entries: &entries,
        summary: summary.clone(),
    };

    emit(fmt, &json, || {
        if entries.is_empty() {
            let known = all_exercises(&log);
            if known.iter().any(|n| n == exercise) {
                println!(
                    "{} `{}` has no sets with a numeric load yet",
                    "info:".blue().bold(),
                    exercise
                );
            } else if let Some(sug) = best_suggestion(exercise, &known) {
                println!(
                    "{} no exercise named `{}` -- did you mean: `{}`?",
                    "warning:".yellow().bold(),
                    exercise,
                    sug.green()
                );
            } else {
                println!("{} no exercise named `{}`", "warning:".yellow().bold(), exercise);
            }
            return;
        }

        println!(
            "{}: {} ({} formula)",
            "Exercise".cyan().bold(),
            exercise.bold(),
            formula
        );
        println!();

        for e in &entries {
            println!(
                "  {}  {}kg × {}   vol {}   1RM {}kg",
                e.date,
                format_weight(e.max_weight),
                e.reps_at_max,
                format_weight(e.volume),
                format_weight(e.estimated_1rm).green()
            );
        }
        println!();

        match &summary {
            Some(s) => {
                let arrow = if s.rm_progress >= 0.0 { "▲" } else { "▼" };
                println!(
                    "{}: {} sessions | best {}kg | max volume {}",
                    "Summary".cyan().bold(),
                    s.sessions,
                    format_weight(s.max_weight),
                    format_weight(s.max_volume)
                );
                println!(
                    "{} {}kg → {}kg  ({} {}kg 1RM)",
                    "Progress:".cyan().bold(),
                    format_weight(s.start_weight),
                    format_weight(s.current_weight),
                    arrow,
                    format_weight(s.rm_progress.abs())
                );
            }
            None => println!(
                "{}",
                "Need at least two sessions with numeric sets to show progression.".dimmed()
            ),
        }

        if graph {
            let (term_width, term_height) = term_size::dimensions().unwrap_or((80, 24));
            let width = term_width.saturating_sub(10).clamp(20, 100);
            let height = (term_height / 2).clamp(6, 15);
            let data: Vec<(String, f64)> = entries
                .iter()
                .map(|e| (e.date.to_string(), e.estimated_1rm))
                .collect();
            for line in create_ascii_graph(&data, width, height, exercise) {
                println!("{}", line);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_needs_variation() {
        assert_eq!(create_ascii_graph(&[], 20, 6, "x"), ["No data available"]);
        let flat = vec![("2026-01-01".to_string(), 80.0), ("2026-01-08".to_string(), 80.0)];
        assert_eq!(create_ascii_graph(&flat, 20, 6, "x"), ["No variation in data"]);
    }

    #[test]
    fn graph_plots_every_point() {
        let data = vec![
            ("2026-01-01".to_string(), 88.7),
            ("2026-01-08".to_string(), 96.0),
            ("2026-01-15".to_string(), 99.0),
        ];
        let lines = create_ascii_graph(&data, 30, 6, "Sentadilla");
        let points: usize = lines.iter().map(|l| l.matches('●').count()).sum();
        assert_eq!(points, 3);
        assert!(lines.last().unwrap().contains("2026-01-01"));
        assert!(lines.last().unwrap().contains("2026-01-15"));
    }
}
