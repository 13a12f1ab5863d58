use anyhow::Result;
use colored::Colorize;
use ironlog::{
    db::{self, DB},
    progression::{all_exercises, exercise_frequency},
    types::{OutputFmt, emit},
};
use serde::Serialize;

#[derive(Serialize)]
struct ExJson {
    idx: usize,
    name: String,
    sessions: usize,
}

pub async fn handle(pool: &DB, fmt: OutputFmt) -> Result<()> {
    let log = db::load_workout_log(pool).await?;
    let freq = exercise_frequency(&log);

    let rows: Vec<ExJson> = all_exercises(&log)
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let sessions = freq
                .iter()
                .find(|(n, _)| *n == name)
                .map_or(0, |(_, c)| *c);
            ExJson {
                idx: i + 1,
                name,
                sessions,
            }
        })
        .collect();

    emit(fmt, &rows, || {
        println!("{}", "Exercises:".cyan().bold());

        let idx_w = rows.iter().map(|e| e.idx.to_string().len()).max().unwrap_or(1);
        let name_w = rows.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);

        for ex in &rows {
            println!(
                " {} • {:<name_w$} {} {}",
                format!("{:>width$}", ex.idx, width = idx_w).yellow(),
                ex.name.bold(),
                "|".blue(),
                format!("{} sessions", ex.sessions).dimmed(),
                name_w = name_w
            );
        }

        if rows.is_empty() {
            println!("{}", "  (no exercises logged yet)".dimmed());
        }
    })
}
