use anyhow::Result;
use colored::Colorize;
use ironlog::{
    dates::{SystemClock, resolve_today_key},
    db::{self, DB},
    sessions::{
        Period, SessionQuery, SessionRow, SessionSort, SessionStats, list_sessions, session_stats,
    },
    types::{OutputFmt, emit},
};
use serde::Serialize;

#[derive(Serialize)]
struct SessionsJson<'a> {
    sessions: &'a [SessionRow],
    stats: SessionStats,
}

pub async fn handle(
    pool: &DB,
    search: Option<String>,
    period: Period,
    sort: SessionSort,
    fmt: OutputFmt,
) -> Result<()> {
    let log = db::load_workout_log(pool).await?;
    let metadata = db::load_metadata(pool).await?;
    let today = resolve_today_key(&SystemClock);

    let query = SessionQuery {
        search,
        period,
        sort,
    };
    let rows = list_sessions(&log, &metadata, &today, &query);
    let stats = session_stats(&rows);
    tracing::debug!(listed = rows.len(), ?period, ?sort, "listing sessions");

    let json = SessionsJson {
        sessions: &rows,
        stats: stats.clone(),
    };

    emit(fmt, &json, || {
        if rows.is_empty() {
            let hint = if query.search.is_some() || period != Period::All {
                "No sessions match these filters."
            } else {
                "No sessions logged yet."
            };
            println!("{}", hint.dimmed());
            return;
        }

        println!(
            "{} {} | {} {} | {} {} | {} {}",
            "Workouts:".cyan().bold(),
            stats.total_workouts,
            "exercises:".dimmed(),
            stats.total_exercises,
            "sets:".dimmed(),
            stats.total_sets,
            "avg exercises/workout:".dimmed(),
            stats.avg_exercises_per_workout
        );
        println!();

        for row in &rows {
            let mut head = format!(
                "{} {}",
                row.date.to_string().green(),
                row.title.as_deref().unwrap_or("(untitled)").bold()
            );
            for extra in [&row.duration, &row.volume_text].into_iter().flatten() {
                head.push_str(&format!(" {}", format!("· {}", extra).dimmed()));
            }
            println!("{}", head);
            println!(
                "   {} {}",
                row.exercises.join(", "),
                format!("({} sets)", row.sets).dimmed()
            );
        }
    })
}
