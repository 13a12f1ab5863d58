use anyhow::Result;
use colored::Colorize;
use ironlog::{
    dates::display_full,
    db::{self, DB},
    models::{CanonicalDate, DaySessions, DecodedSet, WorkoutMetadata},
    types::{OutputFmt, emit},
};
use serde::Serialize;

#[derive(Serialize)]
struct DayJson<'a> {
    date: &'a CanonicalDate,
    metadata: Option<&'a WorkoutMetadata>,
    exercises: Option<&'a DaySessions>,
}

pub async fn handle(pool: &DB, date: &str, fmt: OutputFmt) -> Result<()> {
    let date: CanonicalDate = date.parse()?;

    let log = db::load_workout_log(pool).await?;
    let metadata = db::load_metadata(pool).await?;

    let day = log.day(&date);
    let meta = metadata.get(&date);

    let json = DayJson {
        date: &date,
        metadata: meta,
        exercises: day,
    };

    emit(fmt, &json, || {
        let Some(day) = day else {
            println!(
                "{} nothing logged on {}",
                "info:".blue().bold(),
                display_full(&date)
            );
            return;
        };

        println!("{}", display_full(&date).cyan().bold());
        if let Some(meta) = meta {
            if let Some(title) = &meta.title {
                println!("{}", title.bold());
            }
            let summary: Vec<String> = [
                meta.duration.as_ref().map(|d| format!("{} {}", "Duration:".dimmed(), d)),
                meta.volume_text.as_ref().map(|v| format!("{} {}", "Volume:".dimmed(), v)),
                meta.calories_text.as_ref().map(|c| format!("{} {}", "Calories:".dimmed(), c)),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !summary.is_empty() {
                println!("{}", summary.join(" | "));
            }
        }

        for (name, sets) in day {
            println!("\n{}", name.bold());
            for (number, logged) in sets {
                let line = match &logged.set {
                    DecodedSet::RepBased { reps, weight_text } => {
                        format!("{} × {}", weight_text, reps)
                    }
                    DecodedSet::TimeBased { duration, weight_text } => {
                        format!("{} for {}", weight_text, duration)
                    }
                    DecodedSet::Unparsed { raw } => raw.yellow().to_string(),
                };
                println!("  Set {}: {}", number, line);
            }
        }
    })
}
