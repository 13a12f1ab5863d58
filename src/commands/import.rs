use anyhow::{Context, Result};
use colored::Colorize;
use ironlog::{
    dates::{Clock, SystemClock, display_full},
    db::{self, DB},
    import::{DateSource, PreparedImport, normalize, prepare_import},
    models::{CanonicalDate, DecodedSet},
    types::{OutputFmt, emit},
};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

async fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Could not read file: `{}`", path)),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Could not read workout text from stdin")?;
            Ok(text)
        }
    }
}

enum Confirmation {
    Accept,
    Redate(CanonicalDate),
    Abort,
}

async fn confirm_date(date: &CanonicalDate) -> Result<Confirmation> {
    println!(
        "\n{} save under {} ({})? [Y/n/YYYY-MM-DD] ",
        "?".cyan().bold(),
        display_full(date).bold(),
        date
    );

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;

    let answer = answer.trim();
    Ok(match answer.to_lowercase().as_str() {
        "" | "y" | "yes" | "s" | "si" | "sí" => Confirmation::Accept,
        "n" | "no" => Confirmation::Abort,
        _ => match answer.parse::<CanonicalDate>() {
            Ok(d) => Confirmation::Redate(d),
            Err(e) => {
                println!("{} {}", "error:".red().bold(), e);
                Confirmation::Abort
            }
        },
    })
}

/// Runs the import pipeline; a rejected import is an error.
fn prepare(text: &str, date: Option<&str>, clock: &impl Clock) -> Result<PreparedImport> {
    let date_override = date.map(str::parse::<CanonicalDate>).transpose()?;
    Ok(prepare_import(text, date_override, clock)?)
}

fn print_preview(prepared: &PreparedImport) {
    let parsed = &prepared.parsed;
    let date = prepared.date();

    println!(
        "{}: {}",
        "Workout".cyan().bold(),
        parsed.title.as_deref().unwrap_or("(untitled)").bold()
    );

    let source = match prepared.date_source {
        DateSource::Override => "given",
        DateSource::Embedded => "detected",
        DateSource::Today => "today, no date found in text",
    };
    println!("{}: {} ({})", "Date".dimmed(), date, source.dimmed());

    for (label, value) in [
        ("Duration", &parsed.duration),
        ("Volume", &parsed.volume_text),
        ("Calories", &parsed.calories_text),
    ] {
        if let Some(v) = value {
            println!("{}: {}", label.dimmed(), v);
        }
    }
    println!();

    for (idx, exercise) in parsed.exercises.iter().enumerate() {
        println!("{}. {}", idx + 1, exercise.name.bold());
        for set in &exercise.sets {
            let text = match &set.set {
                DecodedSet::Unparsed { raw } => {
                    format!("{} {}", raw, "(not recognized)".dimmed()).yellow().to_string()
                }
                other => other.to_string(),
            };
            println!("   Set {}: {}", set.set_number, text);
        }
    }
}

pub async fn handle(
    pool: &DB,
    file: Option<String>,
    date: Option<String>,
    yes: bool,
    fmt: OutputFmt,
) -> Result<()> {
    let text = read_input(file.as_deref()).await?;
    let clock = SystemClock;
    let mut prepared = prepare(&text, date.as_deref(), &clock)?;

    if fmt == OutputFmt::Text {
        print_preview(&prepared);

        // The text itself came from stdin, so there is nobody left to ask.
        let interactive = file.is_some() && !yes;
        if interactive {
            match confirm_date(prepared.date()).await? {
                Confirmation::Accept => {}
                Confirmation::Redate(d) => {
                    prepared.normalized = normalize(&prepared.parsed, d, &clock);
                    prepared.date_source = DateSource::Override;
                }
                Confirmation::Abort => {
                    println!("{} import cancelled", "info:".blue().bold());
                    return Ok(());
                }
            }
        }
    }

    let mut log = db::load_workout_log(pool).await?;
    let mut metadata = db::load_metadata(pool).await?;

    let replaced: Vec<&String> = log
        .day(prepared.date())
        .map(|day| {
            prepared
                .normalized
                .exercises
                .keys()
                .filter(|name| day.contains_key(*name))
                .collect()
        })
        .unwrap_or_default();

    prepared.apply_to(&mut log, &mut metadata);
    db::save_workout_log(pool, &log).await?;
    db::save_metadata(pool, &metadata).await?;

    emit(fmt, &prepared, || {
        for name in &replaced {
            println!(
                "{} replaced earlier sets of `{}` on {}",
                "warning:".yellow().bold(),
                name,
                prepared.date()
            );
        }

        let unparsed = prepared.parsed.unparsed_sets().count();
        if unparsed > 0 {
            println!(
                "{} {} set(s) kept as raw text and left out of progression",
                "warning:".yellow().bold(),
                unparsed
            );
        }

        println!(
            "{} imported {} exercises ({} sets) on {}",
            "ok:".green().bold(),
            prepared.normalized.metadata.exercise_count,
            prepared.normalized.metadata.total_sets,
            display_full(prepared.date())
        );
    })
}
