use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use ironlog::{
    dates::{SystemClock, resolve_today_key},
    db::{self, DB},
    models::CanonicalDate,
};

const MONTH_NAMES: [&str; 12] = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];

/// Number of days in `month`, or `None` for an out-of-range month.
fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

pub async fn handle(pool: &DB, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let today = resolve_today_key(&SystemClock);
    let year = year.unwrap_or(today.naive().year());
    let month = month.unwrap_or(today.naive().month());

    let (Some(first_day), Some(days)) = (
        NaiveDate::from_ymd_opt(year, month, 1),
        days_in_month(year, month),
    ) else {
        bail!("month must be between 1 and 12, got {}", month);
    };

    let log = db::load_workout_log(pool).await?;
    let metadata = db::load_metadata(pool).await?;

    let sessions: Vec<(&CanonicalDate, usize)> = log
        .iter()
        .filter(|(date, _)| {
            let d = date.naive();
            d.year() == year && d.month() == month
        })
        .map(|(date, day)| (date, day.len()))
        .collect();

    println!(
        "\n{}",
        format!("{} {}", MONTH_NAMES[month as usize - 1], year).bold().cyan()
    );
    println!("{}", "Lu Ma Mi Ju Vi Sá Do".dimmed());

    let lead = first_day.weekday().num_days_from_monday() as usize;
    print!("{}", "   ".repeat(lead));

    for day in 1..=days {
        let trained = sessions.iter().any(|(d, _)| d.naive().day() == day);
        let cell = format!("{:>2}", day);
        if trained {
            print!("{} ", cell.green().bold());
        } else if year == today.naive().year()
            && month == today.naive().month()
            && day == today.naive().day()
        {
            print!("{} ", cell.underline());
        } else {
            print!("{} ", cell);
        }

        if (lead + day as usize) % 7 == 0 {
            println!();
        }
    }
    println!("\n");

    if sessions.is_empty() {
        println!("{}", "No workouts logged this month.".dimmed());
        return Ok(());
    }

    println!("{}", "Sessions:".bold().cyan());
    for (date, exercises) in sessions {
        let meta = metadata.get(date);
        let title = meta
            .and_then(|m| m.title.as_deref())
            .unwrap_or("(untitled)");
        let duration = meta
            .and_then(|m| m.duration.as_deref())
            .map(|d| format!(" ({})", d))
            .unwrap_or_default();

        println!(
            "  {} {}{} | {} exercises",
            date.to_string().green(),
            title.bold(),
            duration.dimmed(),
            exercises
        );
    }

    Ok(())
}
