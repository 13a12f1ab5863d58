use anyhow::Result;
use colored::Colorize;
use ironlog::{
    dates::{Clock, SystemClock, resolve_today_key},
    db::{self, DB},
    models::{CanonicalDate, DailyFeeling, FeelingsLog},
    types::{OutputFmt, emit},
};
use serde::Serialize;

use crate::cli::FeelingCmd;

#[derive(Serialize)]
struct FeelingJson<'a> {
    date: &'a CanonicalDate,
    #[serde(flatten)]
    feeling: &'a DailyFeeling,
}

fn bar(rating: u8) -> String {
    let filled = "█".repeat(rating as usize);
    let empty = "░".repeat(10usize.saturating_sub(rating as usize));
    let colored = match rating {
        1..=3 => filled.red(),
        4..=6 => filled.yellow(),
        _ => filled.green(),
    };
    format!("{}{} {:>2}", colored, empty.dimmed(), rating)
}

/// Records a rating for `date` (today when `None`), replacing any earlier one.
fn record(
    feelings: &mut FeelingsLog,
    date: Option<&str>,
    energy: u8,
    sleep: u8,
    motivation: u8,
    clock: &impl Clock,
) -> Result<CanonicalDate> {
    let date = match date {
        Some(d) => d.parse()?,
        None => resolve_today_key(clock),
    };
    let feeling = DailyFeeling::new(energy, sleep, motivation, clock.now())?;
    feelings.insert(date.clone(), feeling);
    Ok(date)
}

pub async fn handle(cmd: FeelingCmd, pool: &DB, fmt: OutputFmt) -> Result<()> {
    let mut feelings = db::load_feelings(pool).await?;

    match cmd {
        FeelingCmd::Add {
            energy,
            sleep,
            motivation,
            date,
        } => {
            let date = record(&mut feelings, date.as_deref(), energy, sleep, motivation, &SystemClock)?;
            db::save_feelings(pool, &feelings).await?;

            let feeling = &feelings[&date];
            emit(fmt, &FeelingJson { date: &date, feeling }, || {
                println!(
                    "{} saved for {}: energy {}/10, sleep {}/10, motivation {}/10",
                    "ok:".green().bold(),
                    date,
                    feeling.energy,
                    feeling.sleep,
                    feeling.motivation
                );
            })
        }

        FeelingCmd::List { last } => {
            let recent: Vec<FeelingJson> = feelings
                .iter()
                .rev()
                .take(last)
                .map(|(date, feeling)| FeelingJson { date, feeling })
                .collect();

            emit(fmt, &recent, || {
                if recent.is_empty() {
                    println!("{}", "No feelings recorded yet.".dimmed());
                    return;
                }
                for entry in &recent {
                    println!("{}", entry.date.to_string().cyan().bold());
                    println!("  {:<11}{}", "Energy", bar(entry.feeling.energy));
                    println!("  {:<11}{}", "Sleep", bar(entry.feeling.sleep));
                    println!("  {:<11}{}", "Motivation", bar(entry.feeling.motivation));
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use ironlog::{dates::FixedClock, error::RatingError};

    fn clock() -> FixedClock {
        let offset = FixedOffset::west_opt(6 * 3600).unwrap();
        FixedClock(offset.with_ymd_and_hms(2026, 2, 11, 22, 30, 0).unwrap())
    }

    #[test]
    fn defaults_to_the_local_day_and_overwrites() {
        let mut feelings = FeelingsLog::new();
        let first = record(&mut feelings, None, 5, 5, 5, &clock()).unwrap();
        assert_eq!(first.as_str(), "2026-02-11");

        record(&mut feelings, None, 8, 7, 9, &clock()).unwrap();
        assert_eq!(feelings.len(), 1);
        assert_eq!(feelings[&first].energy, 8);
    }

    #[test]
    fn explicit_date_and_bad_input() {
        let mut feelings = FeelingsLog::new();
        let date = record(&mut feelings, Some("2026-02-01"), 6, 6, 6, &clock()).unwrap();
        assert_eq!(date.as_str(), "2026-02-01");

        let err = record(&mut feelings, None, 6, 12, 6, &clock()).unwrap_err();
        assert_eq!(err.downcast_ref::<RatingError>().map(|e| e.field), Some("sleep"));
        assert!(record(&mut feelings, Some("1 feb"), 6, 6, 6, &clock()).is_err());
        assert_eq!(feelings.len(), 1);
    }
}
