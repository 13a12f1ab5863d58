//! Calendar-date helpers for imported sessions.
//!
//! Dates are always built from numeric year/month/day components. Nothing here goes
//! through a UTC timestamp and back, so the resulting key does not depend on the
//! offset of the machine reading it.

use chrono::{DateTime, Datelike, FixedOffset, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::CanonicalDate;

/// Month abbreviations as they appear in exported sessions, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

const MONTH_NAMES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];

/// Monday first, matching `Weekday::num_days_from_monday`.
const WEEKDAY_NAMES: [&str; 7] = [
    "lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo",
];

static EMBEDDED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})\s+(\p{L}{3})\.?\s+(\d{4})\b").unwrap());

/// Source of "now". Injected so tests can pin both the instant and the offset.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Today's date on the caller's wall clock.
pub fn resolve_today_key(clock: &impl Clock) -> CanonicalDate {
    // `date_naive` on a fixed-offset datetime reads the local fields, not UTC.
    CanonicalDate::from_naive(clock.now().date_naive())
}

/// Extracts a `day month-abbrev year` triple such as `11 feb 2026, 18:36`.
///
/// Returns `None` when there is no such substring, when the month is not one of
/// [`MONTH_ABBREVIATIONS`], or when the day does not exist in that month.
pub fn parse_embedded_date(text: &str) -> Option<CanonicalDate> {
    let caps = EMBEDDED_DATE.captures(text)?;

    let day: u32 = caps[1].parse().ok()?;
    let abbrev = caps[2].to_lowercase();
    let month = MONTH_ABBREVIATIONS.iter().position(|m| *m == abbrev)? as u32 + 1;
    let year: i32 = caps[3].parse().ok()?;

    CanonicalDate::from_ymd(year, month, day)
}

/// Long-form date for confirmation prompts, e.g. `miércoles, 11 de febrero de 2026`.
pub fn display_full(date: &CanonicalDate) -> String {
    let d = date.naive();
    let weekday = WEEKDAY_NAMES[d.weekday().num_days_from_monday() as usize];
    let month = MONTH_NAMES[d.month0() as usize];
    format!("{}, {} de {} de {}", weekday, d.day(), month, d.year())
}

/// Whole days between two dates, regardless of order.
pub fn days_between(a: &CanonicalDate, b: &CanonicalDate) -> i64 {
    (b.naive() - a.naive()).num_days().abs()
}
