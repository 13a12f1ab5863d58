//! Import of pasted workout summaries.
//!
//! `validator` rejects obviously unrelated text, `parser` segments the text into
//! header fields and exercises (with `decoder` handling each set line) and
//! `normalizer` reshapes the result into the canonical log for a chosen date.

pub mod decoder;
pub mod normalizer;
pub mod parser;
pub mod validator;

use serde::Serialize;

use crate::{
    dates::{Clock, parse_embedded_date, resolve_today_key},
    error::ImportError,
    models::{CanonicalDate, MetadataLog, ParsedSession, WorkoutLog},
};

pub use decoder::decode;
pub use normalizer::{NormalizedSession, extract_metadata, normalize};
pub use parser::parse;
pub use validator::looks_like_valid_session;

/// Where the target date of an import came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// Given explicitly by the user.
    Override,
    /// Read from the date line of the pasted text.
    Embedded,
    /// Neither of the above; the clock's local date.
    Today,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreparedImport {
    pub parsed: ParsedSession,
    pub date_source: DateSource,
    pub normalized: NormalizedSession,
}

impl PreparedImport {
    pub fn date(&self) -> &CanonicalDate {
        &self.normalized.date
    }

    pub fn apply_to(&self, log: &mut WorkoutLog, metadata: &mut MetadataLog) {
        self.normalized.apply_to(log, metadata);
    }
}

/// Picks the date an import is filed under.
pub fn resolve_target_date(
    parsed: &ParsedSession,
    date_override: Option<CanonicalDate>,
    clock: &impl Clock,
) -> (CanonicalDate, DateSource) {
    if let Some(date) = date_override {
        return (date, DateSource::Override);
    }

    match parsed.raw_date_text.as_deref().and_then(parse_embedded_date) {
        Some(date) => (date, DateSource::Embedded),
        None => (resolve_today_key(clock), DateSource::Today),
    }
}

/// Validates, parses and normalizes `text`, ready to be merged into the log.
pub fn prepare_import(
    text: &str,
    date_override: Option<CanonicalDate>,
    clock: &impl Clock,
) -> Result<PreparedImport, ImportError> {
    if !looks_like_valid_session(text) {
        return Err(ImportError::Rejected);
    }

    let parsed = parse(text)?;
    if parsed.exercises.is_empty() {
        return Err(ImportError::NoExercises);
    }

    let (date, date_source) = resolve_target_date(&parsed, date_override, clock);
    tracing::debug!(%date, ?date_source, "resolved import date");

    let normalized = normalize(&parsed, date, clock);
    Ok(PreparedImport {
        parsed,
        date_source,
        normalized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::FixedClock;
    use chrono::{FixedOffset, TimeZone};

    const TEXT: &str = "Mi entrenamiento:\nPierna\n11 feb 2026, 18:36\nDURACIÓN: 55min\nEjercicios: 1\nSentadilla\n1: 8 repeticiones x 80 kg";

    fn clock_at(offset_hours: i32, d: u32, h: u32) -> FixedClock {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        FixedClock(offset.with_ymd_and_hms(2026, 2, d, h, 30, 0).unwrap())
    }

    #[test]
    fn embedded_date_is_the_same_in_any_timezone() {
        let west = clock_at(-8, 11, 23);
        let east = clock_at(9, 12, 0);

        let a = prepare_import(TEXT, None, &west).unwrap();
        let b = prepare_import(TEXT, None, &east).unwrap();
        assert_eq!(a.date().as_str(), "2026-02-11");
        assert_eq!(b.date().as_str(), "2026-02-11");
        assert_eq!(a.date_source, DateSource::Embedded);
    }

    #[test]
    fn override_beats_embedded_date() {
        let date: CanonicalDate = "2026-02-10".parse().unwrap();
        let prepared = prepare_import(TEXT, Some(date.clone()), &clock_at(1, 12, 10)).unwrap();
        assert_eq!(prepared.date(), &date);
        assert_eq!(prepared.date_source, DateSource::Override);
    }

    #[test]
    fn falls_back_to_local_today() {
        let text = "Mi entrenamiento:\nPierna\nEjercicios: 1\nSentadilla\n1: 8 repeticiones x 80 kg";
        let prepared = prepare_import(text, None, &clock_at(-8, 11, 23)).unwrap();
        assert_eq!(prepared.date().as_str(), "2026-02-11");
        assert_eq!(prepared.date_source, DateSource::Today);
    }

    #[test]
    fn rejects_before_parsing() {
        let err = prepare_import("hola\nqué tal", None, &clock_at(0, 11, 12)).unwrap_err();
        assert_eq!(err, ImportError::Rejected);
    }

    #[test]
    fn refuses_sessions_without_exercises() {
        let text = "Mi entrenamiento:\nDescanso\nDURACIÓN: 10min\nEjercicios: 1\nEstiramientos x ";
        let err = prepare_import(text, None, &clock_at(0, 11, 12)).unwrap_err();
        assert_eq!(err, ImportError::NoExercises);
    }
}
