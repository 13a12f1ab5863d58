use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{DateError, RatingError};

/// A calendar day keyed as `YYYY-MM-DD`.
///
/// Ordering is the lexicographic ordering of the key, which for four-digit years is
/// also chronological. There is no time or offset attached, so a key never shifts
/// when read back in another timezone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalDate {
    key: String,
    date: NaiveDate,
}

impl CanonicalDate {
    /// Builds a key straight from numeric components. Returns `None` for days that do
    /// not exist (31 February) or years outside 0..=9999.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(0..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_naive)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            key: date.format("%Y-%m-%d").to_string(),
            date,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn naive(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl FromStr for CanonicalDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || DateError::Invalid(s.to_string());

        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid())?;
        let key = Self::from_naive(date);

        // chrono accepts `2026-2-1`; keys must be zero-padded.
        if key.as_str() != s {
            return Err(invalid());
        }
        Ok(key)
    }
}

impl TryFrom<String> for CanonicalDate {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CanonicalDate> for String {
    fn from(value: CanonicalDate) -> Self {
        value.key
    }
}

/// One set line after the `"<N>: "` prefix has been decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedSet {
    RepBased { reps: u32, weight_text: String },
    TimeBased { duration: String, weight_text: String },
    /// Neither notation matched; the text is kept verbatim for display.
    Unparsed { raw: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    RepBased,
    TimeBased,
    Unparsed,
}

impl fmt::Display for SetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RepBased => "reps",
            Self::TimeBased => "time",
            Self::Unparsed => "unparsed",
        };
        write!(f, "{}", s)
    }
}

/// The `repsOrDuration` view of a set. Callers needing a number must match on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepsOrDuration {
    Reps(u32),
    Duration(String),
}

impl fmt::Display for RepsOrDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reps(r) => write!(f, "{} reps", r),
            Self::Duration(d) => write!(f, "{}", d),
        }
    }
}

impl DecodedSet {
    pub fn kind(&self) -> SetKind {
        match self {
            Self::RepBased { .. } => SetKind::RepBased,
            Self::TimeBased { .. } => SetKind::TimeBased,
            Self::Unparsed { .. } => SetKind::Unparsed,
        }
    }

    pub fn weight_text(&self) -> Option<&str> {
        match self {
            Self::RepBased { weight_text, .. } | Self::TimeBased { weight_text, .. } => {
                Some(weight_text)
            }
            Self::Unparsed { .. } => None,
        }
    }

    pub fn reps_or_duration(&self) -> Option<RepsOrDuration> {
        match self {
            Self::RepBased { reps, .. } => Some(RepsOrDuration::Reps(*reps)),
            Self::TimeBased { duration, .. } => Some(RepsOrDuration::Duration(duration.clone())),
            Self::Unparsed { .. } => None,
        }
    }
}

impl fmt::Display for DecodedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepBased { reps, weight_text } => write!(f, "{} × {}", reps, weight_text),
            Self::TimeBased { duration, weight_text } => write!(f, "{} × {}", duration, weight_text),
            Self::Unparsed { raw } => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSet {
    /// As declared in the source text; not renumbered.
    pub set_number: u32,
    pub set: DecodedSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedExercise {
    pub name: String,
    pub sets: Vec<ParsedSet>,
}

/// Output of the session text parser. Summary fields are display-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSession {
    pub title: Option<String>,
    pub raw_date_text: Option<String>,
    pub duration: Option<String>,
    pub volume_text: Option<String>,
    pub calories_text: Option<String>,
    pub exercises: Vec<ParsedExercise>,
}

impl ParsedSession {
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// `(exercise name, set)` for every set line that matched no notation.
    pub fn unparsed_sets(&self) -> impl Iterator<Item = (&str, &ParsedSet)> {
        self.exercises.iter().flat_map(|e| {
            e.sets
                .iter()
                .filter(|s| s.set.kind() == SetKind::Unparsed)
                .map(move |s| (e.name.as_str(), s))
        })
    }
}

/// A set as stored in the canonical log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedSet {
    /// Wall-clock time of normalization, not a time read from the import.
    pub recorded_at: DateTime<FixedOffset>,
    #[serde(flatten)]
    pub set: DecodedSet,
}

impl LoggedSet {
    pub fn kind(&self) -> SetKind {
        self.set.kind()
    }

    pub fn weight_text(&self) -> Option<&str> {
        self.set.weight_text()
    }

    pub fn reps_or_duration(&self) -> Option<RepsOrDuration> {
        self.set.reps_or_duration()
    }
}

/// Declared set number -> set.
pub type ExerciseSets = BTreeMap<u32, LoggedSet>;

/// Exercise name -> sets. Names are compared by exact string equality.
pub type DaySessions = BTreeMap<String, ExerciseSets>;

/// The canonical, persisted log: date -> exercise -> set number -> set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutLog(BTreeMap<CanonicalDate, DaySessions>);

impl WorkoutLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of logged dates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn day(&self, date: &CanonicalDate) -> Option<&DaySessions> {
        self.0.get(date)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&CanonicalDate, &DaySessions)> {
        self.0.iter()
    }

    /// Writes an imported day into the log.
    ///
    /// Exercises named in `incoming` replace what was stored under the same name for
    /// `date`; other exercises on that date and every other date stay as they are.
    pub fn merge_day(&mut self, date: CanonicalDate, incoming: DaySessions) {
        let day = self.0.entry(date).or_default();
        for (name, sets) in incoming {
            day.insert(name, sets);
        }
    }
}

impl FromIterator<(CanonicalDate, DaySessions)> for WorkoutLog {
    fn from_iter<T: IntoIterator<Item = (CanonicalDate, DaySessions)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Denormalized summary of one imported session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutMetadata {
    pub title: Option<String>,
    pub raw_date_text: Option<String>,
    pub duration: Option<String>,
    pub volume_text: Option<String>,
    pub calories_text: Option<String>,
    pub exercise_count: usize,
    pub total_sets: usize,
}

pub type MetadataLog = BTreeMap<CanonicalDate, WorkoutMetadata>;

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 10;

/// Self-reported well-being for one day, each rating on a 1 to 10 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFeeling {
    pub energy: u8,
    pub sleep: u8,
    pub motivation: u8,
    pub recorded_at: DateTime<FixedOffset>,
}

impl DailyFeeling {
    pub fn new(
        energy: u8,
        sleep: u8,
        motivation: u8,
        recorded_at: DateTime<FixedOffset>,
    ) -> Result<Self, RatingError> {
        for (field, value) in [("energy", energy), ("sleep", sleep), ("motivation", motivation)] {
            if !(RATING_MIN..=RATING_MAX).contains(&value) {
                return Err(RatingError {
                    field,
                    value,
                    min: RATING_MIN,
                    max: RATING_MAX,
                });
            }
        }

        Ok(Self {
            energy,
            sleep,
            motivation,
            recorded_at,
        })
    }
}

/// At most one entry per date; saving again for a date overwrites it.
pub type FeelingsLog = BTreeMap<CanonicalDate, DailyFeeling>;

/// One date's best set for an exercise. Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseHistoryEntry {
    pub date: CanonicalDate,
    pub max_weight: f64,
    pub reps_at_max: u32,
    pub volume: f64,
    pub estimated_1rm: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OneRMFormula {
    #[default]
    Epley,
    Brzycki,
    Lombardi,
    OConner,
}

impl fmt::Display for OneRMFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Epley => "epley",
            Self::Brzycki => "brzycki",
            Self::Lombardi => "lombardi",
            Self::OConner => "o-conner",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(s: &str) -> CanonicalDate {
        s.parse().unwrap()
    }

    fn reps(n: u32, w: &str) -> LoggedSet {
        LoggedSet {
            recorded_at: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2026, 2, 11, 20, 0, 0)
                .unwrap(),
            set: DecodedSet::RepBased {
                reps: n,
                weight_text: w.to_string(),
            },
        }
    }

    #[test]
    fn canonical_date_rejects_unpadded_and_impossible_days() {
        assert!("2026-2-11".parse::<CanonicalDate>().is_err());
        assert!("2026-02-30".parse::<CanonicalDate>().is_err());
        assert!("11/02/2026".parse::<CanonicalDate>().is_err());
        assert_eq!(date("2026-02-11").as_str(), "2026-02-11");
        assert_eq!(CanonicalDate::from_ymd(2026, 2, 11), Some(date("2026-02-11")));
        assert_eq!(CanonicalDate::from_ymd(2026, 2, 29), None);
    }

    #[test]
    fn feeling_ratings_stay_on_the_scale() {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 2, 11, 8, 0, 0)
            .unwrap();

        let feeling = DailyFeeling::new(7, 10, 1, at).unwrap();
        assert_eq!((feeling.energy, feeling.sleep, feeling.motivation), (7, 10, 1));

        let err = DailyFeeling::new(7, 0, 5, at).unwrap_err();
        assert_eq!(err.field, "sleep");
        assert_eq!(err.to_string(), "sleep must be between 1 and 10, got 0");
        assert!(DailyFeeling::new(11, 5, 5, at).is_err());
    }

    #[test]
    fn canonical_dates_order_by_key() {
        let mut dates = vec![date("2026-01-08"), date("2025-12-31"), date("2026-01-01")];
        dates.sort();
        let keys: Vec<_> = dates.iter().map(|d| d.as_str()).collect();
        assert_eq!(keys, ["2025-12-31", "2026-01-01", "2026-01-08"]);
    }

    #[test]
    fn merge_day_replaces_only_named_exercises() {
        let mut log = WorkoutLog::new();
        let day = date("2026-02-11");
        let other_day = date("2026-02-10");

        log.merge_day(
            other_day.clone(),
            DaySessions::from([("Remo".to_string(), ExerciseSets::from([(1, reps(10, "40 kg"))]))]),
        );
        log.merge_day(
            day.clone(),
            DaySessions::from([
                ("Press banca".to_string(), ExerciseSets::from([(1, reps(8, "60 kg"))])),
                ("Sentadilla".to_string(), ExerciseSets::from([(1, reps(5, "90 kg"))])),
            ]),
        );

        // Re-import only bench press for the same day.
        log.merge_day(
            day.clone(),
            DaySessions::from([("Press banca".to_string(), ExerciseSets::from([(1, reps(6, "65 kg"))]))]),
        );

        let stored = log.day(&day).unwrap();
        assert_eq!(stored["Press banca"][&1], reps(6, "65 kg"));
        assert_eq!(stored["Sentadilla"][&1], reps(5, "90 kg"));
        assert!(log.day(&other_day).unwrap().contains_key("Remo"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn log_serializes_with_date_and_set_number_keys() {
        let mut log = WorkoutLog::new();
        log.merge_day(
            date("2026-02-11"),
            DaySessions::from([("Press banca".to_string(), ExerciseSets::from([(1, reps(8, "60 kg"))]))]),
        );

        let json = serde_json::to_value(&log).unwrap();
        let set = &json["2026-02-11"]["Press banca"]["1"];
        assert_eq!(set["kind"], "rep_based");
        assert_eq!(set["reps"], 8);
        assert_eq!(set["weight_text"], "60 kg");

        let back: WorkoutLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn reps_or_duration_follows_kind() {
        let timed = DecodedSet::TimeBased {
            duration: "01:01".to_string(),
            weight_text: "PC".to_string(),
        };
        assert_eq!(timed.reps_or_duration(), Some(RepsOrDuration::Duration("01:01".into())));
        assert_eq!(timed.weight_text(), Some("PC"));

        let raw = DecodedSet::Unparsed { raw: "???".to_string() };
        assert_eq!(raw.reps_or_duration(), None);
        assert_eq!(raw.kind(), SetKind::Unparsed);
    }
}
