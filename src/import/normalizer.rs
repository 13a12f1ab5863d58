use serde::Serialize;

use crate::{
    dates::Clock,
    models::{
        CanonicalDate, DaySessions, ExerciseSets, LoggedSet, MetadataLog, ParsedSession,
        WorkoutLog, WorkoutMetadata,
    },
};

/// A parsed session reshaped into the canonical log layout for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSession {
    pub date: CanonicalDate,
    pub exercises: DaySessions,
    pub metadata: WorkoutMetadata,
}

impl NormalizedSession {
    /// Merges into the stored log and records the metadata for the date.
    ///
    /// Only exercises named in this session are replaced on that date.
    pub fn apply_to(&self, log: &mut WorkoutLog, metadata: &mut MetadataLog) {
        log.merge_day(self.date.clone(), self.exercises.clone());
        metadata.insert(self.date.clone(), self.metadata.clone());
    }
}

/// Summary cache entry for a parsed session.
///
/// Counts come from `exercises`, the day as it will be stored, so an exercise
/// repeated in the paste or a set number declared twice is counted once.
pub fn extract_metadata(parsed: &ParsedSession, exercises: &DaySessions) -> WorkoutMetadata {
    WorkoutMetadata {
        title: parsed.title.clone(),
        raw_date_text: parsed.raw_date_text.clone(),
        duration: parsed.duration.clone(),
        volume_text: parsed.volume_text.clone(),
        calories_text: parsed.calories_text.clone(),
        exercise_count: exercises.len(),
        total_sets: exercises.values().map(|sets| sets.len()).sum(),
    }
}

/// Reshapes `parsed` into `exercise -> set number -> set` for `target_date`.
///
/// Any date embedded in the text is ignored; the caller decides the date. A set
/// number declared twice for one exercise keeps its last occurrence. Every set is
/// stamped with the clock's current time.
pub fn normalize(
    parsed: &ParsedSession,
    target_date: CanonicalDate,
    clock: &impl Clock,
) -> NormalizedSession {
    let recorded_at = clock.now();

    let mut exercises = DaySessions::new();
    for exercise in &parsed.exercises {
        let sets: ExerciseSets = exercise
            .sets
            .iter()
            .map(|s| {
                let logged = LoggedSet {
                    recorded_at,
                    set: s.set.clone(),
                };
                (s.set_number, logged)
            })
            .collect();

        // The same name twice in one paste: later sets win per set number.
        exercises
            .entry(exercise.name.clone())
            .or_default()
            .extend(sets);
    }

    NormalizedSession {
        date: target_date,
        metadata: extract_metadata(parsed, &exercises),
        exercises,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dates::FixedClock,
        models::{DecodedSet, ParsedExercise, ParsedSet, RepsOrDuration, SetKind},
    };
    use chrono::{FixedOffset, TimeZone};

    fn clock() -> FixedClock {
        FixedClock(
            FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2026, 2, 12, 9, 15, 0)
                .unwrap(),
        )
    }

    fn rep_set(n: u32, reps: u32, w: &str) -> ParsedSet {
        ParsedSet {
            set_number: n,
            set: DecodedSet::RepBased {
                reps,
                weight_text: w.to_string(),
            },
        }
    }

    fn session(exercises: Vec<ParsedExercise>) -> ParsedSession {
        ParsedSession {
            raw_date_text: Some("11 feb 2026, 18:36".to_string()),
            exercises,
            ..Default::default()
        }
    }

    #[test]
    fn bench_press_lands_under_target_date_and_set_number() {
        let parsed = session(vec![ParsedExercise {
            name: "Press banca".to_string(),
            sets: vec![rep_set(1, 8, "60 kg")],
        }]);
        let date: CanonicalDate = "2026-02-11".parse().unwrap();

        let mut log = WorkoutLog::new();
        let mut meta = MetadataLog::new();
        normalize(&parsed, date.clone(), &clock()).apply_to(&mut log, &mut meta);

        let set = &log.day(&date).unwrap()["Press banca"][&1];
        assert_eq!(set.weight_text(), Some("60 kg"));
        assert_eq!(set.reps_or_duration(), Some(RepsOrDuration::Reps(8)));
        assert_eq!(set.kind(), SetKind::RepBased);
        assert_eq!(meta[&date].exercise_count, 1);
        assert_eq!(meta[&date].total_sets, 1);
    }

    #[test]
    fn target_date_overrides_embedded_date() {
        let parsed = session(vec![ParsedExercise {
            name: "Remo".to_string(),
            sets: vec![rep_set(1, 10, "40 kg")],
        }]);
        let override_date: CanonicalDate = "2026-02-14".parse().unwrap();
        let normalized = normalize(&parsed, override_date.clone(), &clock());
        assert_eq!(normalized.date, override_date);
        assert_eq!(
            normalized.metadata.raw_date_text.as_deref(),
            Some("11 feb 2026, 18:36")
        );
    }

    #[test]
    fn duplicate_set_numbers_keep_the_last_one() {
        let parsed = session(vec![ParsedExercise {
            name: "Dominadas".to_string(),
            sets: vec![rep_set(1, 8, "PC"), rep_set(2, 7, "PC"), rep_set(1, 10, "PC")],
        }]);
        let n = normalize(&parsed, "2026-02-11".parse().unwrap(), &clock());
        let sets = &n.exercises["Dominadas"];
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[&1].reps_or_duration(), Some(RepsOrDuration::Reps(10)));
    }

    #[test]
    fn repeated_exercise_counts_once_in_metadata() {
        let parsed = session(vec![
            ParsedExercise {
                name: "Curl".to_string(),
                sets: vec![rep_set(1, 12, "12 kg"), rep_set(2, 10, "14 kg")],
            },
            ParsedExercise {
                name: "Curl".to_string(),
                sets: vec![rep_set(3, 8, "16 kg")],
            },
        ]);
        let n = normalize(&parsed, "2026-02-11".parse().unwrap(), &clock());
        assert_eq!(n.exercises.len(), 1);
        assert_eq!(n.exercises["Curl"].len(), 3);
        assert_eq!(n.metadata.exercise_count, 1);
        assert_eq!(n.metadata.total_sets, 3);
    }

    #[test]
    fn time_and_unparsed_sets_are_kept() {
        let parsed = session(vec![ParsedExercise {
            name: "Plancha".to_string(),
            sets: vec![
                ParsedSet {
                    set_number: 1,
                    set: DecodedSet::TimeBased {
                        duration: "01:01".to_string(),
                        weight_text: "PC".to_string(),
                    },
                },
                ParsedSet {
                    set_number: 2,
                    set: DecodedSet::Unparsed {
                        raw: "al fallo".to_string(),
                    },
                },
            ],
        }]);
        let n = normalize(&parsed, "2026-02-11".parse().unwrap(), &clock());
        let sets = &n.exercises["Plancha"];
        assert_eq!(
            sets[&1].reps_or_duration(),
            Some(RepsOrDuration::Duration("01:01".to_string()))
        );
        assert_eq!(sets[&2].kind(), SetKind::Unparsed);
    }

    #[test]
    fn recorded_at_comes_from_the_clock() {
        let parsed = session(vec![ParsedExercise {
            name: "Curl".to_string(),
            sets: vec![rep_set(1, 12, "12 kg")],
        }]);
        let n = normalize(&parsed, "2026-02-11".parse().unwrap(), &clock());
        assert_eq!(n.exercises["Curl"][&1].recorded_at, clock().0);
    }

    #[test]
    fn applying_leaves_other_dates_and_exercises_alone() {
        let mut log = WorkoutLog::new();
        let mut meta = MetadataLog::new();
        let day: CanonicalDate = "2026-02-11".parse().unwrap();
        let earlier: CanonicalDate = "2026-02-09".parse().unwrap();

        let first = session(vec![
            ParsedExercise {
                name: "Press banca".to_string(),
                sets: vec![rep_set(1, 8, "60 kg")],
            },
            ParsedExercise {
                name: "Fondos".to_string(),
                sets: vec![rep_set(1, 12, "PC")],
            },
        ]);
        normalize(&first, earlier.clone(), &clock()).apply_to(&mut log, &mut meta);
        normalize(&first, day.clone(), &clock()).apply_to(&mut log, &mut meta);

        let second = session(vec![ParsedExercise {
            name: "Press banca".to_string(),
            sets: vec![rep_set(1, 6, "70 kg")],
        }]);
        normalize(&second, day.clone(), &clock()).apply_to(&mut log, &mut meta);

        let today = log.day(&day).unwrap();
        assert_eq!(today["Press banca"][&1].weight_text(), Some("70 kg"));
        assert!(today.contains_key("Fondos"));
        assert_eq!(log.day(&earlier).unwrap()["Press banca"][&1].weight_text(), Some("60 kg"));
        assert_eq!(meta[&day].exercise_count, 1);
    }
}
