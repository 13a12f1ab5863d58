use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    dates::parse_embedded_date,
    error::ImportError,
    models::{DecodedSet, ParsedExercise, ParsedSession, ParsedSet, SetKind},
};

use super::decoder::decode;

const TITLE_MARKER: &str = "Mi entrenamiento:";
const EXERCISES_MARKER: &str = "Ejercicios:";
const DURATION_LABEL: &str = "DURACIÓN";
const VOLUME_LABEL: &str = "Volumen:";
const CALORIES_LABEL: &str = "Calorías:";
const FOOTER_MARKERS: [&str; 2] = ["Rastreado con", "motra.com"];

// `3: 12 repeticiones x 45 kg`; a bare `3:` is still a (blank) set line.
static SET_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(?:\s+(.*))?$").unwrap());

#[derive(Debug, PartialEq, Eq)]
enum HeaderLine<'a> {
    TitleMarker,
    ExercisesMarker,
    Date,
    Duration(Option<&'a str>),
    Volume(Option<&'a str>),
    Calories(Option<&'a str>),
    Other,
}

fn value_after_colon(line: &str) -> Option<&str> {
    line.split_once(':')
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

fn classify(line: &str) -> HeaderLine<'_> {
    if line.eq_ignore_ascii_case(TITLE_MARKER) {
        HeaderLine::TitleMarker
    } else if line.contains(EXERCISES_MARKER) {
        HeaderLine::ExercisesMarker
    } else if line.to_uppercase().contains(DURATION_LABEL) {
        HeaderLine::Duration(value_after_colon(line))
    } else if line.contains(VOLUME_LABEL) {
        HeaderLine::Volume(value_after_colon(line))
    } else if line.contains(CALORIES_LABEL) {
        HeaderLine::Calories(value_after_colon(line))
    } else if parse_embedded_date(line).is_some() {
        HeaderLine::Date
    } else {
        HeaderLine::Other
    }
}

fn is_footer(line: &str) -> bool {
    line.starts_with("http") || FOOTER_MARKERS.iter().any(|m| line.contains(m))
}

/// Splits a set line into its declared number and the text after the prefix.
///
/// The number is `None` when it does not fit in a `u32`; the line is still a set.
fn split_set_line(line: &str) -> Option<(Option<u32>, &str)> {
    let caps = SET_LINE.captures(line)?;
    let number = caps.get(1)?.as_str().parse().ok();
    let text = caps.get(2).map_or("", |m| m.as_str());
    Some((number, text))
}

/// Parses a pasted session into its summary fields and exercises.
///
/// Only fails when there is no non-blank line at all. Exercises without a single
/// set line are dropped; set lines in an unknown notation are kept as
/// [`SetKind::Unparsed`].
pub fn parse(text: &str) -> Result<ParsedSession, ImportError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let mut session = ParsedSession::default();
    let body_start = scan_header(&lines, &mut session);
    session.exercises = scan_body(&lines[body_start..]);

    debug!(
        exercises = session.exercises.len(),
        sets = session.total_sets(),
        "parsed session"
    );
    Ok(session)
}

/// Fills the summary fields and returns the index of the first body line.
///
/// With an exercises marker the body starts right after it. Without one, the body
/// starts at the first line that is not a header line (the line after a title
/// marker still counts as the title).
fn scan_header(lines: &[&str], session: &mut ParsedSession) -> usize {
    let marker = lines
        .iter()
        .position(|l| classify(l) == HeaderLine::ExercisesMarker);
    let header_end = marker.unwrap_or(lines.len());
    let mut expect_title = false;

    for (i, line) in lines[..header_end].iter().enumerate() {
        if is_footer(line) {
            continue;
        }

        match classify(line) {
            HeaderLine::TitleMarker => expect_title = true,
            HeaderLine::Date => {
                if session.raw_date_text.is_none() {
                    session.raw_date_text = Some(line.to_string());
                }
            }
            HeaderLine::Duration(v) => session.duration = v.map(str::to_string),
            HeaderLine::Volume(v) => session.volume_text = v.map(str::to_string),
            HeaderLine::Calories(v) => session.calories_text = v.map(str::to_string),
            HeaderLine::ExercisesMarker => break,
            HeaderLine::Other => {
                if expect_title || (marker.is_some() && session.title.is_none()) {
                    session.title = Some(line.to_string());
                    expect_title = false;
                } else if marker.is_some() {
                    debug!(line, "ignoring unrecognized header line");
                } else {
                    return i;
                }
            }
        }
    }

    marker.map_or(lines.len(), |m| m + 1)
}

fn flush(current: Option<ParsedExercise>, exercises: &mut Vec<ParsedExercise>) {
    if let Some(exercise) = current {
        if exercise.sets.is_empty() {
            debug!(name = %exercise.name, "dropping exercise without sets");
        } else {
            exercises.push(exercise);
        }
    }
}

fn scan_body(lines: &[&str]) -> Vec<ParsedExercise> {
    let mut exercises = Vec::new();
    let mut current: Option<ParsedExercise> = None;

    for line in lines {
        if is_footer(line) {
            debug!(line, "skipping footer line");
            continue;
        }

        match split_set_line(line) {
            Some((set_number, set_text)) => {
                let Some(exercise) = current.as_mut() else {
                    warn!(line, "set line before any exercise name, skipping");
                    continue;
                };

                let Some(set_number) = set_number else {
                    warn!(exercise = %exercise.name, line, "set number out of range, keeping raw line");
                    exercise.sets.push(ParsedSet {
                        set_number: u32::MAX,
                        set: DecodedSet::Unparsed {
                            raw: line.to_string(),
                        },
                    });
                    continue;
                };

                let set = decode(set_text);
                if set.kind() == SetKind::Unparsed {
                    warn!(exercise = %exercise.name, set_number, set_text, "unrecognized set notation");
                }
                exercise.sets.push(ParsedSet { set_number, set });
            }
            None => {
                flush(current.take(), &mut exercises);
                current = Some(ParsedExercise {
                    name: line.to_string(),
                    sets: Vec::new(),
                });
            }
        }
    }

    // The last exercise has no following name line to close it.
    flush(current, &mut exercises);
    exercises
}
