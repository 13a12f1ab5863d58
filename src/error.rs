use thiserror::Error;

/// Reasons an import stops before anything is written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The text does not look like an exported workout at all.
    #[error("the text does not look like an exported workout; copy the whole session and try again")]
    Rejected,

    #[error("nothing to import: the text is empty")]
    EmptyInput,

    /// Parsing succeeded but no exercise carried a single set line.
    #[error("no exercises found; check the format of the pasted text")]
    NoExercises,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date `{0}`: expected YYYY-MM-DD")]
    Invalid(String),
}

/// A well-being rating outside the 1..=10 scale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must be between {min} and {max}, got {value}")]
pub struct RatingError {
    pub field: &'static str,
    pub value: u8,
    pub min: u8,
    pub max: u8,
}
