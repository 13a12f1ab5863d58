//! Workout import and strength progression.
//!
//! Pasted session summaries are validated, parsed and normalized into a
//! date-keyed log ([`import`]); [`progression`] reads that log back into per-date
//! best sets and one-rep-max estimates. Everything except [`db`] is synchronous
//! and free of I/O.

pub mod context;
pub mod dates;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod progression;
pub mod sessions;
pub mod types;
pub mod utils;
