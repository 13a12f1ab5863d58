pub mod calendar;
pub mod config;
pub mod context;
pub mod db;
pub mod exercises;
pub mod feeling;
pub mod history;
pub mod import;
pub mod log;
pub mod sessions;
