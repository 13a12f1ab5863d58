use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::models::OneRMFormula;

pub const DEFAULT_DB_PATH: &str = "./ironlog.db";

/// Config keys the application reads.
pub const KNOWN_KEYS: [&str; 2] = ["db", "formula"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFmt {
    Text,
    Json,
}

/// Prints `data` as pretty JSON, or runs `text` for the human-readable form.
pub fn emit<T: Serialize>(fmt: OutputFmt, data: &T, text: impl FnOnce()) -> Result<()> {
    match fmt {
        OutputFmt::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFmt::Text => text(),
    }
    Ok(())
}

/// Flat key/value settings stored as TOML.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub map: BTreeMap<String, String>,
}

impl Config {
    /// Default location: `<config dir>/ironlog/config`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("ironlog").join("config"))
            .context("Could not determine config directory")
    }

    /// A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        let content = toml::to_string(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to save config to {}", path.display()))
    }

    pub fn db_path(&self) -> &str {
        self.map.get("db").map_or(DEFAULT_DB_PATH, String::as_str)
    }

    /// The configured one-rep-max formula; unknown values fall back to Epley.
    pub fn formula(&self) -> OneRMFormula {
        self.map
            .get("formula")
            .and_then(|f| OneRMFormula::from_str(f, true).ok())
            .unwrap_or_default()
    }
}

/// Closest of `candidates` to `input`, if it is clearly the best match.
///
/// Used for "did you mean" hints; never to silently pick a different name.
pub fn best_suggestion<'a>(input: &str, candidates: &'a [String]) -> Option<&'a str> {
    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    let inp = input.to_lowercase();
    let mut scores: Vec<(&str, f64)> = candidates
        .iter()
        .map(|c| (c.as_str(), jaro_winkler(&inp, &c.to_lowercase())))
        .collect();

    // Highest score first.
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (best, best_score) = *scores.first()?;
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config");

        let mut cfg = Config::load(&path).unwrap();
        assert!(cfg.map.is_empty());
        assert_eq!(cfg.db_path(), DEFAULT_DB_PATH);
        assert_eq!(cfg.formula(), OneRMFormula::Epley);

        cfg.map.insert("db".into(), "/tmp/gym.db".into());
        cfg.map.insert("formula".into(), "brzycki".into());
        cfg.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.db_path(), "/tmp/gym.db");
        assert_eq!(loaded.formula(), OneRMFormula::Brzycki);
    }

    #[test]
    fn unknown_formula_falls_back_to_epley() {
        let mut cfg = Config::default();
        cfg.map.insert("formula".into(), "magic".into());
        assert_eq!(cfg.formula(), OneRMFormula::Epley);
    }

    #[test]
    fn suggestion_only_for_clear_matches() {
        let names = vec![
            "Press banca".to_string(),
            "Sentadilla".to_string(),
            "Remo con barra".to_string(),
        ];
        assert_eq!(best_suggestion("press banka", &names), Some("Press banca"));
        assert_eq!(best_suggestion("zzz", &names), None);
        assert_eq!(best_suggestion("anything", &[]), None);
    }
}
