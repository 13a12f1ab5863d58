use crate::cli::ConfigCmd;
use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use ironlog::{
    models::OneRMFormula,
    types::{Config, DEFAULT_DB_PATH, KNOWN_KEYS},
};

/// Rejects values the application could not use for a known key.
fn check_value(key: &str, val: &str) -> Result<(), String> {
    match key {
        "db" if val.trim().is_empty() => Err("`db` needs a file path".to_string()),
        "formula" if OneRMFormula::from_str(val, true).is_err() => {
            let names: Vec<String> = OneRMFormula::value_variants()
                .iter()
                .map(ToString::to_string)
                .collect();
            Err(format!("unknown formula `{}` (expected one of: {})", val, names.join(", ")))
        }
        _ => Ok(()),
    }
}

pub async fn handle(cmd: ConfigCmd) -> Result<()> {
    let path = Config::default_path()?;
    let mut cfg = Config::load(&path)?;

    match cmd {
        ConfigCmd::List => {
            println!("{} {}", "Config:".cyan().bold(), path.display().to_string().dimmed());
            println!("  {} = {}", "db".green(), cfg.db_path());
            println!("  {} = {}", "formula".green(), cfg.formula());
            for (k, v) in cfg.map.iter().filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str())) {
                println!("  {} = {} {}", k.yellow(), v, "(unused)".dimmed());
            }
        }

        ConfigCmd::Get { key } => match (cfg.map.get(&key), key.as_str()) {
            (Some(val), _) => println!("{}", val),
            (None, "db") => println!("{} {}", DEFAULT_DB_PATH, "(default)".dimmed()),
            (None, "formula") => println!("{} {}", OneRMFormula::default(), "(default)".dimmed()),
            (None, _) => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            check_value(&key, &val).map_err(anyhow::Error::msg)?;
            if !KNOWN_KEYS.contains(&key.as_str()) {
                println!(
                    "{} `{}` is not read by ironlog (known keys: {})",
                    "warning:".yellow().bold(),
                    key,
                    KNOWN_KEYS.join(", ")
                );
            }

            tracing::debug!(%key, %val, "saving config key");
            cfg.map.insert(key.clone(), val.clone());
            cfg.save(&path)?;
            println!("{} `{}` = `{}`", "ok:".green().bold(), key, val);
        }

        ConfigCmd::Unset { key } => match cfg.map.remove(&key) {
            Some(_) => {
                cfg.save(&path)?;
                println!("{} removed `{}`", "ok:".green().bold(), key);
            }
            None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_are_checked() {
        assert!(check_value("formula", "Brzycki").is_ok());
        assert!(check_value("formula", "wendler").is_err());
        assert!(check_value("db", "  ").is_err());
        assert!(check_value("db", "/tmp/x.db").is_ok());
        assert!(check_value("anything", "").is_ok());
    }
}
