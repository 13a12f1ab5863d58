use anyhow::{Context, Result};
use colored::Colorize;
use ironlog::db::{self, DB, Dump};

use crate::cli::DbCmd;

const DEFAULT_DUMP_FILE: &str = "dump.json";

pub async fn handle(cmd: DbCmd, pool: &DB) -> Result<()> {
    match cmd {
        DbCmd::Export { file } => export(pool, file.as_deref().unwrap_or(DEFAULT_DUMP_FILE)).await,
        DbCmd::Import { file } => import(pool, &file).await,
    }
}

async fn export(pool: &DB, path: &str) -> Result<()> {
    let dump = db::export(pool).await?;
    let json = serde_json::to_string_pretty(&dump)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Could not write `{}`", path))?;

    println!(
        "{} exported {} workout day(s) to `{}`",
        "ok:".green().bold(),
        dump.workout_logs.len(),
        path
    );
    Ok(())
}

async fn import(pool: &DB, path: &str) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read file: `{}`", path))?;
    let dump: Dump =
        serde_json::from_str(&raw).with_context(|| format!("`{}` is not an ironlog export", path))?;

    db::import(pool, &dump).await?;
    println!(
        "{} restored {} workout day(s) from `{}`",
        "ok:".green().bold(),
        dump.workout_logs.len(),
        path
    );
    Ok(())
}
