//! SQLite-backed key/value store holding the serialized log and metadata.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::models::{FeelingsLog, MetadataLog, WorkoutLog};

pub type DB = SqlitePool;

pub const WORKOUT_LOGS_KEY: &str = "workout-logs";
pub const WORKOUT_METADATA_KEY: &str = "workout-metadata";
pub const DAILY_FEELINGS_KEY: &str = "daily-feelings";

pub async fn open(path: &str) -> Result<DB> {
    let opts = SqliteConnectOptions::from_str(path)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database `{}`", path))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

pub async fn get(pool: &DB, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar("SELECT value FROM kv WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

pub async fn set(pool: &DB, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(Local::now().to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}

async fn load_json<T: DeserializeOwned + Default>(pool: &DB, key: &str) -> Result<T> {
    match get(pool, key).await? {
        Some(raw) => serde_json::from_str(&raw).with_context(|| format!("Corrupt `{}` entry", key)),
        None => Ok(T::default()),
    }
}

async fn save_json<T: Serialize>(pool: &DB, key: &str, value: &T) -> Result<()> {
    set(pool, key, &serde_json::to_string(value)?).await
}

pub async fn load_workout_log(pool: &DB) -> Result<WorkoutLog> {
    load_json(pool, WORKOUT_LOGS_KEY).await
}

pub async fn save_workout_log(pool: &DB, log: &WorkoutLog) -> Result<()> {
    save_json(pool, WORKOUT_LOGS_KEY, log).await
}

pub async fn load_metadata(pool: &DB) -> Result<MetadataLog> {
    load_json(pool, WORKOUT_METADATA_KEY).await
}

pub async fn save_metadata(pool: &DB, metadata: &MetadataLog) -> Result<()> {
    save_json(pool, WORKOUT_METADATA_KEY, metadata).await
}

pub async fn load_feelings(pool: &DB) -> Result<FeelingsLog> {
    load_json(pool, DAILY_FEELINGS_KEY).await
}

pub async fn save_feelings(pool: &DB, feelings: &FeelingsLog) -> Result<()> {
    save_json(pool, DAILY_FEELINGS_KEY, feelings).await
}

/// Everything the store holds, as written by `db export`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dump {
    pub workout_logs: WorkoutLog,
    pub workout_metadata: MetadataLog,
    pub daily_feelings: FeelingsLog,
    pub exported_at: Option<String>,
}

pub async fn export(pool: &DB) -> Result<Dump> {
    Ok(Dump {
        workout_logs: load_workout_log(pool).await?,
        workout_metadata: load_metadata(pool).await?,
        daily_feelings: load_feelings(pool).await?,
        exported_at: Some(Local::now().to_rfc3339()),
    })
}

/// Replaces the stored log, metadata and feelings with the dump's contents.
///
/// Dumps written before feelings were tracked restore with no feelings.
pub async fn import(pool: &DB, dump: &Dump) -> Result<()> {
    save_workout_log(pool, &dump.workout_logs).await?;
    save_metadata(pool, &dump.workout_metadata).await?;
    save_feelings(pool, &dump.daily_feelings).await
}
