use chrono::{FixedOffset, TimeZone};
use ironlog::{
    dates::FixedClock,
    db,
    import::prepare_import,
    models::{DailyFeeling, FeelingsLog, MetadataLog, WorkoutLog},
};
use tempfile::TempDir;

const TEXT: &str = "\
Mi entrenamiento:
Tirón
3 mar 2026, 07:40
DURACIÓN: 45min
Ejercicios: 1
Remo con barra
1: 10 repeticiones x 50 kg
2: 8 repeticiones x 55,5 kg
";

async fn open_temp() -> (TempDir, db::DB) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ironlog.db");
    let pool = db::open(path.to_str().unwrap()).await.unwrap();
    (dir, pool)
}

fn sample() -> (WorkoutLog, MetadataLog) {
    let offset = FixedOffset::east_opt(3600).unwrap();
    let clock = FixedClock(offset.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap());

    let mut log = WorkoutLog::new();
    let mut metadata = MetadataLog::new();
    prepare_import(TEXT, None, &clock)
        .unwrap()
        .apply_to(&mut log, &mut metadata);
    (log, metadata)
}

#[tokio::test]
async fn empty_store_loads_empty_logs() {
    let (_dir, pool) = open_temp().await;

    assert!(db::load_workout_log(&pool).await.unwrap().is_empty());
    assert!(db::load_metadata(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn saved_log_reads_back_unchanged() {
    let (_dir, pool) = open_temp().await;
    let (log, metadata) = sample();

    db::save_workout_log(&pool, &log).await.unwrap();
    db::save_metadata(&pool, &metadata).await.unwrap();

    assert_eq!(db::load_workout_log(&pool).await.unwrap(), log);
    assert_eq!(db::load_metadata(&pool).await.unwrap(), metadata);

    let raw = db::get(&pool, db::WORKOUT_LOGS_KEY).await.unwrap().unwrap();
    assert!(raw.contains("\"2026-03-03\""));
    assert!(raw.contains("\"Remo con barra\""));
}

#[tokio::test]
async fn export_then_import_into_a_fresh_store() {
    let (_a, source) = open_temp().await;
    let (log, metadata) = sample();
    db::save_workout_log(&source, &log).await.unwrap();
    db::save_metadata(&source, &metadata).await.unwrap();

    let at = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 3, 8, 0, 0)
        .unwrap();
    let feelings = FeelingsLog::from([(
        "2026-03-03".parse().unwrap(),
        DailyFeeling::new(7, 6, 8, at).unwrap(),
    )]);
    db::save_feelings(&source, &feelings).await.unwrap();

    let dump = db::export(&source).await.unwrap();
    assert!(dump.exported_at.is_some());
    let json = serde_json::to_string(&dump).unwrap();

    let (_b, target) = open_temp().await;
    db::import(&target, &serde_json::from_str(&json).unwrap())
        .await
        .unwrap();

    assert_eq!(db::load_workout_log(&target).await.unwrap(), log);
    assert_eq!(db::load_metadata(&target).await.unwrap(), metadata);
    assert_eq!(db::load_feelings(&target).await.unwrap(), feelings);
}

#[tokio::test]
async fn dump_without_feelings_still_imports() {
    let (_dir, pool) = open_temp().await;
    let dump: db::Dump =
        serde_json::from_str(r#"{ "workout_logs": {}, "workout_metadata": {} }"#).unwrap();

    db::import(&pool, &dump).await.unwrap();
    assert!(db::load_feelings(&pool).await.unwrap().is_empty());
    assert!(db::get(&pool, db::DAILY_FEELINGS_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn corrupt_entry_is_an_error() {
    let (_dir, pool) = open_temp().await;
    db::set(&pool, db::WORKOUT_LOGS_KEY, "not json").await.unwrap();

    assert!(db::load_workout_log(&pool).await.is_err());
}
