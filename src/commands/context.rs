use anyhow::Result;
use ironlog::{
    context::build_training_context,
    dates::{SystemClock, resolve_today_key},
    db::{self, DB},
};

pub async fn handle(pool: &DB) -> Result<()> {
    let log = db::load_workout_log(pool).await?;
    let metadata = db::load_metadata(pool).await?;
    let feelings = db::load_feelings(pool).await?;
    let today = resolve_today_key(&SystemClock);

    tracing::debug!(sessions = log.len(), %today, "building training context");
    println!("{}", build_training_context(&log, &metadata, &feelings, &today));
    Ok(())
}
