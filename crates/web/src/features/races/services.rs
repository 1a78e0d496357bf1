use sqlx::SqlitePool;
use storage::{
    error::Result,
    models::Race,
    repository::RaceRepository,
    services::timing::SplitPhase,
};

pub async fn get_race(pool: &SqlitePool, id: i64) -> Result<Race> {
    let repo = RaceRepository::new(pool);
    repo.find_by_id(id).await
}

/// Record one split timestamp
pub async fn record_split(
    pool: &SqlitePool,
    id: i64,
    phase: SplitPhase,
    timestamp_ms: i64,
) -> Result<Race> {
    let repo = RaceRepository::new(pool);
    repo.record_split(id, phase, timestamp_ms).await
}

/// Record one shooting bout
pub async fn record_shooting(pool: &SqlitePool, id: i64, range: i64, hits: i64) -> Result<Race> {
    let repo = RaceRepository::new(pool);
    repo.record_shooting(id, range, hits).await
}

/// Clear the stopwatch state of a race
pub async fn reset_race(pool: &SqlitePool, id: i64) -> Result<Race> {
    let repo = RaceRepository::new(pool);
    repo.reset(id).await
}

/// Remove a race and its paired opponent race
pub async fn remove_duel(pool: &SqlitePool, id: i64) -> Result<()> {
    let repo = RaceRepository::new(pool);
    repo.remove_duel(id).await
}
