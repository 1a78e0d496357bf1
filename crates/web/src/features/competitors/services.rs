use sqlx::SqlitePool;
use storage::{
    dto::competitor::{CompetitorProfileResponse, CompetitorResponse, CreateCompetitorRequest},
    error::{Result, StorageError},
    models::{Competitor, Race},
    repository::{CompetitorRepository, EventRepository, RaceRepository},
    services::points::PointsTable,
    services::standings::{StandingsFilter, standings},
};

/// List all competitors
pub async fn list_competitors(pool: &SqlitePool) -> Result<Vec<Competitor>> {
    let repo = CompetitorRepository::new(pool);
    repo.list().await
}

pub async fn get_competitor(pool: &SqlitePool, id: i64) -> Result<Competitor> {
    let repo = CompetitorRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn list_competitor_races(pool: &SqlitePool, id: i64) -> Result<Vec<Race>> {
    CompetitorRepository::new(pool).find_by_id(id).await?;
    RaceRepository::new(pool).list_by_competitor(id).await
}

/// Aggregates the competitor's standing for the requested scope. The
/// unfiltered location-wide view also refreshes the summary cache on
/// the competitor record, so list views stay roughly current without a
/// background job.
pub async fn get_profile(
    pool: &SqlitePool,
    id: i64,
    filter: StandingsFilter,
) -> Result<CompetitorProfileResponse> {
    let competitors = CompetitorRepository::new(pool);
    let competitor = competitors.find_by_id(id).await?;

    let events = EventRepository::new(pool).list(&filter.location, None).await?;
    let races = RaceRepository::new(pool).list_all().await?;

    let roster = [competitor.clone()];
    let mut scoped = filter.clone();
    scoped.include_full_roster = true;

    let Some(standing) = standings(&roster, &events, &races, &scoped, &PointsTable::default())
        .into_iter()
        .next()
    else {
        return Err(StorageError::NotFound);
    };

    if filter.year.is_none() && filter.discipline.is_none() {
        competitors.refresh_summary(id, &standing).await?;
    }
    let competitor = competitors.find_by_id(id).await?;

    Ok(CompetitorProfileResponse {
        competitor: CompetitorResponse::from(competitor),
        standing,
    })
}

/// Register a new competitor
pub async fn create_competitor(
    pool: &SqlitePool,
    request: &CreateCompetitorRequest,
) -> Result<Competitor> {
    let repo = CompetitorRepository::new(pool);
    repo.create(&request.name).await
}

pub async fn update_competitor(pool: &SqlitePool, id: i64, name: &str) -> Result<Competitor> {
    let repo = CompetitorRepository::new(pool);
    repo.update_name(id, name).await
}

/// Delete a competitor without race history
pub async fn delete_competitor(pool: &SqlitePool, id: i64) -> Result<()> {
    let repo = CompetitorRepository::new(pool);
    repo.delete(id).await
}
