use sqlx::SqlitePool;
use storage::{
    dto::standings::StandingsResponse,
    error::Result,
    repository::{CompetitorRepository, EventRepository, RaceRepository},
    services::points::PointsTable,
    services::standings::{StandingsFilter, available_years, standings},
};

/// Season standings for the filter scope, recomputed from the race
/// records on every call.
pub async fn get_standings(pool: &SqlitePool, filter: StandingsFilter) -> Result<StandingsResponse> {
    let competitors = CompetitorRepository::new(pool).list().await?;
    let events = EventRepository::new(pool).list(&filter.location, None).await?;
    let races = RaceRepository::new(pool).list_all().await?;

    let entries = standings(
        &competitors,
        &events,
        &races,
        &filter,
        &PointsTable::default(),
    );

    Ok(StandingsResponse {
        available_years: available_years(&events, &filter.location),
        location: filter.location,
        year: filter.year,
        discipline: filter.discipline,
        entries,
    })
}
