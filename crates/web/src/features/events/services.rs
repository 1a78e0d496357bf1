use std::collections::HashMap;

use sqlx::SqlitePool;
use storage::{
    dto::event::{
        CreateEventRequest, EventDetailResponse, EventResponse, LeaderboardEntry,
        UpdateEventRequest,
    },
    dto::race::RaceResponse,
    error::Result,
    models::{Discipline, Event, Race},
    repository::{CompetitorRepository, EventRepository, RaceRepository},
    services::pairing::{Pairing, ensure_distinct, generate_pairing},
    services::points::PointsTable,
    services::ranking::rank_races,
    services::timing,
};

/// List events at a location
pub async fn list_events(
    pool: &SqlitePool,
    location: &str,
    discipline: Option<Discipline>,
) -> Result<Vec<Event>> {
    let repo = EventRepository::new(pool);
    repo.list(location, discipline).await
}

/// Event with its races and a leaderboard recomputed from the race
/// records on every call.
pub async fn get_event_detail(pool: &SqlitePool, id: i64) -> Result<EventDetailResponse> {
    let event = EventRepository::new(pool).find_by_id(id).await?;
    let races = RaceRepository::new(pool).list_by_event(id).await?;

    let names: HashMap<i64, String> = CompetitorRepository::new(pool)
        .list()
        .await?
        .into_iter()
        .map(|c| (c.competitor_id, c.name))
        .collect();
    let by_race: HashMap<i64, &Race> = races.iter().map(|r| (r.race_id, r)).collect();
    let table = PointsTable::default();

    let leaderboard = rank_races(event.discipline, &races)
        .into_iter()
        .filter_map(|entry| {
            let race = by_race.get(&entry.race_id)?;
            Some(LeaderboardEntry {
                rank: entry.rank,
                race_id: entry.race_id,
                competitor_id: entry.competitor_id,
                competitor_name: names.get(&entry.competitor_id).cloned().unwrap_or_default(),
                total_time_ms: race.total_time_ms,
                display_time: race.total_time_ms.map(timing::format_duration),
                penalty_count: race.penalty_count,
                points: table.points(event.level, entry.rank),
            })
        })
        .collect();

    Ok(EventDetailResponse {
        event: EventResponse::from(event),
        races: races.into_iter().map(RaceResponse::from).collect(),
        leaderboard,
    })
}

/// Creates the event with its initial race set. A pairing confirmed by
/// the preview endpoint is used as-is; otherwise the start structure is
/// generated fresh from the selected competitors.
pub async fn create_event(pool: &SqlitePool, request: &CreateEventRequest) -> Result<Event> {
    let pairing = match (request.discipline, &request.pairing) {
        (Discipline::Relay, _) => Pairing::MassStart(Vec::new()),
        (_, Some(pairs)) => Pairing::Duels(pairs.clone()),
        _ => generate_pairing(&request.competitor_ids, request.discipline),
    };

    let repo = EventRepository::new(pool);
    repo.create_with_races(request, &pairing).await
}

/// Generate a pairing preview without persisting anything
pub fn preview_pairing(competitor_ids: &[i64], discipline: Discipline) -> Result<Pairing> {
    ensure_distinct(competitor_ids)?;
    Ok(generate_pairing(competitor_ids, discipline))
}

pub async fn update_event(
    pool: &SqlitePool,
    id: i64,
    request: &UpdateEventRequest,
) -> Result<Event> {
    let repo = EventRepository::new(pool);
    repo.update_details(id, request).await
}

/// Delete an event and its races
pub async fn delete_event(pool: &SqlitePool, id: i64) -> Result<()> {
    let repo = EventRepository::new(pool);
    repo.delete(id).await
}

/// Attach a duel (or a solo race) to an existing event
pub async fn add_duel(
    pool: &SqlitePool,
    event_id: i64,
    competitor_id: i64,
    opponent_id: Option<i64>,
) -> Result<Vec<Race>> {
    let repo = RaceRepository::new(pool);
    repo.add_duel(event_id, competitor_id, opponent_id).await
}

/// Assert which relay team won
pub async fn assert_relay_result(
    pool: &SqlitePool,
    event_id: i64,
    winning_team: i64,
) -> Result<()> {
    let repo = RaceRepository::new(pool);
    repo.assert_relay_winner(event_id, winning_team).await
}
