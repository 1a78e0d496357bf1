use storage::Database;
use storage::dto::event::CreateEventRequest;
use storage::error::StorageError;
use storage::models::{Discipline, Race};
use storage::repository::{CompetitorRepository, EventRepository, RaceRepository};
use storage::services::pairing::{DuelPair, Pairing};
use storage::services::points::PointsTable;
use storage::services::ranking::rank_races;
use storage::services::standings::{StandingsFilter, standings};
use storage::services::timing::SplitPhase;

async fn setup() -> Database {
    let db = Database::new("sqlite::memory:").await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

async fn create_competitors(db: &Database, names: &[&str]) -> Vec<i64> {
    let repo = CompetitorRepository::new(db.pool());
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        ids.push(repo.create(name).await.unwrap().competitor_id);
    }
    ids
}

fn event_request(name: &str, level: i64, discipline: Discipline) -> CreateEventRequest {
    CreateEventRequest {
        name: name.to_string(),
        date: None,
        level,
        discipline,
        location: "Meribel".to_string(),
        competitor_ids: Vec::new(),
        pairing: None,
        team1: None,
        team2: None,
    }
}

async fn create_duel_event(db: &Database, first: i64, second: Option<i64>) -> i64 {
    let pairing = Pairing::Duels(vec![DuelPair { first, second }]);
    EventRepository::new(db.pool())
        .create_with_races(&event_request("sprint", 1, Discipline::Sprint), &pairing)
        .await
        .unwrap()
        .event_id
}

async fn run_sprint(races: &RaceRepository<'_>, race_id: i64, finish_ms: i64) {
    let course = [
        (SplitPhase::Start, 0),
        (SplitPhase::Lap1, finish_ms / 4),
        (SplitPhase::Shoot1, finish_ms / 4 + 5_000),
        (SplitPhase::Lap2, finish_ms * 2 / 3),
        (SplitPhase::Shoot2, finish_ms * 2 / 3 + 5_000),
        (SplitPhase::Finish, finish_ms),
    ];
    for (phase, ts) in course {
        races.record_split(race_id, phase, ts).await.unwrap();
    }
}

#[tokio::test]
async fn duel_creation_is_symmetric() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris"]).await;
    let event_id = create_duel_event(&db, ids[0], Some(ids[1])).await;

    let races = RaceRepository::new(db.pool())
        .list_by_event(event_id)
        .await
        .unwrap();
    assert_eq!(races.len(), 2);
    assert_eq!(races[0].opponent_id, Some(races[1].competitor_id));
    assert_eq!(races[1].opponent_id, Some(races[0].competitor_id));
}

#[tokio::test]
async fn starting_a_duelist_starts_the_opponent() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris"]).await;
    let event_id = create_duel_event(&db, ids[0], Some(ids[1])).await;

    let races = RaceRepository::new(db.pool());
    let pair = races.list_by_event(event_id).await.unwrap();

    races
        .record_split(pair[0].race_id, SplitPhase::Start, 10_000)
        .await
        .unwrap();

    let opponent = races.find_by_id(pair[1].race_id).await.unwrap();
    assert_eq!(opponent.splits.start_ms, Some(10_000));

    // A restart on the other side must not touch an already running clock.
    races
        .record_split(pair[1].race_id, SplitPhase::Start, 12_000)
        .await
        .unwrap();
    let first = races.find_by_id(pair[0].race_id).await.unwrap();
    assert_eq!(first.splits.start_ms, Some(10_000));
}

#[tokio::test]
async fn out_of_order_split_is_rejected_and_not_persisted() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna"]).await;
    let event_id = create_duel_event(&db, ids[0], None).await;

    let races = RaceRepository::new(db.pool());
    let race_id = races.list_by_event(event_id).await.unwrap()[0].race_id;

    races
        .record_split(race_id, SplitPhase::Start, 10_000)
        .await
        .unwrap();
    let err = races.record_split(race_id, SplitPhase::Lap1, 5_000).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));

    let race = races.find_by_id(race_id).await.unwrap();
    assert_eq!(race.splits.lap1_ms, None);

    // Skipping ahead without the intermediate splits is rejected too.
    let err = races.record_split(race_id, SplitPhase::Finish, 90_000).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));

    // A correction overtaking a later recorded split never lands either.
    races
        .record_split(race_id, SplitPhase::Lap1, 20_000)
        .await
        .unwrap();
    races
        .record_split(race_id, SplitPhase::Shoot1, 30_000)
        .await
        .unwrap();
    let err = races.record_split(race_id, SplitPhase::Lap1, 40_000).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));
    let race = races.find_by_id(race_id).await.unwrap();
    assert_eq!(race.splits.lap1_ms, Some(20_000));
}

#[tokio::test]
async fn finishing_derives_the_total_time() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna"]).await;
    let event_id = create_duel_event(&db, ids[0], None).await;

    let races = RaceRepository::new(db.pool());
    let race_id = races.list_by_event(event_id).await.unwrap()[0].race_id;

    run_sprint(&races, race_id, 61_000).await;

    let race = races.find_by_id(race_id).await.unwrap();
    assert_eq!(race.total_time_ms, Some(61_000));
    assert!(race.is_finished());
}

#[tokio::test]
async fn rerecording_a_bout_recomputes_the_penalty() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna"]).await;
    let event_id = create_duel_event(&db, ids[0], None).await;

    let races = RaceRepository::new(db.pool());
    let race_id = races.list_by_event(event_id).await.unwrap()[0].race_id;

    let race = races.record_shooting(race_id, 1, 2).await.unwrap();
    assert_eq!(race.shooting1_errors, 3);
    assert_eq!(race.penalty_count, 3);

    let race = races.record_shooting(race_id, 2, 5).await.unwrap();
    assert_eq!(race.penalty_count, 3);

    // A correction replaces the bout instead of accumulating on top.
    let race = races.record_shooting(race_id, 1, 4).await.unwrap();
    assert_eq!(race.shooting1_errors, 1);
    assert_eq!(race.penalty_count, 1);

    // A sprint course has no third range.
    let err = races.record_shooting(race_id, 3, 5).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));
    let err = races.record_shooting(race_id, 1, 6).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));
}

#[tokio::test]
async fn reset_returns_a_race_to_its_created_form() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna"]).await;
    let event_id = create_duel_event(&db, ids[0], None).await;

    let races = RaceRepository::new(db.pool());
    let race_id = races.list_by_event(event_id).await.unwrap()[0].race_id;

    run_sprint(&races, race_id, 61_000).await;
    races.record_shooting(race_id, 1, 2).await.unwrap();

    let race = races.reset(race_id).await.unwrap();
    assert_eq!(race.splits.start_ms, None);
    assert_eq!(race.total_time_ms, None);
    assert_eq!(race.shooting1_errors, 0);
    assert_eq!(race.penalty_count, 0);
    assert_eq!(race.rank, None);
}

#[tokio::test]
async fn adding_and_removing_a_duel_keeps_both_sides_in_step() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris", "Clea", "Dino"]).await;
    let event_id = create_duel_event(&db, ids[0], Some(ids[1])).await;

    let races = RaceRepository::new(db.pool());
    let added = races
        .add_duel(event_id, ids[2], Some(ids[3]))
        .await
        .unwrap();
    assert_eq!(added.len(), 2);
    assert_eq!(races.list_by_event(event_id).await.unwrap().len(), 4);

    races.remove_duel(added[0].race_id).await.unwrap();
    let remaining = races.list_by_event(event_id).await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(
        remaining
            .iter()
            .all(|r| r.competitor_id != ids[2] && r.competitor_id != ids[3])
    );

    let err = races.add_duel(event_id, ids[2], Some(ids[2])).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));
}

#[tokio::test]
async fn duplicate_selections_never_reach_the_event() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris"]).await;
    let events = EventRepository::new(db.pool());

    let pairing = Pairing::MassStart(vec![ids[0], ids[0]]);
    let err = events
        .create_with_races(&event_request("pursuit", 1, Discipline::Pursuit), &pairing)
        .await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));

    let pairing = Pairing::Duels(vec![DuelPair {
        first: ids[0],
        second: Some(ids[0]),
    }]);
    let err = events
        .create_with_races(&event_request("sprint", 1, Discipline::Sprint), &pairing)
        .await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));

    let mut req = event_request("relay", 10, Discipline::Relay);
    req.team1 = Some(vec![ids[0], ids[1]]);
    req.team2 = Some(vec![ids[1]]);
    let err = events
        .create_with_races(&req, &Pairing::MassStart(Vec::new()))
        .await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));

    // The rejected creations roll back whole: no event, no races.
    assert!(events.list("Meribel", None).await.unwrap().is_empty());
    assert!(
        RaceRepository::new(db.pool())
            .list_all()
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn duel_attachment_respects_discipline_and_roster() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris", "Clea"]).await;

    let pairing = Pairing::MassStart(vec![ids[0]]);
    let pursuit = EventRepository::new(db.pool())
        .create_with_races(&event_request("pursuit", 1, Discipline::Pursuit), &pairing)
        .await
        .unwrap();

    let races = RaceRepository::new(db.pool());
    let err = races.add_duel(pursuit.event_id, ids[1], Some(ids[2])).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));

    // Solo entries are still fine for a mass start.
    races.add_duel(pursuit.event_id, ids[1], None).await.unwrap();

    // One race per competitor per event.
    let err = races.add_duel(pursuit.event_id, ids[0], None).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));

    let sprint_id = create_duel_event(&db, ids[0], Some(ids[1])).await;
    let err = races.add_duel(sprint_id, ids[2], Some(ids[1])).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));
    assert_eq!(races.list_by_event(sprint_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn relay_assertion_ranks_both_teams_atomically() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris", "Clea", "Dino"]).await;

    let mut req = event_request("relay", 10, Discipline::Relay);
    req.team1 = Some(vec![ids[0], ids[1]]);
    req.team2 = Some(vec![ids[2], ids[3]]);
    let pairing = Pairing::MassStart(Vec::new());
    let event = EventRepository::new(db.pool())
        .create_with_races(&req, &pairing)
        .await
        .unwrap();

    let races = RaceRepository::new(db.pool());
    races.assert_relay_winner(event.event_id, 2).await.unwrap();

    let all: Vec<Race> = races.list_by_event(event.event_id).await.unwrap();
    assert_eq!(all.len(), 4);
    for race in &all {
        let expected = if race.team_id == Some(2) { 1 } else { 2 };
        assert_eq!(race.rank, Some(expected));
        assert_eq!(race.total_time_ms, Some(1));
        assert!(race.splits.finish_ms.is_some());
    }

    // The engines read the asserted ranks straight off the records.
    let table = PointsTable::default();
    for entry in rank_races(Discipline::Relay, &all) {
        let expected = if entry.rank == 1 { 10 } else { 4 };
        assert_eq!(table.points(event.level, entry.rank), expected);
    }
}

#[tokio::test]
async fn relay_assertion_is_rejected_elsewhere() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna"]).await;
    let event_id = create_duel_event(&db, ids[0], None).await;

    let races = RaceRepository::new(db.pool());
    let err = races.assert_relay_winner(event_id, 1).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));
    let err = races.assert_relay_winner(event_id, 3).await;
    assert!(matches!(err, Err(StorageError::InvalidInput(_))));
}

#[tokio::test]
async fn deleting_an_event_removes_its_races() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris"]).await;
    let event_id = create_duel_event(&db, ids[0], Some(ids[1])).await;

    EventRepository::new(db.pool()).delete(event_id).await.unwrap();

    let races = RaceRepository::new(db.pool());
    assert!(races.list_by_event(event_id).await.unwrap().is_empty());
    assert!(races.list_all().await.unwrap().is_empty());

    let err = EventRepository::new(db.pool()).delete(event_id).await;
    assert!(matches!(err, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn competitor_with_races_cannot_be_deleted() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris"]).await;
    create_duel_event(&db, ids[0], None).await;

    let competitors = CompetitorRepository::new(db.pool());
    let err = competitors.delete(ids[0]).await;
    assert!(matches!(err, Err(StorageError::ConstraintViolation(_))));

    competitors.delete(ids[1]).await.unwrap();
    let err = competitors.find_by_id(ids[1]).await;
    assert!(matches!(err, Err(StorageError::NotFound)));
}

#[tokio::test]
async fn summary_cache_refreshes_from_the_aggregator() {
    let db = setup().await;
    let ids = create_competitors(&db, &["Anna", "Boris"]).await;
    let event_id = create_duel_event(&db, ids[0], Some(ids[1])).await;

    let races = RaceRepository::new(db.pool());
    let pair = races.list_by_event(event_id).await.unwrap();
    for (race, finish) in pair.iter().zip([61_000, 65_000]) {
        run_sprint(&races, race.race_id, finish).await;
    }

    let events = EventRepository::new(db.pool());
    let competitors = CompetitorRepository::new(db.pool());
    let filter = StandingsFilter {
        location: "Meribel".to_string(),
        year: None,
        discipline: None,
        include_full_roster: false,
    };
    let rows = standings(
        &competitors.list().await.unwrap(),
        &events.list("Meribel", None).await.unwrap(),
        &races.list_all().await.unwrap(),
        &filter,
        &PointsTable::default(),
    );

    let winner = rows.iter().find(|r| r.competitor_id == ids[0]).unwrap();
    competitors.refresh_summary(ids[0], winner).await.unwrap();

    let cached = competitors.find_by_id(ids[0]).await.unwrap();
    assert_eq!(cached.total_races, 1);
    assert_eq!(cached.podiums, 1);
    assert_eq!(cached.best_rank, Some(1));
    assert_eq!(cached.best_time_ms, Some(61_000));
}
