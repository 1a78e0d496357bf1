use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::dto::event::{CreateEventRequest, UpdateEventRequest};
use crate::error::{Result, StorageError};
use crate::models::{Discipline, Event, EventStatus};
use crate::services::pairing::{Pairing, ensure_distinct};

const EVENT_COLUMNS: &str =
    "event_id, name, date, level, status, discipline, location, start_time_ms";

/// Repository for event records and their race sets
pub struct EventRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists events at one location, optionally narrowed to a discipline.
    pub async fn list(&self, location: &str, discipline: Option<Discipline>) -> Result<Vec<Event>> {
        let events = match discipline {
            Some(discipline) => {
                sqlx::query_as::<_, Event>(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events \
                     WHERE location = ? AND discipline = ? \
                     ORDER BY date DESC, event_id DESC"
                ))
                .bind(location)
                .bind(discipline)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Event>(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events \
                     WHERE location = ? \
                     ORDER BY date DESC, event_id DESC"
                ))
                .bind(location)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(events)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    /// Creates an event together with its initial race set in one
    /// transaction: either every record lands or none does.
    ///
    /// Duel disciplines take the resolved pairing; pursuit takes the
    /// mass-start list; relay takes the two ordered rosters from the
    /// request and denormalises them into team/passage fields.
    pub async fn create_with_races(
        &self,
        req: &CreateEventRequest,
        pairing: &Pairing,
    ) -> Result<Event> {
        let date = req.date.unwrap_or_else(|| chrono::Local::now().date_naive());

        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (name, date, level, status, discipline, location) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&req.name)
        .bind(date)
        .bind(req.level)
        .bind(EventStatus::Active)
        .bind(req.discipline)
        .bind(&req.location)
        .fetch_one(&mut *tx)
        .await?;

        match (req.discipline, pairing) {
            (Discipline::Relay, _) => {
                let team1 = req.team1.as_deref().unwrap_or_default();
                let team2 = req.team2.as_deref().unwrap_or_default();
                if team1.is_empty() || team2.is_empty() {
                    return Err(StorageError::invalid_input(
                        "a relay event needs both team rosters",
                    ));
                }
                let combined: Vec<i64> = team1.iter().chain(team2).copied().collect();
                ensure_distinct(&combined)?;
                for (team_id, roster) in [(1i64, team1), (2i64, team2)] {
                    for (idx, &competitor_id) in roster.iter().enumerate() {
                        insert_race(
                            &mut tx,
                            event.event_id,
                            competitor_id,
                            None,
                            req.discipline,
                            Some(team_id),
                            Some(idx as i64 + 1),
                        )
                        .await?;
                    }
                }
            }
            (_, Pairing::Duels(pairs)) => {
                let mut paired = Vec::with_capacity(pairs.len() * 2);
                for pair in pairs {
                    paired.push(pair.first);
                    paired.extend(pair.second);
                }
                ensure_distinct(&paired)?;
                for pair in pairs {
                    insert_race(
                        &mut tx,
                        event.event_id,
                        pair.first,
                        pair.second,
                        req.discipline,
                        None,
                        None,
                    )
                    .await?;
                    if let Some(second) = pair.second {
                        insert_race(
                            &mut tx,
                            event.event_id,
                            second,
                            Some(pair.first),
                            req.discipline,
                            None,
                            None,
                        )
                        .await?;
                    }
                }
            }
            (_, Pairing::MassStart(ids)) => {
                ensure_distinct(ids)?;
                for &competitor_id in ids {
                    insert_race(
                        &mut tx,
                        event.event_id,
                        competitor_id,
                        None,
                        req.discipline,
                        None,
                        None,
                    )
                    .await?;
                }
            }
        }

        tx.commit().await?;

        Ok(event)
    }

    /// Updates name/date/level/status. The discipline is deliberately
    /// not editable: ranking and grouping rules depend on it once races
    /// exist.
    pub async fn update_details(&self, id: i64, req: &UpdateEventRequest) -> Result<Event> {
        let current = self.find_by_id(id).await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET name = ?, date = ?, level = ?, status = ? \
             WHERE event_id = ? \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(req.name.as_deref().unwrap_or(&current.name))
        .bind(req.date.unwrap_or(current.date))
        .bind(req.level.unwrap_or(current.level))
        .bind(req.status.unwrap_or(current.status))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    /// Deletes an event and all its races in one transaction.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM races WHERE event_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE event_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

pub(crate) async fn insert_race(
    tx: &mut Transaction<'_, Sqlite>,
    event_id: i64,
    competitor_id: i64,
    opponent_id: Option<i64>,
    discipline: Discipline,
    team_id: Option<i64>,
    passage_number: Option<i64>,
) -> Result<i64> {
    // Ranges 3 and 4 only exist on the individual course.
    let extra_ranges = if discipline.range_count() == 4 {
        Some(0i64)
    } else {
        None
    };

    let race_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO races (
            event_id, competitor_id, opponent_id, discipline,
            team_id, passage_number, shooting3_errors, shooting4_errors
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING race_id
        "#,
    )
    .bind(event_id)
    .bind(competitor_id)
    .bind(opponent_id)
    .bind(discipline)
    .bind(team_id)
    .bind(passage_number)
    .bind(extra_ranges)
    .bind(extra_ranges)
    .fetch_one(&mut **tx)
    .await?;

    Ok(race_id)
}
