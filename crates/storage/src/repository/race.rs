use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::{Discipline, Race};
use crate::repository::event::insert_race;
use crate::services::shooting;
use crate::services::timing::{self, SplitPhase};

/// Repository for race records: the atomic scored units of an event.
/// Every multi-record mutation (duel pairs, relay assertions) runs in
/// a single all-or-nothing transaction.
pub struct RaceRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RaceRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Races of one event in insertion order, which is also the
    /// ranking engine's tie-break order.
    pub async fn list_by_event(&self, event_id: i64) -> Result<Vec<Race>> {
        let races = sqlx::query_as::<_, Race>(
            "SELECT * FROM races WHERE event_id = ? ORDER BY race_id",
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(races)
    }

    pub async fn list_by_competitor(&self, competitor_id: i64) -> Result<Vec<Race>> {
        let races = sqlx::query_as::<_, Race>(
            "SELECT * FROM races WHERE competitor_id = ? ORDER BY race_id",
        )
        .bind(competitor_id)
        .fetch_all(self.pool)
        .await?;

        Ok(races)
    }

    pub async fn list_all(&self) -> Result<Vec<Race>> {
        let races = sqlx::query_as::<_, Race>("SELECT * FROM races ORDER BY race_id")
            .fetch_all(self.pool)
            .await?;

        Ok(races)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Race> {
        let race = sqlx::query_as::<_, Race>("SELECT * FROM races WHERE race_id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(race)
    }

    /// Attaches a duel (or a solo participant) to an existing event,
    /// creating both symmetric races in one transaction.
    pub async fn add_duel(
        &self,
        event_id: i64,
        competitor_id: i64,
        opponent_id: Option<i64>,
    ) -> Result<Vec<Race>> {
        let discipline = self.event_discipline(event_id).await?;
        if discipline == Discipline::Relay {
            return Err(StorageError::invalid_input(
                "relay participants are managed through the team rosters",
            ));
        }
        if discipline.is_mass_start() && opponent_id.is_some() {
            return Err(StorageError::invalid_input(
                "a mass-start race has no duel opponent",
            ));
        }
        if opponent_id == Some(competitor_id) {
            return Err(StorageError::invalid_input(
                "a competitor cannot duel themselves",
            ));
        }
        for id in [Some(competitor_id), opponent_id].into_iter().flatten() {
            let entered = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM races WHERE event_id = ? AND competitor_id = ?",
            )
            .bind(event_id)
            .bind(id)
            .fetch_one(self.pool)
            .await?;
            if entered > 0 {
                return Err(StorageError::invalid_input(format!(
                    "competitor {id} already has a race in this event"
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        let first = insert_race(
            &mut tx,
            event_id,
            competitor_id,
            opponent_id,
            discipline,
            None,
            None,
        )
        .await?;
        let mut ids = vec![first];

        if let Some(opponent_id) = opponent_id {
            let second = insert_race(
                &mut tx,
                event_id,
                opponent_id,
                Some(competitor_id),
                discipline,
                None,
                None,
            )
            .await?;
            ids.push(second);
        }

        tx.commit().await?;

        let mut races = Vec::with_capacity(ids.len());
        for id in ids {
            races.push(self.find_by_id(id).await?);
        }
        Ok(races)
    }

    /// Removes a duel: the race and, if paired, its opponent's race, in
    /// one transaction.
    pub async fn remove_duel(&self, race_id: i64) -> Result<()> {
        let race = self.find_by_id(race_id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM races WHERE race_id = ?")
            .bind(race.race_id)
            .execute(&mut *tx)
            .await?;

        if let Some(opponent_id) = race.opponent_id {
            sqlx::query(
                "DELETE FROM races WHERE event_id = ? AND competitor_id = ? AND race_id != ?",
            )
            .bind(race.event_id)
            .bind(opponent_id)
            .bind(race.race_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Records one split timestamp. Monotonicity and phase ordering are
    /// validated before anything is written; crossing the finish line
    /// derives the total time. A duel start also stamps an unstarted
    /// opponent in the same transaction, so both clocks share one gun.
    pub async fn record_split(
        &self,
        race_id: i64,
        phase: SplitPhase,
        timestamp_ms: i64,
    ) -> Result<Race> {
        let race = self.find_by_id(race_id).await?;

        let mut splits = race.splits.clone();
        timing::record_split(&mut splits, race.discipline, phase, timestamp_ms)?;
        let total_time_ms = timing::total_time(&splits);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE races
            SET start_ms = ?, lap1_ms = ?, shoot1_ms = ?, lap2_ms = ?, shoot2_ms = ?,
                lap3_ms = ?, shoot3_ms = ?, lap4_ms = ?, shoot4_ms = ?, finish_ms = ?,
                total_time_ms = ?
            WHERE race_id = ?
            "#,
        )
        .bind(splits.start_ms)
        .bind(splits.lap1_ms)
        .bind(splits.shoot1_ms)
        .bind(splits.lap2_ms)
        .bind(splits.shoot2_ms)
        .bind(splits.lap3_ms)
        .bind(splits.shoot3_ms)
        .bind(splits.lap4_ms)
        .bind(splits.shoot4_ms)
        .bind(splits.finish_ms)
        .bind(total_time_ms)
        .bind(race.race_id)
        .execute(&mut *tx)
        .await?;

        if phase == SplitPhase::Start {
            if let Some(opponent_id) = race.opponent_id {
                sqlx::query(
                    r#"
                    UPDATE races
                    SET start_ms = ?
                    WHERE event_id = ? AND competitor_id = ? AND start_ms IS NULL
                    "#,
                )
                .bind(timestamp_ms)
                .bind(race.event_id)
                .bind(opponent_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.find_by_id(race_id).await
    }

    /// Records one shooting bout as hits out of five. The penalty count
    /// is recomputed from the per-range error fields, never patched
    /// incrementally.
    pub async fn record_shooting(&self, race_id: i64, range: i64, hits: i64) -> Result<Race> {
        let mut race = self.find_by_id(race_id).await?;

        let range_count = race.discipline.range_count() as i64;
        if !(1..=range_count).contains(&range) {
            return Err(StorageError::invalid_input(format!(
                "range must be between 1 and {range_count} for a {} race",
                race.discipline.as_str()
            )));
        }
        let errors = shooting::errors_from_hits(hits)?;

        let column = match range {
            1 => "shooting1_errors",
            2 => "shooting2_errors",
            3 => "shooting3_errors",
            _ => "shooting4_errors",
        };
        match range {
            1 => race.shooting1_errors = errors,
            2 => race.shooting2_errors = errors,
            3 => race.shooting3_errors = Some(errors),
            _ => race.shooting4_errors = Some(errors),
        }
        let penalty_count = shooting::penalty_count(&race);

        sqlx::query(&format!(
            "UPDATE races SET {column} = ?, penalty_count = ? WHERE race_id = ?"
        ))
        .bind(errors)
        .bind(penalty_count)
        .bind(race.race_id)
        .execute(self.pool)
        .await?;

        self.find_by_id(race_id).await
    }

    /// Clears the stopwatch state of one race back to its created form.
    pub async fn reset(&self, race_id: i64) -> Result<Race> {
        let race = self.find_by_id(race_id).await?;
        let extra_ranges = if race.discipline.range_count() == 4 {
            Some(0i64)
        } else {
            None
        };

        sqlx::query(
            r#"
            UPDATE races
            SET start_ms = NULL, lap1_ms = NULL, shoot1_ms = NULL, lap2_ms = NULL,
                shoot2_ms = NULL, lap3_ms = NULL, shoot3_ms = NULL, lap4_ms = NULL,
                shoot4_ms = NULL, finish_ms = NULL, total_time_ms = NULL,
                shooting1_errors = 0, shooting2_errors = 0,
                shooting3_errors = ?, shooting4_errors = ?,
                penalty_count = 0, rank = NULL, points = NULL
            WHERE race_id = ?
            "#,
        )
        .bind(extra_ranges)
        .bind(extra_ranges)
        .bind(race.race_id)
        .execute(self.pool)
        .await?;

        self.find_by_id(race_id).await
    }

    /// Asserts the relay result: rank 1 for every race of the winning
    /// team and rank 2 for every race of the other team, in one
    /// transaction so no observer can see only one team updated. Races
    /// without a measured time get the sentinel "done" marker and an
    /// artificial finish stamp, as the result is asserted rather than
    /// timed.
    pub async fn assert_relay_winner(&self, event_id: i64, winning_team: i64) -> Result<()> {
        if !(1..=2).contains(&winning_team) {
            return Err(StorageError::invalid_input("team must be 1 or 2"));
        }
        let discipline = self.event_discipline(event_id).await?;
        if discipline != Discipline::Relay {
            return Err(StorageError::invalid_input(
                "relay results can only be asserted on relay events",
            ));
        }

        let losing_team = if winning_team == 1 { 2 } else { 1 };
        let asserted_at_ms = chrono::Utc::now().timestamp_millis();

        let mut tx = self.pool.begin().await?;

        for (team_id, rank) in [(winning_team, 1i64), (losing_team, 2i64)] {
            sqlx::query(
                r#"
                UPDATE races
                SET rank = ?,
                    total_time_ms = COALESCE(total_time_ms, 1),
                    finish_ms = COALESCE(finish_ms, ?)
                WHERE event_id = ? AND team_id = ?
                "#,
            )
            .bind(rank)
            .bind(asserted_at_ms)
            .bind(event_id)
            .bind(team_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn event_discipline(&self, event_id: i64) -> Result<Discipline> {
        let discipline =
            sqlx::query_scalar::<_, Discipline>("SELECT discipline FROM events WHERE event_id = ?")
                .bind(event_id)
                .fetch_optional(self.pool)
                .await?
                .ok_or(StorageError::NotFound)?;

        Ok(discipline)
    }
}
