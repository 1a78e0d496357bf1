use sqlx::SqlitePool;

use crate::error::{Result, StorageError};
use crate::models::Competitor;
use crate::services::standings::CompetitorStanding;

/// Repository for competitor records
pub struct CompetitorRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CompetitorRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Competitor>> {
        let competitors = sqlx::query_as::<_, Competitor>(
            r#"
            SELECT competitor_id, name, total_races, podiums, best_time_ms, best_rank
            FROM competitors
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(competitors)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Competitor> {
        let competitor = sqlx::query_as::<_, Competitor>(
            r#"
            SELECT competitor_id, name, total_races, podiums, best_time_ms, best_rank
            FROM competitors
            WHERE competitor_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competitor)
    }

    pub async fn create(&self, name: &str) -> Result<Competitor> {
        let competitor = sqlx::query_as::<_, Competitor>(
            r#"
            INSERT INTO competitors (name)
            VALUES (?)
            RETURNING competitor_id, name, total_races, podiums, best_time_ms, best_rank
            "#,
        )
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(competitor)
    }

    pub async fn update_name(&self, id: i64, name: &str) -> Result<Competitor> {
        let competitor = sqlx::query_as::<_, Competitor>(
            r#"
            UPDATE competitors
            SET name = ?
            WHERE competitor_id = ?
            RETURNING competitor_id, name, total_races, podiums, best_time_ms, best_rank
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competitor)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM competitors WHERE competitor_id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                let error = StorageError::from(e);
                if error.is_foreign_key_violation() {
                    StorageError::ConstraintViolation(
                        "Competitor still has recorded races".to_string(),
                    )
                } else {
                    error
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Rewrites the cosmetic summary cache from aggregator output. The
    /// cache is read-through only; race records stay the source of truth.
    pub async fn refresh_summary(&self, id: i64, standing: &CompetitorStanding) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE competitors
            SET total_races = ?, podiums = ?, best_time_ms = ?, best_rank = ?
            WHERE competitor_id = ?
            "#,
        )
        .bind(standing.races_count)
        .bind(standing.podiums)
        .bind(standing.best_time_ms)
        .bind(standing.best_rank)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
