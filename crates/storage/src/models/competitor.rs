use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A registered competitor.
///
/// The summary fields (`total_races`, `podiums`, `best_time_ms`,
/// `best_rank`) are a read-through cache rebuilt from the standings
/// aggregator; the race records are the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competitor {
    pub competitor_id: i64,
    pub name: String,
    pub total_races: i64,
    pub podiums: i64,
    pub best_time_ms: Option<i64>,
    pub best_rank: Option<i64>,
}
