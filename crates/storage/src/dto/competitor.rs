use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Competitor;
use crate::services::standings::CompetitorStanding;

/// Request payload for registering a competitor
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitorRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
}

/// Request payload for renaming a competitor
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompetitorRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
}

/// Basic competitor information, including the cosmetic summary cache
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitorResponse {
    pub competitor_id: i64,
    pub name: String,
    pub total_races: i64,
    pub podiums: i64,
    pub best_time_ms: Option<i64>,
    pub best_rank: Option<i64>,
}

/// Competitor profile: identity plus the freshly aggregated standing
/// for the requested location scope
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompetitorProfileResponse {
    pub competitor: CompetitorResponse,
    pub standing: CompetitorStanding,
}

impl From<Competitor> for CompetitorResponse {
    fn from(competitor: Competitor) -> Self {
        Self {
            competitor_id: competitor.competitor_id,
            name: competitor.name,
            total_races: competitor.total_races,
            podiums: competitor.podiums,
            best_time_ms: competitor.best_time_ms,
            best_rank: competitor.best_rank,
        }
    }
}
