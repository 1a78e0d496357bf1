use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Discipline, Race, SplitTimes};
use crate::services::timing::{self, SplitPhase};

/// Request payload recording one split timestamp
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordSplitRequest {
    pub phase: SplitPhase,
    pub timestamp_ms: i64,
}

/// Request payload recording one shooting bout (hits out of 5)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordShootingRequest {
    #[validate(range(min = 1, max = 4, message = "Range must be between 1 and 4"))]
    pub range: i64,

    #[validate(range(min = 0, max = 5, message = "Hits must be between 0 and 5"))]
    pub hits: i64,
}

/// Request payload attaching a duel (or a solo participant) to an event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddDuelRequest {
    pub competitor_id: i64,
    pub opponent_id: Option<i64>,
}

/// Race record with its derived timing quantities
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RaceResponse {
    pub race_id: i64,
    pub event_id: i64,
    pub competitor_id: i64,
    pub opponent_id: Option<i64>,
    pub discipline: Discipline,
    pub team_id: Option<i64>,
    pub passage_number: Option<i64>,
    pub splits: SplitTimes,
    pub shooting1_errors: i64,
    pub shooting2_errors: i64,
    pub shooting3_errors: Option<i64>,
    pub shooting4_errors: Option<i64>,
    pub total_time_ms: Option<i64>,
    pub display_time: Option<String>,
    pub ski_time_ms: Option<i64>,
    pub shooting_time_ms: Option<i64>,
    pub penalty_count: i64,
    pub rank: Option<i64>,
    pub points: Option<i64>,
    pub start_offset_ms: Option<i64>,
}

impl From<Race> for RaceResponse {
    fn from(race: Race) -> Self {
        let ski_time_ms = timing::ski_time(&race.splits, race.discipline);
        let shooting_time_ms = timing::shooting_time(&race.splits);
        let display_time = race.total_time_ms.map(timing::format_duration);
        Self {
            race_id: race.race_id,
            event_id: race.event_id,
            competitor_id: race.competitor_id,
            opponent_id: race.opponent_id,
            discipline: race.discipline,
            team_id: race.team_id,
            passage_number: race.passage_number,
            splits: race.splits,
            shooting1_errors: race.shooting1_errors,
            shooting2_errors: race.shooting2_errors,
            shooting3_errors: race.shooting3_errors,
            shooting4_errors: race.shooting4_errors,
            total_time_ms: race.total_time_ms,
            display_time,
            ski_time_ms,
            shooting_time_ms,
            penalty_count: race.penalty_count,
            rank: race.rank,
            points: race.points,
            start_offset_ms: race.start_offset_ms,
        }
    }
}
