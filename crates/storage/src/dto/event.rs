use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dto::race::RaceResponse;
use crate::models::{Discipline, Event, EventStatus};
use crate::services::pairing::DuelPair;

/// Request payload for creating an event together with its race set.
///
/// Sprint/individual events take `competitor_ids` plus an optional
/// confirmed `pairing` from the preview endpoint (omitted, the server
/// shuffles a fresh one). Pursuit takes `competitor_ids` in start
/// order. Relay takes the two ordered team rosters instead.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    pub date: Option<NaiveDate>,

    #[validate(range(min = 0, max = 12, message = "Level must be between 0 and 12"))]
    pub level: i64,

    pub discipline: Discipline,

    #[validate(length(min = 1, max = 255, message = "Location is required"))]
    pub location: String,

    #[serde(default)]
    pub competitor_ids: Vec<i64>,

    pub pairing: Option<Vec<DuelPair>>,

    pub team1: Option<Vec<i64>>,
    pub team2: Option<Vec<i64>>,
}

/// Query parameters for the event list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct EventListQuery {
    pub location: String,
    pub discipline: Option<Discipline>,
}

/// Request payload for editing event details
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    pub date: Option<NaiveDate>,

    #[validate(range(min = 0, max = 12))]
    pub level: Option<i64>,

    pub status: Option<EventStatus>,
}

/// Request payload for a fresh pairing preview (not persisted)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PairingPreviewRequest {
    pub discipline: Discipline,

    #[validate(length(min = 1, message = "Select at least one competitor"))]
    pub competitor_ids: Vec<i64>,
}

/// Request payload asserting the relay result for an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RelayResultRequest {
    #[validate(range(min = 1, max = 2, message = "Team must be 1 or 2"))]
    pub winning_team: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub event_id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub level: i64,
    pub status: EventStatus,
    pub discipline: Discipline,
    pub location: String,
    pub start_time_ms: Option<i64>,
}

/// One leaderboard line: engine rank and points joined with the
/// competitor's display data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub race_id: i64,
    pub competitor_id: i64,
    pub competitor_name: String,
    pub total_time_ms: Option<i64>,
    pub display_time: Option<String>,
    pub penalty_count: i64,
    pub points: i64,
}

/// Event with its race set and the recomputed leaderboard
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDetailResponse {
    pub event: EventResponse,
    pub races: Vec<RaceResponse>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.event_id,
            name: event.name,
            date: event.date,
            level: event.level,
            status: event.status,
            discipline: event.discipline,
            location: event.location,
            start_time_ms: event.start_time_ms,
        }
    }
}
