use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Advisory event lifecycle status; the scoring engine does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Finished,
}

/// Race discipline. Immutable once races exist for the event, since
/// ranking and grouping rules depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Discipline {
    Sprint,
    Pursuit,
    Relay,
    Individual,
}

impl Discipline {
    /// Number of shooting ranges a race in this discipline visits.
    pub fn range_count(self) -> usize {
        match self {
            Discipline::Individual => 4,
            _ => 2,
        }
    }

    /// Mass-start disciplines list every competitor individually;
    /// the others run as 1v1 duels.
    pub fn is_mass_start(self) -> bool {
        matches!(self, Discipline::Pursuit | Discipline::Relay)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Discipline::Sprint => "sprint",
            Discipline::Pursuit => "pursuit",
            Discipline::Relay => "relay",
            Discipline::Individual => "individual",
        }
    }
}

/// One competition instance at a location, on a date, with a difficulty
/// level that drives the points payout.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub event_id: i64,
    pub name: String,
    pub date: chrono::NaiveDate,
    pub level: i64,
    pub status: EventStatus,
    pub discipline: Discipline,
    pub location: String,
    pub start_time_ms: Option<i64>,
}
