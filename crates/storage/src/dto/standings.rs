use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Discipline;
use crate::services::standings::{CompetitorStanding, StandingsFilter};

/// Query parameters for the standings table. Location scope is
/// mandatory; year and discipline are optional narrowings.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct StandingsQuery {
    pub location: String,
    pub year: Option<i32>,
    pub discipline: Option<Discipline>,
    pub full_roster: Option<bool>,
}

impl From<StandingsQuery> for StandingsFilter {
    fn from(query: StandingsQuery) -> Self {
        Self {
            location: query.location,
            year: query.year,
            discipline: query.discipline,
            include_full_roster: query.full_roster.unwrap_or(false),
        }
    }
}

/// Standings table for one filter scope
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StandingsResponse {
    pub location: String,
    pub year: Option<i32>,
    pub discipline: Option<Discipline>,
    pub available_years: Vec<i32>,
    pub entries: Vec<CompetitorStanding>,
}
