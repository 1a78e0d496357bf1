use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Competitor, Discipline, Event, Race};
use crate::services::points::PointsTable;
use crate::services::ranking::rank_races;
use crate::services::shooting::ShootingTally;
use crate::services::timing;

/// Scope of a standings query. A location is mandatory context; year
/// and discipline narrow it further. The aggregator is a pure function
/// of these explicit inputs, never of ambient state.
#[derive(Debug, Clone)]
pub struct StandingsFilter {
    pub location: String,
    pub year: Option<i32>,
    pub discipline: Option<Discipline>,
    /// When set, competitors with zero qualifying races are kept in the
    /// result with empty statistics instead of being dropped.
    pub include_full_roster: bool,
}

/// Season-long aggregate for one competitor over the filtered events.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompetitorStanding {
    pub competitor_id: i64,
    pub name: String,
    pub total_points: i64,
    pub wins: i64,
    pub podiums: i64,
    pub races_count: i64,
    pub best_rank: Option<i64>,
    pub best_time_ms: Option<i64>,
    pub best_ski_time_ms: Option<i64>,
    pub shooting: ShootingTally,
    pub per_range: [ShootingTally; 4],
}

impl CompetitorStanding {
    fn empty(competitor: &Competitor) -> Self {
        Self {
            competitor_id: competitor.competitor_id,
            name: competitor.name.clone(),
            total_points: 0,
            wins: 0,
            podiums: 0,
            races_count: 0,
            best_rank: None,
            best_time_ms: None,
            best_ski_time_ms: None,
            shooting: ShootingTally::default(),
            per_range: [ShootingTally::default(); 4],
        }
    }
}

fn qualifies(event: &Event, filter: &StandingsFilter) -> bool {
    event.location == filter.location
        && filter.year.is_none_or(|year| event.date.year() == year)
        && filter.discipline.is_none_or(|d| event.discipline == d)
}

fn min_opt(current: Option<i64>, candidate: i64) -> Option<i64> {
    Some(match current {
        Some(value) => value.min(candidate),
        None => candidate,
    })
}

/// Folds per-event ranks and points into per-competitor season
/// standings over the events matching `filter`.
///
/// Rankings are recomputed from the race records on every call; nothing
/// is cached. Relay races contribute points, wins, podiums and race
/// counts, but are excluded from best-time, best-ski-time and shooting
/// statistics since their total time may be an asserted sentinel rather
/// than a measured duration.
///
/// Ordered by total points descending, then name ascending, so equal
/// scores keep a stable, reproducible order.
pub fn standings(
    competitors: &[Competitor],
    events: &[Event],
    races: &[Race],
    filter: &StandingsFilter,
    table: &PointsTable,
) -> Vec<CompetitorStanding> {
    let mut rows: HashMap<i64, CompetitorStanding> = competitors
        .iter()
        .map(|c| (c.competitor_id, CompetitorStanding::empty(c)))
        .collect();

    for event in events.iter().filter(|e| qualifies(e, filter)) {
        let event_races: Vec<Race> = races
            .iter()
            .filter(|r| r.event_id == event.event_id)
            .cloned()
            .collect();

        for entry in rank_races(event.discipline, &event_races) {
            let Some(row) = rows.get_mut(&entry.competitor_id) else {
                continue;
            };
            row.total_points += table.points(event.level, entry.rank);
            row.races_count += 1;
            if entry.rank == 1 {
                row.wins += 1;
            }
            if entry.rank <= 3 {
                row.podiums += 1;
            }
            row.best_rank = min_opt(row.best_rank, entry.rank);
        }

        if event.discipline == Discipline::Relay {
            continue;
        }

        for race in event_races.iter().filter(|r| r.is_finished()) {
            let Some(row) = rows.get_mut(&race.competitor_id) else {
                continue;
            };
            if let Some(total) = race.total_time_ms {
                row.best_time_ms = min_opt(row.best_time_ms, total);
            }
            if let Some(ski) = timing::ski_time(&race.splits, event.discipline) {
                row.best_ski_time_ms = min_opt(row.best_ski_time_ms, ski);
            }
            let range_count = event.discipline.range_count();
            for (idx, errors) in race.shooting_errors().iter().enumerate().take(range_count) {
                if let Some(errors) = errors {
                    row.shooting.record_bout(*errors);
                    row.per_range[idx].record_bout(*errors);
                }
            }
        }
    }

    let mut result: Vec<CompetitorStanding> = rows
        .into_values()
        .filter(|row| filter.include_full_roster || row.races_count > 0)
        .collect();

    result.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.name.cmp(&b.name))
    });
    result
}

/// Distinct event years in scope, newest first (for year filter tabs).
pub fn available_years(events: &[Event], location: &str) -> Vec<i32> {
    let mut years: Vec<i32> = events
        .iter()
        .filter(|e| e.location == location)
        .map(|e| e.date.year())
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
