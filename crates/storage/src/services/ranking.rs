use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Discipline, Race};

/// One entry of an event's computed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RankedRace {
    pub race_id: i64,
    pub competitor_id: i64,
    pub rank: i64,
}

/// Ranks all races of one event.
///
/// Time-scored disciplines (sprint, pursuit, individual) keep only
/// finished races, ordered by ascending total time; ranks are dense
/// 1-based positions. Equal times keep the insertion order of the
/// input slice. Unfinished races are absent from the output, never
/// treated as last place.
///
/// Relay is scored at team granularity: ranks are the externally
/// asserted per-race values (1 for every winner-team race, 2 for every
/// loser-team race), never derived from time comparison.
pub fn rank_races(discipline: Discipline, races: &[Race]) -> Vec<RankedRace> {
    if discipline == Discipline::Relay {
        return races
            .iter()
            .filter_map(|race| {
                race.rank.map(|rank| RankedRace {
                    race_id: race.race_id,
                    competitor_id: race.competitor_id,
                    rank,
                })
            })
            .collect();
    }

    let mut finished: Vec<&Race> = races.iter().filter(|r| r.is_finished()).collect();
    // Stable sort; ties stay in insertion order.
    finished.sort_by_key(|r| r.total_time_ms);

    finished
        .iter()
        .enumerate()
        .map(|(idx, race)| RankedRace {
            race_id: race.race_id,
            competitor_id: race.competitor_id,
            rank: idx as i64 + 1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SplitTimes;

    fn race(race_id: i64, competitor_id: i64, total_time_ms: Option<i64>) -> Race {
        Race {
            race_id,
            event_id: 1,
            competitor_id,
            opponent_id: None,
            discipline: Discipline::Sprint,
            team_id: None,
            passage_number: None,
            splits: SplitTimes::default(),
            shooting1_errors: 0,
            shooting2_errors: 0,
            shooting3_errors: None,
            shooting4_errors: None,
            total_time_ms,
            penalty_count: 0,
            rank: None,
            points: None,
            start_offset_ms: None,
        }
    }

    #[test]
    fn ranks_are_dense_and_time_ordered() {
        let races = vec![
            race(1, 10, Some(65_000)),
            race(2, 11, Some(61_000)),
            race(3, 12, Some(70_000)),
        ];
        let ranked = rank_races(Discipline::Sprint, &races);
        assert_eq!(
            ranked.iter().map(|r| (r.competitor_id, r.rank)).collect::<Vec<_>>(),
            vec![(11, 1), (10, 2), (12, 3)]
        );
    }

    #[test]
    fn unfinished_races_get_no_rank() {
        let races = vec![
            race(1, 10, Some(65_000)),
            race(2, 11, None),
            race(3, 12, Some(70_000)),
        ];
        let ranked = rank_races(Discipline::Sprint, &races);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.competitor_id != 11));
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn equal_times_keep_insertion_order() {
        let races = vec![
            race(7, 10, Some(60_000)),
            race(8, 11, Some(60_000)),
            race(9, 12, Some(59_000)),
        ];
        let ranked = rank_races(Discipline::Pursuit, &races);
        assert_eq!(
            ranked.iter().map(|r| (r.race_id, r.rank)).collect::<Vec<_>>(),
            vec![(9, 1), (7, 2), (8, 3)]
        );
    }

    #[test]
    fn relay_uses_asserted_ranks_only() {
        let mut winner_leg = race(1, 10, Some(1));
        winner_leg.discipline = Discipline::Relay;
        winner_leg.team_id = Some(1);
        winner_leg.rank = Some(1);

        let mut loser_leg = race(2, 11, Some(1));
        loser_leg.discipline = Discipline::Relay;
        loser_leg.team_id = Some(2);
        loser_leg.rank = Some(2);

        let mut unasserted = race(3, 12, Some(55_000));
        unasserted.discipline = Discipline::Relay;
        unasserted.team_id = Some(2);

        let ranked = rank_races(Discipline::Relay, &[winner_leg, loser_leg, unasserted]);
        assert_eq!(
            ranked.iter().map(|r| (r.competitor_id, r.rank)).collect::<Vec<_>>(),
            vec![(10, 1), (11, 2)]
        );
    }
}
