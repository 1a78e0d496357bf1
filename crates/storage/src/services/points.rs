use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Level-indexed payout table: each level maps to an ordered scale of
/// point values, index 0 being first place. The table is configuration,
/// not hardcoded policy; deserialize one to override the defaults.
///
/// Relay levels 10, 11 and 12 live in the same namespace as the general
/// 0-5 tiers, as ordinary two-entry scales (winner, loser).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsTable {
    scales: BTreeMap<i64, Vec<i64>>,
}

impl Default for PointsTable {
    fn default() -> Self {
        let scales = BTreeMap::from([
            (0, vec![5, 3, 1]),
            (1, vec![10, 6, 4, 2, 1]),
            (2, vec![20, 12, 8, 4, 2]),
            (3, vec![50, 30, 20, 10, 5]),
            (4, vec![100, 60, 40, 20, 10, 8, 6, 4]),
            (5, vec![200, 120, 80, 40, 20, 16, 12, 8, 6, 4]),
            (10, vec![10, 4]),
            (11, vec![5, 2]),
            (12, vec![3, 1]),
        ]);
        Self { scales }
    }
}

impl PointsTable {
    pub fn new(scales: BTreeMap<i64, Vec<i64>>) -> Self {
        Self { scales }
    }

    pub fn scale(&self, level: i64) -> Option<&[i64]> {
        self.scales.get(&level).map(Vec::as_slice)
    }

    /// Points awarded for a 1-based rank at the given level. A rank
    /// beyond the scale, or an unknown level, earns zero points; the
    /// race still counts toward races-played and podium/win tallies.
    pub fn points(&self, level: i64, rank: i64) -> i64 {
        if rank < 1 {
            return 0;
        }
        self.scales
            .get(&level)
            .and_then(|scale| scale.get(rank as usize - 1))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_podium_payout() {
        let table = PointsTable::default();
        assert_eq!(table.points(1, 1), 10);
        assert_eq!(table.points(1, 2), 6);
        assert_eq!(table.points(1, 3), 4);
    }

    #[test]
    fn rank_beyond_scale_earns_zero() {
        let table = PointsTable::default();
        assert_eq!(table.points(0, 4), 0);
        assert_eq!(table.points(5, 11), 0);
        assert_eq!(table.points(99, 1), 0);
        assert_eq!(table.points(1, 0), 0);
    }

    #[test]
    fn payout_is_non_increasing_in_rank() {
        let table = PointsTable::default();
        for level in [0, 1, 2, 3, 4, 5, 10, 11, 12] {
            let scale_len = table.scale(level).unwrap().len() as i64;
            for rank in 1..=scale_len {
                assert!(
                    table.points(level, rank) >= table.points(level, rank + 1),
                    "level {level} rank {rank}"
                );
            }
        }
    }

    #[test]
    fn relay_levels_pay_winner_and_loser() {
        let table = PointsTable::default();
        assert_eq!((table.points(10, 1), table.points(10, 2)), (10, 4));
        assert_eq!((table.points(11, 1), table.points(11, 2)), (5, 2));
        assert_eq!((table.points(12, 1), table.points(12, 2)), (3, 1));
    }

    #[test]
    fn table_is_overridable() {
        let table = PointsTable::new(BTreeMap::from([(1, vec![3, 2, 1])]));
        assert_eq!(table.points(1, 1), 3);
        assert_eq!(table.points(2, 1), 0);
    }
}
