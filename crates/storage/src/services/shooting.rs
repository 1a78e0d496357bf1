use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, StorageError};
use crate::models::Race;

pub const SHOTS_PER_RANGE: i64 = 5;

/// Converts a hit count for one five-shot bout into an error count.
/// Rejects hit counts outside [0, 5].
pub fn errors_from_hits(hits: i64) -> Result<i64> {
    if !(0..=SHOTS_PER_RANGE).contains(&hits) {
        return Err(StorageError::invalid_input(format!(
            "hits must be between 0 and {SHOTS_PER_RANGE}, got {hits}"
        )));
    }
    Ok(SHOTS_PER_RANGE - hits)
}

/// Penalty count recomputed from the authoritative per-range error
/// fields. Always a full recomputation, never an incremental patch, so
/// re-recording a bout cannot drift the total.
pub fn penalty_count(race: &Race) -> i64 {
    race.shooting_errors().iter().flatten().sum()
}

/// Unrounded hit/shot accumulator for accuracy statistics. Rounding to
/// a display percentage happens only at presentation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShootingTally {
    pub hits: i64,
    pub shots: i64,
}

impl ShootingTally {
    /// Folds in one recorded five-shot bout with the given error count.
    pub fn record_bout(&mut self, errors: i64) {
        self.hits += SHOTS_PER_RANGE - errors;
        self.shots += SHOTS_PER_RANGE;
    }

    pub fn merge(&mut self, other: ShootingTally) {
        self.hits += other.hits;
        self.shots += other.shots;
    }

    /// Accuracy percentage, or `None` before any shot was fired.
    pub fn accuracy(&self) -> Option<f64> {
        if self.shots == 0 {
            None
        } else {
            Some(self.hits as f64 / self.shots as f64 * 100.0)
        }
    }
}
