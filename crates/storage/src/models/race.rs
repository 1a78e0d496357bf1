use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::Discipline;

/// The ordered, partially-filled split set of one race: start, one
/// entry/exit timestamp pair per shooting range, and finish. All values
/// are milliseconds since the Unix epoch. Timestamps are monotonically
/// non-decreasing in collection order once recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SplitTimes {
    pub start_ms: Option<i64>,
    pub lap1_ms: Option<i64>,
    pub shoot1_ms: Option<i64>,
    pub lap2_ms: Option<i64>,
    pub shoot2_ms: Option<i64>,
    pub lap3_ms: Option<i64>,
    pub shoot3_ms: Option<i64>,
    pub lap4_ms: Option<i64>,
    pub shoot4_ms: Option<i64>,
    pub finish_ms: Option<i64>,
}

/// One competitor's scored participation in one event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Race {
    pub race_id: i64,
    pub event_id: i64,
    pub competitor_id: i64,
    /// Symmetric duel pairing: if A's race references B, B's references A.
    pub opponent_id: Option<i64>,
    pub discipline: Discipline,
    /// Relay only: 1 or 2.
    pub team_id: Option<i64>,
    /// Relay only: leg order within the team.
    pub passage_number: Option<i64>,
    #[sqlx(flatten)]
    pub splits: SplitTimes,
    pub shooting1_errors: i64,
    pub shooting2_errors: i64,
    pub shooting3_errors: Option<i64>,
    pub shooting4_errors: Option<i64>,
    /// `finish - start`, except the relay team-victory sentinel.
    pub total_time_ms: Option<i64>,
    pub penalty_count: i64,
    /// Externally asserted rank; set only by relay win/loss assertion.
    pub rank: Option<i64>,
    pub points: Option<i64>,
    /// Pursuit stagger, recorded upstream by the timer.
    pub start_offset_ms: Option<i64>,
}

impl Race {
    /// Per-range error counts in range order. Ranges 1 and 2 always
    /// exist (zero-initialised), 3 and 4 only for individual races.
    pub fn shooting_errors(&self) -> [Option<i64>; 4] {
        [
            Some(self.shooting1_errors),
            Some(self.shooting2_errors),
            self.shooting3_errors,
            self.shooting4_errors,
        ]
    }

    /// A race without a total time is not finished and is excluded from
    /// every ranking, points, and statistics computation.
    pub fn is_finished(&self) -> bool {
        self.total_time_ms.is_some()
    }
}
