use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Result, StorageError};
use crate::models::{Discipline, SplitTimes};

/// A race-progress checkpoint. `Lap` marks a shooting-range entry,
/// `Shoot` the corresponding exit, matching the stopwatch buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SplitPhase {
    Start,
    Lap1,
    Shoot1,
    Lap2,
    Shoot2,
    Lap3,
    Shoot3,
    Lap4,
    Shoot4,
    Finish,
}

/// Collection order of all phases for a four-range race.
const ALL_PHASES: [SplitPhase; 10] = [
    SplitPhase::Start,
    SplitPhase::Lap1,
    SplitPhase::Shoot1,
    SplitPhase::Lap2,
    SplitPhase::Shoot2,
    SplitPhase::Lap3,
    SplitPhase::Shoot3,
    SplitPhase::Lap4,
    SplitPhase::Shoot4,
    SplitPhase::Finish,
];

/// Phases a race in this discipline passes through, in collection order.
pub fn phases_for(discipline: Discipline) -> &'static [SplitPhase] {
    match discipline.range_count() {
        4 => &ALL_PHASES,
        _ => &[
            SplitPhase::Start,
            SplitPhase::Lap1,
            SplitPhase::Shoot1,
            SplitPhase::Lap2,
            SplitPhase::Shoot2,
            SplitPhase::Finish,
        ],
    }
}

pub fn slot(splits: &SplitTimes, phase: SplitPhase) -> Option<i64> {
    match phase {
        SplitPhase::Start => splits.start_ms,
        SplitPhase::Lap1 => splits.lap1_ms,
        SplitPhase::Shoot1 => splits.shoot1_ms,
        SplitPhase::Lap2 => splits.lap2_ms,
        SplitPhase::Shoot2 => splits.shoot2_ms,
        SplitPhase::Lap3 => splits.lap3_ms,
        SplitPhase::Shoot3 => splits.shoot3_ms,
        SplitPhase::Lap4 => splits.lap4_ms,
        SplitPhase::Shoot4 => splits.shoot4_ms,
        SplitPhase::Finish => splits.finish_ms,
    }
}

fn slot_mut(splits: &mut SplitTimes, phase: SplitPhase) -> &mut Option<i64> {
    match phase {
        SplitPhase::Start => &mut splits.start_ms,
        SplitPhase::Lap1 => &mut splits.lap1_ms,
        SplitPhase::Shoot1 => &mut splits.shoot1_ms,
        SplitPhase::Lap2 => &mut splits.lap2_ms,
        SplitPhase::Shoot2 => &mut splits.shoot2_ms,
        SplitPhase::Lap3 => &mut splits.lap3_ms,
        SplitPhase::Shoot3 => &mut splits.shoot3_ms,
        SplitPhase::Lap4 => &mut splits.lap4_ms,
        SplitPhase::Shoot4 => &mut splits.shoot4_ms,
        SplitPhase::Finish => &mut splits.finish_ms,
    }
}

/// Records one split. Rejects a phase outside the discipline's course,
/// a phase whose predecessors have not been recorded yet, and any
/// timestamp that would break monotonicity against a recorded
/// neighbour on either side. Timestamps are never silently clamped.
pub fn record_split(
    splits: &mut SplitTimes,
    discipline: Discipline,
    phase: SplitPhase,
    timestamp_ms: i64,
) -> Result<()> {
    if timestamp_ms < 0 {
        return Err(StorageError::invalid_input("timestamp must not be negative"));
    }

    let phases = phases_for(discipline);
    let position = phases
        .iter()
        .position(|&p| p == phase)
        .ok_or_else(|| {
            StorageError::invalid_input(format!(
                "phase {phase:?} is not part of a {} race",
                discipline.as_str()
            ))
        })?;

    for &earlier in &phases[..position] {
        match slot(splits, earlier) {
            Some(recorded) if recorded <= timestamp_ms => {}
            Some(_) => {
                return Err(StorageError::invalid_input(
                    "split timestamp is earlier than an already recorded split",
                ));
            }
            None => {
                return Err(StorageError::invalid_input(format!(
                    "cannot record {phase:?} before {earlier:?}"
                )));
            }
        }
    }

    // A correction to an intermediate phase must still fit under any
    // already recorded successor.
    for &later in &phases[position + 1..] {
        if let Some(recorded) = slot(splits, later) {
            if timestamp_ms > recorded {
                return Err(StorageError::invalid_input(
                    "split timestamp is later than an already recorded split",
                ));
            }
        }
    }

    *slot_mut(splits, phase) = Some(timestamp_ms);
    Ok(())
}

/// `finish - start`, or `None` while either endpoint is missing.
pub fn total_time(splits: &SplitTimes) -> Option<i64> {
    match (splits.start_ms, splits.finish_ms) {
        (Some(start), Some(finish)) => Some(finish - start),
        _ => None,
    }
}

const RANGE_PAIRS: [(SplitPhase, SplitPhase); 4] = [
    (SplitPhase::Lap1, SplitPhase::Shoot1),
    (SplitPhase::Lap2, SplitPhase::Shoot2),
    (SplitPhase::Lap3, SplitPhase::Shoot3),
    (SplitPhase::Lap4, SplitPhase::Shoot4),
];

/// Total time spent inside shooting ranges: the sum of exit - entry
/// over every range with both endpoints recorded. `None` until at
/// least one complete range exists.
pub fn shooting_time(splits: &SplitTimes) -> Option<i64> {
    let mut sum = None;
    for (entry, exit) in RANGE_PAIRS {
        if let (Some(e), Some(x)) = (slot(splits, entry), slot(splits, exit)) {
            sum = Some(sum.unwrap_or(0) + (x - e));
        }
    }
    sum
}

/// Pure skiing time: total time minus time inside the discipline's
/// shooting ranges. `None` if the total or any required range endpoint
/// is missing.
pub fn ski_time(splits: &SplitTimes, discipline: Discipline) -> Option<i64> {
    let total = total_time(splits)?;
    let mut in_range = 0;
    for (entry, exit) in &RANGE_PAIRS[..discipline.range_count()] {
        let e = slot(splits, *entry)?;
        let x = slot(splits, *exit)?;
        in_range += x - e;
    }
    Some(total - in_range)
}

/// Formats a duration as `MM:SS.t`, truncating (never rounding) to
/// whole deciseconds.
pub fn format_duration(ms: i64) -> String {
    if ms < 0 {
        return "00:00.0".to_string();
    }
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let tenths = (ms % 1000) / 100;
    format!("{minutes:02}:{seconds:02}.{tenths}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_sprint_splits() -> SplitTimes {
        SplitTimes {
            start_ms: Some(1_000),
            lap1_ms: Some(21_000),
            shoot1_ms: Some(46_000),
            lap2_ms: Some(66_000),
            shoot2_ms: Some(96_000),
            finish_ms: Some(121_000),
            ..SplitTimes::default()
        }
    }

    #[test]
    fn records_phases_in_order() {
        let mut splits = SplitTimes::default();
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Start, 100).unwrap();
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Lap1, 200).unwrap();
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Shoot1, 300).unwrap();
        assert_eq!(splits.shoot1_ms, Some(300));
    }

    #[test]
    fn rejects_split_before_latest_recorded() {
        let mut splits = SplitTimes::default();
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Start, 500).unwrap();
        let err = record_split(&mut splits, Discipline::Sprint, SplitPhase::Lap1, 400);
        assert!(matches!(err, Err(StorageError::InvalidInput(_))));
        assert_eq!(splits.lap1_ms, None);
    }

    #[test]
    fn rejects_rerecorded_split_later_than_a_successor() {
        let mut splits = SplitTimes::default();
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Start, 0).unwrap();
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Lap1, 10_000).unwrap();
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Shoot1, 20_000).unwrap();

        let err = record_split(&mut splits, Discipline::Sprint, SplitPhase::Lap1, 30_000);
        assert!(matches!(err, Err(StorageError::InvalidInput(_))));
        assert_eq!(splits.lap1_ms, Some(10_000));

        // A correction that stays within its neighbours is accepted and
        // keeps derived durations non-negative.
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Lap1, 12_000).unwrap();
        assert_eq!(shooting_time(&splits), Some(8_000));
    }

    #[test]
    fn rejects_split_with_missing_predecessor() {
        let mut splits = SplitTimes::default();
        record_split(&mut splits, Discipline::Sprint, SplitPhase::Start, 100).unwrap();
        let err = record_split(&mut splits, Discipline::Sprint, SplitPhase::Shoot1, 900);
        assert!(matches!(err, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn rejects_phase_outside_discipline_course() {
        let mut splits = full_sprint_splits();
        let err = record_split(&mut splits, Discipline::Sprint, SplitPhase::Lap3, 200_000);
        assert!(matches!(err, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn individual_course_has_four_ranges() {
        assert_eq!(phases_for(Discipline::Individual).len(), 10);
        assert_eq!(phases_for(Discipline::Sprint).len(), 6);
    }

    #[test]
    fn total_time_needs_both_endpoints() {
        let mut splits = SplitTimes::default();
        assert_eq!(total_time(&splits), None);
        splits.start_ms = Some(1_000);
        assert_eq!(total_time(&splits), None);
        splits.finish_ms = Some(61_000);
        assert_eq!(total_time(&splits), Some(60_000));
    }

    #[test]
    fn ski_plus_shooting_equals_total() {
        let splits = full_sprint_splits();
        let total = total_time(&splits).unwrap();
        let ski = ski_time(&splits, Discipline::Sprint).unwrap();
        let shooting = shooting_time(&splits).unwrap();
        assert_eq!(ski + shooting, total);
        assert_eq!(shooting, 25_000 + 30_000);
    }

    #[test]
    fn ski_time_undefined_without_all_range_endpoints() {
        let mut splits = full_sprint_splits();
        splits.shoot2_ms = None;
        assert_eq!(ski_time(&splits, Discipline::Sprint), None);
        // One complete range is still enough for a partial shooting time.
        assert_eq!(shooting_time(&splits), Some(25_000));
    }

    #[test]
    fn format_truncates_to_deciseconds() {
        assert_eq!(format_duration(61_099), "01:01.0");
        assert_eq!(format_duration(61_999), "01:01.9");
        assert_eq!(format_duration(0), "00:00.0");
        assert_eq!(format_duration(-5), "00:00.0");
        assert_eq!(format_duration(600_000), "10:00.0");
    }
}
