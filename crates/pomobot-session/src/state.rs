//! Session phase and elapsed-time derivation.
//!
//! Everything here is pure: elapsed minutes, cycle number, and position
//! within the cycle are recomputed from the fixed start timestamp on
//! every use. Recomputing instead of counting ticks makes the math
//! self-correcting under delayed, repeated, or skipped ticks.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Operating mode of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Stopped,
    Working,
    Resting,
}

impl Phase {
    /// The mute flag every present member should carry in this phase.
    ///
    /// This is the single re-derivation point for mute intent; both the
    /// tick path and the presence-change path go through it.
    pub fn requires_mute(&self) -> bool {
        matches!(self, Phase::Working)
    }
}

/// Read-only snapshot returned by `SessionEngine::status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub phase: Phase,
    pub started_at: Option<DateTime<Utc>>,
    /// Number of work intervals begun since start, 1-based. 0 when
    /// stopped.
    pub cycle_count: u32,
    /// Minutes elapsed since the start of the current cycle.
    pub elapsed_in_cycle: u32,
}

impl Status {
    pub fn stopped() -> Self {
        Self {
            phase: Phase::Stopped,
            started_at: None,
            cycle_count: 0,
            elapsed_in_cycle: 0,
        }
    }
}

/// Mutable session record owned by the engine.
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionState {
    pub phase: Phase,
    pub started_at: Option<DateTime<Utc>>,
    /// Cycle number observed by the most recent tick, used to detect
    /// entry into a new cycle.
    pub last_cycle: u32,
}

/// Drop seconds and sub-seconds so elapsed-minute arithmetic is exact.
pub fn truncate_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Whole minutes between `started_at` and `now`, clamped at zero.
pub fn elapsed_minutes(now: DateTime<Utc>, started_at: DateTime<Utc>) -> u32 {
    (now - started_at).num_minutes().max(0) as u32
}

/// 1-based cycle number for a given total elapsed time.
pub fn cycle_count(elapsed: u32, cycle_minutes: u32) -> u32 {
    elapsed / cycle_minutes + 1
}

/// Minutes into the current cycle for a given total elapsed time.
pub fn elapsed_in_cycle(elapsed: u32, cycle_minutes: u32) -> u32 {
    elapsed % cycle_minutes
}

/// Phase implied by a position within the cycle, used when resuming a
/// persisted session.
pub fn phase_at(in_cycle: u32, work_minutes: u32) -> Phase {
    if in_cycle < work_minutes {
        Phase::Working
    } else {
        Phase::Resting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn requires_mute_only_while_working() {
        assert!(Phase::Working.requires_mute());
        assert!(!Phase::Resting.requires_mute());
        assert!(!Phase::Stopped.requires_mute());
    }

    #[test]
    fn truncate_drops_seconds() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 42).unwrap();
        let truncated = truncate_to_minute(t);
        assert_eq!(truncated.second(), 0);
        assert_eq!(truncated.minute(), 30);
    }

    #[test]
    fn elapsed_is_floored_minutes() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 25, 59).unwrap();
        assert_eq!(elapsed_minutes(now, start), 25);
    }

    #[test]
    fn elapsed_clamps_negative() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 59, 0).unwrap();
        assert_eq!(elapsed_minutes(now, start), 0);
    }

    #[test]
    fn cycle_math_at_the_boundaries() {
        // cycle_minutes = 30: minute 0 is cycle 1, minute 29 is cycle 1,
        // minute 30 is cycle 2.
        assert_eq!(cycle_count(0, 30), 1);
        assert_eq!(cycle_count(29, 30), 1);
        assert_eq!(cycle_count(30, 30), 2);
        assert_eq!(cycle_count(61, 30), 3);

        assert_eq!(elapsed_in_cycle(0, 30), 0);
        assert_eq!(elapsed_in_cycle(25, 30), 25);
        assert_eq!(elapsed_in_cycle(30, 30), 0);
        assert_eq!(elapsed_in_cycle(55, 30), 25);
    }

    #[test]
    fn derivation_is_a_pure_function_of_elapsed() {
        // Skipping intermediate values cannot change the result.
        for elapsed in [0u32, 7, 25, 29, 30, 31, 55, 60, 90, 119] {
            assert_eq!(
                cycle_count(elapsed, 30),
                elapsed / 30 + 1,
                "cycle at {elapsed}"
            );
            assert_eq!(elapsed_in_cycle(elapsed, 30), elapsed % 30);
        }
    }

    #[test]
    fn phase_at_boundary() {
        assert_eq!(phase_at(0, 25), Phase::Working);
        assert_eq!(phase_at(24, 25), Phase::Working);
        assert_eq!(phase_at(25, 25), Phase::Resting);
        assert_eq!(phase_at(29, 25), Phase::Resting);
    }

    #[test]
    fn stopped_status_is_zeroed() {
        let status = Status::stopped();
        assert_eq!(status.phase, Phase::Stopped);
        assert_eq!(status.cycle_count, 0);
        assert_eq!(status.elapsed_in_cycle, 0);
        assert!(status.started_at.is_none());
    }
}
