use crate::modules::attendance::core::record::BreakSession;
use crate::modules::attendance::core::shift_policy::ShiftPolicy;
use crate::shared::core::primitives::minutes_to_hours;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Session still open; "now" stands in for the clock-out.
    Live,
    /// Session closed by a real clock-out.
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkTime {
    pub mode: SnapshotMode,
    pub work_minutes: i64,
    pub break_minutes: i64,
    /// Breaks still open in a final snapshot. They contribute nothing and
    /// have to be surfaced as a data-quality problem.
    pub unclosed_breaks: usize,
}

impl WorkTime {
    pub fn work_hours(&self) -> f64 {
        minutes_to_hours(self.work_minutes)
    }

    pub fn is_provisional(&self) -> bool {
        self.mode == SnapshotMode::Live
    }
}

/// Running totals for a session that has not been clocked out yet.
pub fn live_snapshot(
    clock_in: NaiveDateTime,
    break_sessions: &[BreakSession],
    now: NaiveDateTime,
) -> WorkTime {
    calculate(clock_in, now.max(clock_in), break_sessions, SnapshotMode::Live)
}

/// Totals for a closed session.
pub fn final_snapshot(
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
    break_sessions: &[BreakSession],
) -> WorkTime {
    calculate(clock_in, clock_out, break_sessions, SnapshotMode::Final)
}

fn calculate(
    clock_in: NaiveDateTime,
    end: NaiveDateTime,
    break_sessions: &[BreakSession],
    mode: SnapshotMode,
) -> WorkTime {
    let mut break_seconds = 0i64;
    let mut unclosed_breaks = 0usize;
    for session in break_sessions {
        match (session.break_out, mode) {
            (Some(break_out), _) => {
                break_seconds += (break_out - session.break_in).num_seconds().max(0);
            }
            (None, SnapshotMode::Live) => {
                break_seconds += (end - session.break_in).num_seconds().max(0);
            }
            (None, SnapshotMode::Final) => unclosed_breaks += 1,
        }
    }
    let gross_seconds = (end - clock_in).num_seconds();
    WorkTime {
        mode,
        work_minutes: (gross_seconds - break_seconds).max(0) / 60,
        break_minutes: break_seconds / 60,
        unclosed_breaks,
    }
}

pub fn overtime_minutes(work_minutes: i64, policy: &ShiftPolicy, full_day_hours: f64) -> i64 {
    if !policy.overtime_enabled {
        return 0;
    }
    let full_day_minutes = (full_day_hours * 60.0).round() as i64;
    (work_minutes - full_day_minutes - policy.overtime_threshold_minutes).max(0)
}
