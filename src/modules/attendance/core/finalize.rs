// Finalization engine: turns a closed session into a FINAL verdict using the
// shift's thresholds, or the pinned fallback thresholds when the shift has
// none. A day with both a clock-in and a clock-out is never `absent`.

use crate::modules::attendance::core::record::{AttendanceRecord, BreakSession};
use crate::modules::attendance::core::shift_policy::{
    FallbackThresholds, ShiftPolicy, ThresholdSource, Thresholds,
};
use crate::modules::attendance::core::status::{AttendanceStatus, HalfDayType};
use crate::modules::attendance::core::work_time::{WorkTime, final_snapshot, overtime_minutes};
use crate::shared::core::primitives::{minutes_between, minutes_to_hours};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct FinalVerdict {
    pub status: AttendanceStatus,
    pub half_day_type: HalfDayType,
    pub status_reason: String,
    pub work: WorkTime,
    pub overtime_minutes: i64,
    pub threshold_source: ThresholdSource,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FinalizeError {
    #[error("clock_in: cannot finalize a day without a clock-in")]
    MissingClockIn,

    #[error("clock_out: cannot finalize an open session")]
    MissingClockOut,
}

pub fn finalize_with_shift(
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
    break_sessions: &[BreakSession],
    policy: Option<&ShiftPolicy>,
    fallback: &FallbackThresholds,
) -> FinalVerdict {
    let work = final_snapshot(clock_in, clock_out, break_sessions);
    let thresholds = Thresholds::resolve(policy, fallback);
    let hours = work.work_hours();

    let (status, half_day_type, mut status_reason) = if hours >= thresholds.full_day_hours {
        (
            AttendanceStatus::Present,
            HalfDayType::FullDay,
            format!(
                "Worked {hours:.2}h, meets full-day threshold of {:.2}h",
                thresholds.full_day_hours
            ),
        )
    } else if hours >= thresholds.half_day_hours {
        (
            AttendanceStatus::HalfDay,
            half_of_day(clock_in),
            format!(
                "Worked {hours:.2}h, at least half-day threshold of {:.2}h but below full-day threshold of {:.2}h",
                thresholds.half_day_hours, thresholds.full_day_hours
            ),
        )
    } else {
        (
            AttendanceStatus::HalfDay,
            HalfDayType::FirstHalf,
            format!(
                "Worked {hours:.2}h, below half-day threshold of {:.2}h; recorded as minimum half day",
                thresholds.half_day_hours
            ),
        )
    };

    match thresholds.source {
        ThresholdSource::Shift => status_reason.push_str(" (shift thresholds)"),
        ThresholdSource::Fallback => {
            status_reason.push_str(" (fallback thresholds: shift has none configured)")
        }
    }
    if work.unclosed_breaks > 0 {
        status_reason.push_str(&format!(
            "; {} break(s) left open at clock-out were not counted",
            work.unclosed_breaks
        ));
    }
    if let Some(limit) = policy
        .and_then(|p| p.max_break_minutes)
        .filter(|limit| work.break_minutes > *limit)
    {
        status_reason.push_str(&format!(
            "; breaks of {} min exceed the {} min limit",
            work.break_minutes, limit
        ));
    }

    let overtime = policy
        .map(|p| overtime_minutes(work.work_minutes, p, thresholds.full_day_hours))
        .unwrap_or(0);

    FinalVerdict {
        status,
        half_day_type,
        status_reason,
        work,
        overtime_minutes: overtime,
        threshold_source: thresholds.source,
    }
}

/// Finalizes a closed record in place and returns the verdict applied.
pub fn finalize_record(
    record: &mut AttendanceRecord,
    policy: Option<&ShiftPolicy>,
    fallback: &FallbackThresholds,
) -> Result<FinalVerdict, FinalizeError> {
    let clock_in = record.clock_in.ok_or(FinalizeError::MissingClockIn)?;
    let clock_out = record.clock_out.ok_or(FinalizeError::MissingClockOut)?;
    let verdict = finalize_with_shift(
        clock_in,
        clock_out,
        &record.break_sessions,
        policy,
        fallback,
    );

    apply_work_time(record, &verdict.work);
    record.overtime_minutes = verdict.overtime_minutes;
    record.overtime_hours = minutes_to_hours(verdict.overtime_minutes);
    if let Some(policy) = policy {
        record.shift_id = Some(policy.shift_id.clone());
        apply_lateness(record, policy);
        apply_early_departure(record, policy);
    }
    record.status = verdict.status;
    record.half_day_type = Some(verdict.half_day_type);
    record.status_reason = Some(verdict.status_reason.clone());
    Ok(verdict)
}

pub fn apply_work_time(record: &mut AttendanceRecord, work: &WorkTime) {
    record.total_worked_minutes = work.work_minutes;
    record.total_break_minutes = work.break_minutes;
    record.work_hours = work.work_hours();
}

pub fn half_of_day(clock_in: NaiveDateTime) -> HalfDayType {
    if clock_in.hour() < 12 {
        HalfDayType::FirstHalf
    } else {
        HalfDayType::SecondHalf
    }
}

pub fn late_minutes(clock_in: NaiveDateTime, policy: &ShiftPolicy, date: NaiveDate) -> i64 {
    minutes_between(policy.shift_start_on(date), clock_in).max(0)
}

pub fn early_exit_minutes(clock_out: NaiveDateTime, policy: &ShiftPolicy, date: NaiveDate) -> i64 {
    minutes_between(clock_out, policy.shift_end_on(date)).max(0)
}

pub fn apply_lateness(record: &mut AttendanceRecord, policy: &ShiftPolicy) {
    match record.clock_in {
        Some(clock_in) => {
            record.late_minutes = late_minutes(clock_in, policy, record.date);
            record.is_late = record.late_minutes > policy.late_threshold();
        }
        None => {
            record.late_minutes = 0;
            record.is_late = false;
        }
    }
}

pub fn apply_early_departure(record: &mut AttendanceRecord, policy: &ShiftPolicy) {
    match record.clock_out {
        Some(clock_out) => {
            record.early_exit_minutes = early_exit_minutes(clock_out, policy, record.date);
            record.is_early_departure =
                record.early_exit_minutes > policy.early_departure_threshold();
        }
        None => {
            record.early_exit_minutes = 0;
            record.is_early_departure = false;
        }
    }
}
