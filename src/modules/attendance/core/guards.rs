// Guard engine: decides whether a live action is permitted right now.
//
// Guards never mutate and never fail for business reasons; a denial is a
// value carrying a user-facing reason. `leave`, `holiday` and `weekend` are
// protected for every action.

use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::shift_policy::ShiftPolicy;
use crate::modules::attendance::core::status::AttendanceStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardResult {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl GuardResult {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

fn protected_status(record: &AttendanceRecord) -> Option<GuardResult> {
    record.status.is_exogenous().then(|| {
        GuardResult::deny(format!(
            "Attendance for {} is marked as {}",
            record.date, record.status
        ))
    })
}

pub fn can_clock_in(
    record: Option<&AttendanceRecord>,
    policy: Option<&ShiftPolicy>,
    date: NaiveDate,
    now: NaiveDateTime,
) -> GuardResult {
    if let Some(record) = record {
        if let Some(denied) = protected_status(record) {
            return denied;
        }
        if record.is_clocked_in() {
            return GuardResult::deny("Already clocked in today");
        }
        // `half_day` is deliberately not part of this check.
        if matches!(
            record.status,
            AttendanceStatus::Absent | AttendanceStatus::Present
        ) {
            return GuardResult::deny(format!(
                "Attendance for {} is already finalized as {}",
                record.date, record.status
            ));
        }
        if record.status == AttendanceStatus::PendingCorrection {
            return GuardResult::deny("Attendance is pending correction");
        }
    }
    if let Some(policy) = policy {
        let shift_end = policy.shift_end_on(date);
        if now > shift_end {
            return GuardResult::deny(format!(
                "Shift ended at {}; clock-in is no longer possible",
                shift_end.format("%Y-%m-%d %H:%M")
            ));
        }
    }
    GuardResult::allow()
}

pub fn can_clock_out(
    record: Option<&AttendanceRecord>,
    policy: Option<&ShiftPolicy>,
    now: NaiveDateTime,
) -> GuardResult {
    let Some(record) = record.filter(|r| r.is_clocked_in()) else {
        return GuardResult::deny("Not clocked in");
    };
    if record.is_clocked_out() {
        return GuardResult::deny("Already clocked out");
    }
    if let Some(denied) = protected_status(record) {
        return denied;
    }
    if record.status == AttendanceStatus::Absent {
        return GuardResult::deny("Attendance is marked as absent");
    }
    // A day under correction review may still be closed out by the employee.
    if record.status == AttendanceStatus::PendingCorrection {
        return GuardResult::allow();
    }
    if let Some(policy) = policy {
        let deadline = policy.clock_out_deadline_on(record.date);
        if now > deadline {
            return GuardResult::deny(format!(
                "Clock-out window closed at {}; submit a correction request",
                deadline.format("%Y-%m-%d %H:%M")
            ));
        }
    }
    GuardResult::allow()
}

pub fn can_start_break(record: Option<&AttendanceRecord>) -> GuardResult {
    let Some(record) = record.filter(|r| r.is_clocked_in()) else {
        return GuardResult::deny("Not clocked in");
    };
    if record.is_clocked_out() {
        return GuardResult::deny("Already clocked out");
    }
    if let Some(denied) = protected_status(record) {
        return denied;
    }
    if record.status == AttendanceStatus::Absent {
        return GuardResult::deny("Attendance is marked as absent");
    }
    if record.has_open_break() {
        return GuardResult::deny("A break is already in progress");
    }
    GuardResult::allow()
}

pub fn can_end_break(record: Option<&AttendanceRecord>) -> GuardResult {
    let Some(record) = record.filter(|r| r.has_open_session()) else {
        return GuardResult::deny("No open session");
    };
    if !record.has_open_break() {
        return GuardResult::deny("No break in progress");
    }
    GuardResult::allow()
}
