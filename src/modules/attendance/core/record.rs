use crate::modules::attendance::core::status::{
    AttendanceStatus, CorrectionStatus, HalfDayType, WorkMode,
};
use crate::shared::core::primitives::EmployeeId;
use async_graphql::SimpleObject;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct BreakSession {
    pub break_in: NaiveDateTime,
    pub break_out: Option<NaiveDateTime>,
}

impl BreakSession {
    pub fn is_open(&self) -> bool {
        self.break_out.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct RemarkEntry {
    pub at: NaiveDateTime,
    pub by: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct AttendanceRecord {
    pub id: String,
    /// Storage version; bumped by the repository on every write.
    pub version: i64,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub shift_id: Option<String>,

    pub clock_in: Option<NaiveDateTime>,
    pub clock_out: Option<NaiveDateTime>,
    pub break_sessions: Vec<BreakSession>,
    pub total_break_minutes: i64,
    pub total_worked_minutes: i64,
    pub work_hours: f64,

    pub is_late: bool,
    pub late_minutes: i64,
    pub is_early_departure: bool,
    pub early_exit_minutes: i64,

    pub overtime_minutes: i64,
    pub overtime_hours: f64,

    pub status: AttendanceStatus,
    pub status_reason: Option<String>,
    pub half_day_type: Option<HalfDayType>,

    pub work_mode: WorkMode,
    pub location: Option<String>,
    pub device_info: Option<String>,

    pub correction_requested: bool,
    pub correction_reason: Option<String>,
    pub correction_status: Option<CorrectionStatus>,
    pub corrected_by: Option<String>,
    pub corrected_at: Option<NaiveDateTime>,
    pub flagged_reason: Option<String>,
    pub flagged_by: Option<String>,
    pub flagged_at: Option<NaiveDateTime>,

    pub created_by: String,
    pub updated_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub remarks: Option<String>,
    pub remarks_history: Vec<RemarkEntry>,
}

/// Hard invariants of a single record. Each variant names the field that
/// conflicts so callers can report it as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("status: a record with a clock-in cannot be absent")]
    AbsentWithClockIn,

    #[error("clock_out: clock-out requires a clock-in")]
    ClockOutWithoutClockIn,

    #[error("clock_out: clock-out is before clock-in")]
    ClockOutBeforeClockIn,

    #[error("break_sessions[{index}]: break ends before it starts")]
    BreakEndsBeforeStart { index: usize },

    #[error("break_sessions[{index}]: break lies outside the clocked session")]
    BreakOutsideSession { index: usize },

    #[error("break_sessions[{index}]: break overlaps the previous break")]
    OverlappingBreaks { index: usize },

    #[error("break_sessions[{index}]: only the last break may be open")]
    MultipleOpenBreaks { index: usize },
}

impl InvariantViolation {
    pub fn field(&self) -> &'static str {
        match self {
            Self::AbsentWithClockIn => "status",
            Self::ClockOutWithoutClockIn | Self::ClockOutBeforeClockIn => "clock_out",
            Self::BreakEndsBeforeStart { .. }
            | Self::BreakOutsideSession { .. }
            | Self::OverlappingBreaks { .. }
            | Self::MultipleOpenBreaks { .. } => "break_sessions",
        }
    }
}

impl AttendanceRecord {
    /// Blank record for (employee, date). Callers set the status that fits
    /// how the record came to exist.
    pub fn new(
        employee_id: impl Into<EmployeeId>,
        date: NaiveDate,
        status: AttendanceStatus,
        created_by: impl Into<String>,
        now: NaiveDateTime,
    ) -> Self {
        let created_by = created_by.into();
        Self {
            id: Uuid::now_v7().to_string(),
            version: 0,
            employee_id: employee_id.into(),
            date,
            shift_id: None,
            clock_in: None,
            clock_out: None,
            break_sessions: Vec::new(),
            total_break_minutes: 0,
            total_worked_minutes: 0,
            work_hours: 0.0,
            is_late: false,
            late_minutes: 0,
            is_early_departure: false,
            early_exit_minutes: 0,
            overtime_minutes: 0,
            overtime_hours: 0.0,
            status,
            status_reason: None,
            half_day_type: None,
            work_mode: WorkMode::default(),
            location: None,
            device_info: None,
            correction_requested: false,
            correction_reason: None,
            correction_status: None,
            corrected_by: None,
            corrected_at: None,
            flagged_reason: None,
            flagged_by: None,
            flagged_at: None,
            created_by: created_by.clone(),
            updated_by: created_by,
            created_at: now,
            updated_at: now,
            remarks: None,
            remarks_history: Vec::new(),
        }
    }

    pub fn key(&self) -> (EmployeeId, NaiveDate) {
        (self.employee_id.clone(), self.date)
    }

    pub fn aggregate_id(&self) -> String {
        format!("{}:{}", self.employee_id, self.date)
    }

    pub fn is_clocked_in(&self) -> bool {
        self.clock_in.is_some()
    }

    pub fn is_clocked_out(&self) -> bool {
        self.clock_out.is_some()
    }

    /// Clocked in and not yet clocked out.
    pub fn has_open_session(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }

    pub fn open_break(&self) -> Option<&BreakSession> {
        self.break_sessions.iter().rev().find(|b| b.is_open())
    }

    pub fn has_open_break(&self) -> bool {
        self.open_break().is_some()
    }

    pub fn touch(&mut self, by: &str, at: NaiveDateTime) {
        self.updated_by = by.to_string();
        self.updated_at = at;
    }

    /// Sets the current remark and keeps the previous ones in history.
    pub fn add_remark(&mut self, by: &str, at: NaiveDateTime, text: impl Into<String>) {
        let text = text.into();
        self.remarks_history.push(RemarkEntry {
            at,
            by: by.to_string(),
            text: text.clone(),
        });
        self.remarks = Some(text);
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.clock_in.is_some() && self.status == AttendanceStatus::Absent {
            return Err(InvariantViolation::AbsentWithClockIn);
        }
        match (self.clock_in, self.clock_out) {
            (None, Some(_)) => return Err(InvariantViolation::ClockOutWithoutClockIn),
            (Some(clock_in), Some(clock_out)) if clock_out < clock_in => {
                return Err(InvariantViolation::ClockOutBeforeClockIn);
            }
            _ => {}
        }

        let last = self.break_sessions.len().saturating_sub(1);
        let mut previous_end: Option<NaiveDateTime> = None;
        for (index, session) in self.break_sessions.iter().enumerate() {
            if let Some(break_out) = session.break_out {
                if break_out < session.break_in {
                    return Err(InvariantViolation::BreakEndsBeforeStart { index });
                }
            } else if index != last {
                return Err(InvariantViolation::MultipleOpenBreaks { index });
            }
            let before_session = self.clock_in.is_none_or(|clock_in| session.break_in < clock_in);
            let after_session = match (self.clock_out, session.break_out) {
                (Some(clock_out), Some(break_out)) => break_out > clock_out,
                (Some(clock_out), None) => session.break_in > clock_out,
                _ => false,
            };
            if before_session || after_session {
                return Err(InvariantViolation::BreakOutsideSession { index });
            }
            if previous_end.is_some_and(|end| session.break_in < end) {
                return Err(InvariantViolation::OverlappingBreaks { index });
            }
            previous_end = session.break_out;
        }
        Ok(())
    }
}
