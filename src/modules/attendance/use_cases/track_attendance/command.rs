use crate::modules::attendance::core::capability::Actor;
use crate::modules::attendance::core::status::WorkMode;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    ClockIn,
    ClockOut,
    StartBreak,
    EndBreak,
}

impl fmt::Display for AttendanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ClockIn => "clock-in",
            Self::ClockOut => "clock-out",
            Self::StartBreak => "break-start",
            Self::EndBreak => "break-end",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackAttendance {
    pub employee_id: String,
    pub action: AttendanceAction,
    pub at: NaiveDateTime,
    /// Day the action applies to. Resolved from `at` when absent, falling
    /// back to yesterday for a session still open across midnight.
    pub date: Option<NaiveDate>,
    pub work_mode: Option<WorkMode>,
    pub location: Option<String>,
    pub device_info: Option<String>,
    pub actor: Actor,
}

impl TrackAttendance {
    pub fn new(employee_id: impl Into<String>, action: AttendanceAction, at: NaiveDateTime) -> Self {
        let employee_id = employee_id.into();
        Self {
            actor: Actor::employee(employee_id.clone()),
            employee_id,
            action,
            at,
            date: None,
            work_mode: None,
            location: None,
            device_info: None,
        }
    }
}
