use crate::modules::attendance::core::capability::Actor;
use crate::modules::attendance::core::status::{AttendanceStatus, HalfDayType, WorkMode};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Fields an HR override may set. `None` keeps the stored value; the
/// `clear_*` flags remove a timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordPatch {
    pub status: Option<AttendanceStatus>,
    pub status_reason: Option<String>,
    pub half_day_type: Option<HalfDayType>,
    pub clock_in: Option<NaiveDateTime>,
    pub clear_clock_in: bool,
    pub clock_out: Option<NaiveDateTime>,
    pub clear_clock_out: bool,
    pub work_mode: Option<WorkMode>,
    pub location: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRecord {
    pub employee_id: String,
    pub date: NaiveDate,
    pub patch: RecordPatch,
    /// Run the finalization engine over the patched record.
    pub refinalize: bool,
    pub at: NaiveDateTime,
    pub actor: Actor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRecord {
    pub employee_id: String,
    pub date: NaiveDate,
    pub reason: String,
    pub at: NaiveDateTime,
    pub actor: Actor,
}
