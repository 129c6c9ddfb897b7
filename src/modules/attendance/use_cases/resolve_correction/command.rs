use crate::modules::attendance::core::capability::Actor;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Employee asks for a day to be reviewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCorrection {
    pub employee_id: String,
    pub date: NaiveDate,
    pub reason: String,
    pub at: NaiveDateTime,
    pub actor: Actor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    /// Corrected times replace the recorded ones when given.
    Approve {
        clock_in: Option<NaiveDateTime>,
        clock_out: Option<NaiveDateTime>,
    },
    Reject,
}

/// Supervisor or HR settles a correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecideCorrection {
    pub employee_id: String,
    pub date: NaiveDate,
    pub resolution: Resolution,
    pub remarks: Option<String>,
    pub at: NaiveDateTime,
    pub actor: Actor,
}
