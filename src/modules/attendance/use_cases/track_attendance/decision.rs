use crate::modules::attendance::core::intents::AttendanceIntent;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::use_cases::track_attendance::command::AttendanceAction;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("{reason}")]
    GuardDenied {
        action: AttendanceAction,
        reason: String,
    },
}

#[derive(Debug)]
pub enum Decision {
    Accepted {
        record: AttendanceRecord,
        is_new: bool,
        intents: Vec<AttendanceIntent>,
    },
    Rejected {
        reason: DecideError,
    },
}
