use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily attendance status.
///
/// LIVE statuses are driven by employee actions. FINAL statuses are written
/// only by finalization, the nightly reconciliation job or an admin override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, async_graphql::Enum)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    InProgress,
    OnBreak,
    Completed,
    Present,
    HalfDay,
    Absent,
    Leave,
    Holiday,
    Weekend,
    PendingCorrection,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::OnBreak => "on_break",
            Self::Completed => "completed",
            Self::Present => "present",
            Self::HalfDay => "half_day",
            Self::Absent => "absent",
            Self::Leave => "leave",
            Self::Holiday => "holiday",
            Self::Weekend => "weekend",
            Self::PendingCorrection => "pending_correction",
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::InProgress | Self::OnBreak | Self::Completed)
    }

    pub fn is_final(&self) -> bool {
        !self.is_live()
    }

    /// Terminal for the day. `pending_correction` is final but not terminal.
    pub fn is_terminal(&self) -> bool {
        self.is_final() && *self != Self::PendingCorrection
    }

    /// Assigned by the leave and holiday collaborators; employees cannot move
    /// a record out of these.
    pub fn is_exogenous(&self) -> bool {
        matches!(self, Self::Leave | Self::Holiday | Self::Weekend)
    }

    /// Clocked in and not yet clocked out.
    pub fn is_open_session(&self) -> bool {
        matches!(self, Self::InProgress | Self::OnBreak)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, async_graphql::Enum)]
#[serde(rename_all = "snake_case")]
pub enum HalfDayType {
    FirstHalf,
    SecondHalf,
    FullDay,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, async_graphql::Enum)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    #[default]
    Office,
    Wfh,
    Hybrid,
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, async_graphql::Enum)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStatus {
    Pending,
    Approved,
    Rejected,
}

#[cfg(test)]
mod attendance_status_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AttendanceStatus::InProgress, true, false)]
    #[case(AttendanceStatus::OnBreak, true, false)]
    #[case(AttendanceStatus::Completed, true, false)]
    #[case(AttendanceStatus::Present, false, true)]
    #[case(AttendanceStatus::HalfDay, false, true)]
    #[case(AttendanceStatus::Absent, false, true)]
    #[case(AttendanceStatus::Leave, false, true)]
    #[case(AttendanceStatus::Holiday, false, true)]
    #[case(AttendanceStatus::Weekend, false, true)]
    #[case(AttendanceStatus::PendingCorrection, false, false)]
    fn it_should_partition_statuses_into_tiers(
        #[case] status: AttendanceStatus,
        #[case] live: bool,
        #[case] terminal: bool,
    ) {
        assert_eq!(status.is_live(), live);
        assert_eq!(status.is_final(), !live);
        assert_eq!(status.is_terminal(), terminal);
    }

    #[rstest]
    fn it_should_serialize_in_snake_case() {
        let value = serde_json::to_value(AttendanceStatus::PendingCorrection).unwrap();
        assert_eq!(value, serde_json::json!("pending_correction"));
        let parsed: AttendanceStatus = serde_json::from_str("\"half_day\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::HalfDay);
        assert_eq!(AttendanceStatus::OnBreak.to_string(), "on_break");
    }
}
