pub mod v1 {
    use crate::modules::attendance::core::status::{AttendanceStatus, HalfDayType};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct AttendanceStatusChangedV1 {
        pub record_id: String,
        pub employee_id: String,
        pub date: NaiveDate,
        pub from: Option<AttendanceStatus>,
        pub to: AttendanceStatus,
        pub status_reason: Option<String>,
        pub half_day_type: Option<HalfDayType>,
        pub work_hours: f64,
        pub overtime_hours: f64,
        pub late_minutes: i64,
        pub early_exit_minutes: i64,
        pub changed_by: String,
        pub changed_at: NaiveDateTime,
    }
}

use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::status::AttendanceStatus;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum AttendanceEvent {
    AttendanceStatusChangedV1(v1::AttendanceStatusChangedV1),
}

impl v1::AttendanceStatusChangedV1 {
    /// Snapshot of the record after a transition away from `from`.
    pub fn from_record(record: &AttendanceRecord, from: Option<AttendanceStatus>) -> Self {
        Self {
            record_id: record.id.clone(),
            employee_id: record.employee_id.clone(),
            date: record.date,
            from,
            to: record.status,
            status_reason: record.status_reason.clone(),
            half_day_type: record.half_day_type,
            work_hours: record.work_hours,
            overtime_hours: record.overtime_hours,
            late_minutes: record.late_minutes,
            early_exit_minutes: record.early_exit_minutes,
            changed_by: record.updated_by.clone(),
            changed_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod attendance_event_tests {
    use super::*;
    use crate::tests::fixtures::records::{AttendanceRecordBuilder, at};
    use rstest::rstest;

    #[rstest]
    fn it_should_tag_the_event_with_its_type() {
        let record = AttendanceRecordBuilder::new()
            .clock_in(at(9, 0))
            .status(AttendanceStatus::PendingCorrection)
            .build();
        let payload =
            v1::AttendanceStatusChangedV1::from_record(&record, Some(AttendanceStatus::InProgress));
        let value =
            serde_json::to_value(AttendanceEvent::AttendanceStatusChangedV1(payload)).unwrap();
        assert_eq!(value["type"], "AttendanceStatusChangedV1");
        assert_eq!(value["from"], "in_progress");
        assert_eq!(value["to"], "pending_correction");
    }
}
