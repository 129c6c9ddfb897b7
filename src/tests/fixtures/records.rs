use crate::modules::attendance::core::record::{AttendanceRecord, BreakSession};
use crate::modules::attendance::core::status::AttendanceStatus;
use chrono::{NaiveDate, NaiveDateTime};

/// Monday 2024-03-04, the day every fixture lives on unless told otherwise.
pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

pub struct AttendanceRecordBuilder {
    inner: AttendanceRecord,
}

impl Default for AttendanceRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl AttendanceRecordBuilder {
    pub fn new() -> Self {
        Self {
            inner: AttendanceRecord::new(
                "emp-0001",
                day(),
                AttendanceStatus::InProgress,
                "emp-0001",
                at(8, 0),
            ),
        }
    }

    pub fn employee(mut self, v: impl Into<String>) -> Self {
        self.inner.employee_id = v.into();
        self
    }

    pub fn date(mut self, v: NaiveDate) -> Self {
        self.inner.date = v;
        self
    }

    pub fn status(mut self, v: AttendanceStatus) -> Self {
        self.inner.status = v;
        self
    }

    pub fn clock_in(mut self, v: NaiveDateTime) -> Self {
        self.inner.clock_in = Some(v);
        self
    }

    pub fn clock_out(mut self, v: NaiveDateTime) -> Self {
        self.inner.clock_out = Some(v);
        self
    }

    pub fn open_break(mut self, from: NaiveDateTime) -> Self {
        self.inner.break_sessions.push(BreakSession {
            break_in: from,
            break_out: None,
        });
        self
    }

    pub fn closed_break(mut self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        self.inner.break_sessions.push(BreakSession {
            break_in: from,
            break_out: Some(to),
        });
        self
    }

    pub fn build(self) -> AttendanceRecord {
        self.inner
    }
}

#[cfg(test)]
mod attendance_record_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn setters_override_the_defaults() {
        let record = AttendanceRecordBuilder::new()
            .employee("emp-0042")
            .status(AttendanceStatus::Completed)
            .clock_in(at(9, 0))
            .closed_break(at(12, 0), at(12, 30))
            .clock_out(at(17, 0))
            .build();
        assert_eq!(record.employee_id, "emp-0042");
        assert_eq!(record.date, day());
        assert_eq!(record.break_sessions.len(), 1);
        assert!(record.check_invariants().is_ok());
    }
}
