use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::status::AttendanceStatus;
use crate::modules::attendance::core::work_time::live_snapshot;
use crate::modules::attendance::use_cases::monthly_summary::projection::MonthlySummary;
use crate::shared::core::primitives::minutes_to_hours;
use chrono::NaiveDateTime;

/// Folds one employee's records for a month into a summary. Open sessions
/// contribute their elapsed work up to `now`; closed but unfinalized days
/// contribute their provisional totals. Either marks the summary live.
pub fn summarize(
    employee_id: &str,
    year: i32,
    month: u32,
    records: &[AttendanceRecord],
    now: NaiveDateTime,
) -> MonthlySummary {
    let mut summary = MonthlySummary {
        employee_id: employee_id.to_string(),
        year,
        month,
        ..MonthlySummary::default()
    };

    for record in records {
        match record.status {
            AttendanceStatus::Present => summary.present_days += 1,
            AttendanceStatus::HalfDay => summary.half_days += 1,
            AttendanceStatus::Absent => summary.absent_days += 1,
            AttendanceStatus::Leave => summary.leave_days += 1,
            AttendanceStatus::Holiday => summary.holiday_days += 1,
            AttendanceStatus::Weekend => summary.weekend_days += 1,
            AttendanceStatus::PendingCorrection => summary.pending_correction_days += 1,
            AttendanceStatus::InProgress
            | AttendanceStatus::OnBreak
            | AttendanceStatus::Completed => summary.provisional_days += 1,
        }

        let work_minutes = match record.clock_in {
            Some(clock_in) if record.has_open_session() && record.status.is_open_session() => {
                summary.includes_live_session = true;
                live_snapshot(clock_in, &record.break_sessions, now).work_minutes
            }
            _ => {
                if record.status.is_live() {
                    summary.includes_live_session = true;
                }
                record.total_worked_minutes
            }
        };
        summary.total_work_minutes += work_minutes;
        summary.total_overtime_minutes += record.overtime_minutes;

        if record.is_late {
            summary.late_days += 1;
            summary.total_late_minutes += record.late_minutes;
        }
        if record.is_early_departure {
            summary.early_departures += 1;
            summary.total_early_exit_minutes += record.early_exit_minutes;
        }
    }

    summary.total_work_hours = minutes_to_hours(summary.total_work_minutes);
    summary.total_overtime_hours = minutes_to_hours(summary.total_overtime_minutes);
    summary
}

#[cfg(test)]
mod monthly_summary_aggregate_tests {
    use super::*;
    use crate::tests::fixtures::records::{AttendanceRecordBuilder, at, day};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn on(day_of_month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day_of_month).unwrap()
    }

    fn finalized(date: NaiveDate, status: AttendanceStatus, minutes: i64) -> AttendanceRecord {
        let mut record = AttendanceRecordBuilder::new()
            .date(date)
            .status(status)
            .build();
        record.total_worked_minutes = minutes;
        record
    }

    #[rstest]
    fn it_should_count_days_by_status() {
        let mut late = finalized(on(1), AttendanceStatus::Present, 480);
        late.is_late = true;
        late.late_minutes = 25;
        late.overtime_minutes = 45;
        let mut early = finalized(on(2), AttendanceStatus::HalfDay, 270);
        early.is_early_departure = true;
        early.early_exit_minutes = 210;
        let records = vec![
            late,
            early,
            finalized(on(3), AttendanceStatus::Absent, 0),
            finalized(on(5), AttendanceStatus::Leave, 0),
            finalized(on(6), AttendanceStatus::Holiday, 0),
        ];

        let summary = summarize("emp-0001", 2024, 3, &records, at(12, 0));

        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.half_days, 1);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.leave_days, 1);
        assert_eq!(summary.holiday_days, 1);
        assert_eq!(summary.total_work_minutes, 750);
        assert_eq!(summary.total_work_hours, 12.5);
        assert_eq!(summary.total_overtime_hours, 0.75);
        assert_eq!((summary.late_days, summary.total_late_minutes), (1, 25));
        assert_eq!(
            (summary.early_departures, summary.total_early_exit_minutes),
            (1, 210)
        );
        assert!(!summary.includes_live_session);
    }

    #[rstest]
    fn it_should_fold_an_open_session_in_up_to_now() {
        let open = AttendanceRecordBuilder::new()
            .date(day())
            .clock_in(at(9, 0))
            .closed_break(at(12, 0), at(12, 30))
            .build();
        let records = vec![finalized(on(1), AttendanceStatus::Present, 480), open];

        let summary = summarize("emp-0001", 2024, 3, &records, at(14, 0));

        assert!(summary.includes_live_session);
        assert_eq!(summary.provisional_days, 1);
        assert_eq!(summary.total_work_minutes, 480 + 270);
    }

    #[rstest]
    fn it_should_not_treat_a_pending_correction_as_live() {
        let pending = AttendanceRecordBuilder::new()
            .clock_in(at(9, 0))
            .status(AttendanceStatus::PendingCorrection)
            .build();
        let summary = summarize("emp-0001", 2024, 3, &[pending], at(23, 0));
        assert!(!summary.includes_live_session);
        assert_eq!(summary.pending_correction_days, 1);
        assert_eq!(summary.total_work_minutes, 0);
    }

    #[rstest]
    fn it_should_mark_provisional_totals_of_an_unfinalized_day_as_live() {
        let mut completed = AttendanceRecordBuilder::new()
            .clock_in(at(9, 0))
            .clock_out(at(17, 0))
            .status(AttendanceStatus::Completed)
            .build();
        completed.total_worked_minutes = 480;
        let records = vec![finalized(on(1), AttendanceStatus::Present, 480), completed];

        let summary = summarize("emp-0001", 2024, 3, &records, at(20, 0));

        assert!(summary.includes_live_session);
        assert_eq!(summary.provisional_days, 1);
        assert_eq!(summary.total_work_minutes, 960);
    }
}
