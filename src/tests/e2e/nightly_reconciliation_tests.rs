use crate::modules::attendance::adapters::outbound::records::AttendanceRepository;
use crate::modules::attendance::core::status::AttendanceStatus;
use crate::modules::attendance::use_cases::reconcile_day::job::ReconciliationPhase;
use crate::modules::attendance::use_cases::track_attendance::command::{
    AttendanceAction, TrackAttendance,
};
use crate::tests::fixtures::policies::ShiftPolicyBuilder;
use crate::tests::fixtures::records::{at, day};
use crate::tests::fixtures::state::app_state_at;

#[tokio::test]
async fn reconciles_a_day_of_live_tracking() {
    let after_midnight = day().succ_opt().unwrap().and_hms_opt(0, 30, 0).unwrap();
    let (state, backends) = app_state_at(after_midnight);
    for employee_id in ["emp-0001", "emp-0002", "emp-0003"] {
        backends.directory.enroll(employee_id).await;
        backends
            .shifts
            .assign(employee_id, day(), None, ShiftPolicyBuilder::new().build())
            .await
            .unwrap();
    }

    // emp-0001 never shows up, emp-0002 forgets to clock out.
    state
        .track_handler
        .handle(TrackAttendance::new("emp-0002", AttendanceAction::ClockIn, at(9, 0)))
        .await
        .unwrap();
    state
        .track_handler
        .handle(TrackAttendance::new("emp-0003", AttendanceAction::ClockIn, at(9, 0)))
        .await
        .unwrap();
    let completed = state
        .track_handler
        .handle(TrackAttendance::new("emp-0003", AttendanceAction::ClockOut, at(18, 0)))
        .await
        .unwrap();
    assert_eq!(completed.status, AttendanceStatus::Completed);
    assert!(backends.outbox.rows.lock().await.is_empty());

    let report = state.reconciliation.run(day()).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.updated(ReconciliationPhase::MarkAbsent), 1);
    assert_eq!(report.updated(ReconciliationPhase::MarkMissedClockOuts), 1);
    assert_eq!(report.updated(ReconciliationPhase::FinalizeClosedDays), 1);

    let absent = backends.records.find("emp-0001", day()).await.unwrap().unwrap();
    assert_eq!(absent.status, AttendanceStatus::Absent);
    assert_eq!(absent.clock_in, None);
    assert_eq!(absent.updated_by, "system");

    let pending = backends.records.find("emp-0002", day()).await.unwrap().unwrap();
    assert_eq!(pending.status, AttendanceStatus::PendingCorrection);
    assert_eq!(
        pending.status_reason.as_deref(),
        Some("Clocked in without clocking out; a correction is required")
    );
    assert_eq!(pending.clock_in, Some(at(9, 0)));

    let present = backends.records.find("emp-0003", day()).await.unwrap().unwrap();
    assert_eq!(present.status, AttendanceStatus::Present);
    assert_eq!(backends.outbox.rows.lock().await.len(), 3);
}

#[tokio::test]
async fn a_second_run_changes_nothing() {
    let after_midnight = day().succ_opt().unwrap().and_hms_opt(0, 30, 0).unwrap();
    let (state, backends) = app_state_at(after_midnight);
    backends.directory.enroll("emp-0001").await;
    backends.directory.enroll("emp-0002").await;
    state
        .track_handler
        .handle(TrackAttendance::new("emp-0002", AttendanceAction::ClockIn, at(9, 0)))
        .await
        .unwrap();

    state.reconciliation.run(day()).await.unwrap();
    let first_pass = backends.records.list_by_date(day()).await.unwrap();
    let published = backends.outbox.rows.lock().await.len();

    let report = state.reconciliation.run(day()).await.unwrap();

    for outcome in &report.phases {
        assert_eq!(outcome.updated, 0, "phase {} updated records", outcome.phase);
    }
    let mut second_pass = backends.records.list_by_date(day()).await.unwrap();
    let mut first_pass = first_pass;
    first_pass.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
    second_pass.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
    assert_eq!(first_pass, second_pass);
    assert_eq!(backends.outbox.rows.lock().await.len(), published);
}
