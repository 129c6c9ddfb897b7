use crate::modules::attendance::core::finalize::{
    apply_early_departure, apply_lateness, apply_work_time,
};
use crate::modules::attendance::core::guards::{
    GuardResult, can_clock_in, can_clock_out, can_end_break, can_start_break,
};
use crate::modules::attendance::core::intents::AttendanceIntent;
use crate::modules::attendance::core::record::{AttendanceRecord, BreakSession};
use crate::modules::attendance::core::shift_policy::{
    FallbackThresholds, ShiftPolicy, Thresholds,
};
use crate::modules::attendance::core::status::AttendanceStatus;
use crate::modules::attendance::core::work_time::{final_snapshot, overtime_minutes};
use crate::modules::attendance::use_cases::track_attendance::command::{
    AttendanceAction, TrackAttendance,
};
use crate::modules::attendance::use_cases::track_attendance::decision::{DecideError, Decision};
use crate::shared::core::primitives::minutes_to_hours;
use chrono::NaiveDate;

pub fn decide_track(
    record: Option<&AttendanceRecord>,
    policy: Option<&ShiftPolicy>,
    fallback: &FallbackThresholds,
    date: NaiveDate,
    command: &TrackAttendance,
) -> Decision {
    let guard = match command.action {
        AttendanceAction::ClockIn => can_clock_in(record, policy, date, command.at),
        AttendanceAction::ClockOut => can_clock_out(record, policy, command.at),
        AttendanceAction::StartBreak => can_start_break(record),
        AttendanceAction::EndBreak => can_end_break(record),
    };
    if let GuardResult {
        allowed: false,
        reason,
    } = guard
    {
        return Decision::Rejected {
            reason: DecideError::GuardDenied {
                action: command.action,
                reason: reason.unwrap_or_else(|| format!("{} not allowed", command.action)),
            },
        };
    }

    let from = record.map(|r| r.status);
    let is_new = record.is_none();
    let mut next = match record {
        Some(existing) => existing.clone(),
        None => AttendanceRecord::new(
            command.employee_id.clone(),
            date,
            AttendanceStatus::InProgress,
            command.actor.user_id.clone(),
            command.at,
        ),
    };

    match command.action {
        AttendanceAction::ClockIn => clock_in(&mut next, policy, command),
        AttendanceAction::ClockOut => clock_out(&mut next, policy, fallback, command),
        AttendanceAction::StartBreak => {
            next.break_sessions.push(BreakSession {
                break_in: command.at,
                break_out: None,
            });
            keep_pending_or(&mut next, AttendanceStatus::OnBreak);
        }
        AttendanceAction::EndBreak => {
            close_open_break(&mut next, command);
            keep_pending_or(&mut next, AttendanceStatus::InProgress);
        }
    }
    next.touch(&command.actor.user_id, command.at);

    let intents = AttendanceIntent::for_transition(&next, from)
        .into_iter()
        .collect();
    Decision::Accepted {
        record: next,
        is_new,
        intents,
    }
}

fn clock_in(record: &mut AttendanceRecord, policy: Option<&ShiftPolicy>, command: &TrackAttendance) {
    record.clock_in = Some(command.at);
    record.status = AttendanceStatus::InProgress;
    record.status_reason = None;
    record.half_day_type = None;
    if let Some(work_mode) = command.work_mode {
        record.work_mode = work_mode;
    }
    record.location = command.location.clone().or(record.location.take());
    record.device_info = command.device_info.clone().or(record.device_info.take());
    if let Some(policy) = policy {
        record.shift_id = Some(policy.shift_id.clone());
        apply_lateness(record, policy);
    }
}

fn clock_out(
    record: &mut AttendanceRecord,
    policy: Option<&ShiftPolicy>,
    fallback: &FallbackThresholds,
    command: &TrackAttendance,
) {
    close_open_break(record, command);
    record.clock_out = Some(command.at);
    if let Some(clock_in) = record.clock_in {
        let work = final_snapshot(clock_in, command.at, &record.break_sessions);
        apply_work_time(record, &work);
        let full_day_hours = Thresholds::resolve(policy, fallback).full_day_hours;
        record.overtime_minutes = policy
            .map(|p| overtime_minutes(work.work_minutes, p, full_day_hours))
            .unwrap_or(0);
        record.overtime_hours = minutes_to_hours(record.overtime_minutes);
    }
    if let Some(policy) = policy {
        apply_early_departure(record, policy);
    }
    keep_pending_or(record, AttendanceStatus::Completed);
}

/// A clock-out or break-end closes the open break at the action instant.
fn close_open_break(record: &mut AttendanceRecord, command: &TrackAttendance) {
    if let Some(session) = record.break_sessions.iter_mut().rev().find(|b| b.is_open()) {
        session.break_out = Some(command.at);
    }
}

/// A day under correction review stays there until it is resolved.
fn keep_pending_or(record: &mut AttendanceRecord, status: AttendanceStatus) {
    if record.status != AttendanceStatus::PendingCorrection {
        record.status = status;
    }
}

#[cfg(test)]
mod track_attendance_decide_tests {
    use super::*;
    use crate::tests::fixtures::policies::ShiftPolicyBuilder;
    use crate::tests::fixtures::records::{AttendanceRecordBuilder, at, day};
    use rstest::{fixture, rstest};

    #[fixture]
    fn policy() -> ShiftPolicy {
        ShiftPolicyBuilder::new().build()
    }

    fn command(action: AttendanceAction, hour: u32, minute: u32) -> TrackAttendance {
        TrackAttendance::new("emp-0001", action, at(hour, minute))
    }

    fn accepted(decision: Decision) -> (AttendanceRecord, bool, Vec<AttendanceIntent>) {
        match decision {
            Decision::Accepted {
                record,
                is_new,
                intents,
            } => (record, is_new, intents),
            Decision::Rejected { reason } => panic!("expected Accepted, got {reason}"),
        }
    }

    #[rstest]
    fn it_should_open_a_new_record_on_the_first_clock_in(policy: ShiftPolicy) {
        let decision = decide_track(
            None,
            Some(&policy),
            &FallbackThresholds::default(),
            day(),
            &command(AttendanceAction::ClockIn, 9, 40),
        );
        let (record, is_new, intents) = accepted(decision);
        assert!(is_new);
        assert!(intents.is_empty());
        assert_eq!(record.status, AttendanceStatus::InProgress);
        assert_eq!(record.clock_in, Some(at(9, 40)));
        assert_eq!(record.late_minutes, 40);
        assert!(record.is_late);
        assert_eq!(record.shift_id.as_deref(), Some("shift-general"));
    }

    #[rstest]
    fn it_should_not_flag_lateness_within_the_grace_period(policy: ShiftPolicy) {
        let decision = decide_track(
            None,
            Some(&policy),
            &FallbackThresholds::default(),
            day(),
            &command(AttendanceAction::ClockIn, 9, 10),
        );
        let (record, _, _) = accepted(decision);
        assert_eq!(record.late_minutes, 10);
        assert!(!record.is_late);
    }

    #[rstest]
    fn it_should_reject_a_second_clock_in(policy: ShiftPolicy) {
        let existing = AttendanceRecordBuilder::new().clock_in(at(9, 0)).build();
        let decision = decide_track(
            Some(&existing),
            Some(&policy),
            &FallbackThresholds::default(),
            day(),
            &command(AttendanceAction::ClockIn, 9, 5),
        );
        match decision {
            Decision::Rejected {
                reason: DecideError::GuardDenied { action, reason },
            } => {
                assert_eq!(action, AttendanceAction::ClockIn);
                assert_eq!(reason, "Already clocked in today");
            }
            Decision::Accepted { .. } => panic!("expected Rejected"),
        }
    }

    #[rstest]
    fn it_should_toggle_break_status(policy: ShiftPolicy) {
        let fallback = FallbackThresholds::default();
        let existing = AttendanceRecordBuilder::new().clock_in(at(9, 0)).build();
        let (on_break, _, _) = accepted(decide_track(
            Some(&existing),
            Some(&policy),
            &fallback,
            day(),
            &command(AttendanceAction::StartBreak, 12, 0),
        ));
        assert_eq!(on_break.status, AttendanceStatus::OnBreak);
        assert!(on_break.has_open_break());

        let (back, is_new, intents) = accepted(decide_track(
            Some(&on_break),
            Some(&policy),
            &fallback,
            day(),
            &command(AttendanceAction::EndBreak, 12, 30),
        ));
        assert!(!is_new);
        assert!(intents.is_empty());
        assert_eq!(back.status, AttendanceStatus::InProgress);
        assert_eq!(back.break_sessions[0].break_out, Some(at(12, 30)));
    }

    #[rstest]
    fn it_should_close_an_open_break_and_total_the_day_on_clock_out(policy: ShiftPolicy) {
        let existing = AttendanceRecordBuilder::new()
            .clock_in(at(9, 0))
            .open_break(at(13, 0))
            .status(AttendanceStatus::OnBreak)
            .build();
        let (record, _, intents) = accepted(decide_track(
            Some(&existing),
            Some(&policy),
            &FallbackThresholds::default(),
            day(),
            &command(AttendanceAction::ClockOut, 13, 30),
        ));
        assert!(intents.is_empty());
        assert_eq!(record.status, AttendanceStatus::Completed);
        assert_eq!(record.break_sessions[0].break_out, Some(at(13, 30)));
        assert_eq!(record.total_break_minutes, 30);
        assert_eq!(record.total_worked_minutes, 240);
        assert_eq!(record.work_hours, 4.0);
        assert!(record.is_early_departure);
        assert_eq!(record.early_exit_minutes, 270);
    }

    #[rstest]
    fn it_should_keep_pending_correction_on_a_late_clock_out(policy: ShiftPolicy) {
        let existing = AttendanceRecordBuilder::new()
            .clock_in(at(9, 0))
            .status(AttendanceStatus::PendingCorrection)
            .build();
        let (record, _, intents) = accepted(decide_track(
            Some(&existing),
            Some(&policy),
            &FallbackThresholds::default(),
            day(),
            &command(AttendanceAction::ClockOut, 23, 0),
        ));
        assert!(intents.is_empty());
        assert_eq!(record.status, AttendanceStatus::PendingCorrection);
        assert_eq!(record.clock_out, Some(at(23, 0)));
        assert_eq!(record.overtime_minutes, 5 * 60 + 30);
    }

    #[rstest]
    fn it_should_count_overtime_only_with_a_policy() {
        let existing = AttendanceRecordBuilder::new().clock_in(at(7, 0)).build();
        let (record, _, _) = accepted(decide_track(
            Some(&existing),
            None,
            &FallbackThresholds::default(),
            day(),
            &command(AttendanceAction::ClockOut, 19, 0),
        ));
        assert_eq!(record.total_worked_minutes, 12 * 60);
        assert_eq!(record.overtime_minutes, 0);
        assert!(!record.is_early_departure);
    }
}
