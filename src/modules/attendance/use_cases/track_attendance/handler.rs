use crate::modules::attendance::adapters::outbound::collaborators::ShiftPolicyProvider;
use crate::modules::attendance::adapters::outbound::intent_outbox::dispatch_intents;
use crate::modules::attendance::adapters::outbound::records::{
    AttendanceRepository, RepositoryError,
};
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::shift_policy::FallbackThresholds;
use crate::modules::attendance::use_cases::errors::ApplicationError;
use crate::modules::attendance::use_cases::track_attendance::command::{
    AttendanceAction, TrackAttendance,
};
use crate::modules::attendance::use_cases::track_attendance::decide::decide_track;
use crate::modules::attendance::use_cases::track_attendance::decision::Decision;
use crate::shared::infrastructure::intent_outbox::DomainOutbox;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct TrackAttendanceHandler<TRepo, TOutbox>
where
    TRepo: AttendanceRepository + 'static,
    TOutbox: DomainOutbox + Send + Sync + 'static,
{
    topic: String,
    repository: Arc<TRepo>,
    outbox: Arc<TOutbox>,
    shifts: Arc<dyn ShiftPolicyProvider>,
    fallback: FallbackThresholds,
}

impl<TRepo, TOutbox> TrackAttendanceHandler<TRepo, TOutbox>
where
    TRepo: AttendanceRepository + 'static,
    TOutbox: DomainOutbox + Send + Sync + 'static,
{
    pub fn new(
        topic: impl Into<String>,
        repository: Arc<TRepo>,
        outbox: Arc<TOutbox>,
        shifts: Arc<dyn ShiftPolicyProvider>,
        fallback: FallbackThresholds,
    ) -> Self {
        Self {
            topic: topic.into(),
            repository,
            outbox,
            shifts,
            fallback,
        }
    }

    pub async fn handle(
        &self,
        command: TrackAttendance,
    ) -> Result<AttendanceRecord, ApplicationError> {
        if !command.actor.can_act_for(&command.employee_id) {
            return Err(ApplicationError::Forbidden(format!(
                "{} may not record attendance for {}",
                command.actor.user_id, command.employee_id
            )));
        }

        let (date, existing) = self.resolve_day(&command).await?;
        let policy = self
            .shifts
            .active_policy(&command.employee_id, date)
            .await?;

        match decide_track(
            existing.as_ref(),
            policy.as_ref(),
            &self.fallback,
            date,
            &command,
        ) {
            Decision::Accepted {
                record,
                is_new,
                intents,
            } => {
                let stored = if is_new {
                    self.repository
                        .insert(record)
                        .await
                        .map_err(|e| match e {
                            RepositoryError::Duplicate { .. } => {
                                ApplicationError::Denied("Already clocked in today".into())
                            }
                            other => other.into(),
                        })?
                } else {
                    self.repository.update(record).await?
                };
                dispatch_intents(
                    &*self.outbox,
                    &stored.aggregate_id(),
                    stored.version,
                    &self.topic,
                    intents,
                )
                .await?;
                tracing::info!(
                    employee_id = %stored.employee_id,
                    date = %stored.date,
                    action = %command.action,
                    status = %stored.status,
                    "attendance action recorded"
                );
                Ok(stored)
            }
            Decision::Rejected { reason } => {
                tracing::warn!(
                    employee_id = %command.employee_id,
                    date = %date,
                    action = %command.action,
                    reason = %reason,
                    "attendance action denied"
                );
                Err(ApplicationError::Denied(reason.to_string()))
            }
        }
    }

    /// Picks the attendance day an action applies to. Anything but a
    /// clock-in continues a session left open yesterday when today has no
    /// clock-in of its own.
    async fn resolve_day(
        &self,
        command: &TrackAttendance,
    ) -> Result<(NaiveDate, Option<AttendanceRecord>), ApplicationError> {
        let employee_id = command.employee_id.as_str();
        let today = command.at.date();
        if command.action == AttendanceAction::ClockIn {
            return Ok((today, self.repository.find(employee_id, today).await?));
        }
        if let Some(date) = command.date {
            return Ok((date, self.repository.find(employee_id, date).await?));
        }

        let current = self.repository.find(employee_id, today).await?;
        if current.as_ref().is_some_and(|r| r.is_clocked_in()) {
            return Ok((today, current));
        }
        if let Some(yesterday) = today.pred_opt() {
            let previous = self.repository.find(employee_id, yesterday).await?;
            if previous.as_ref().is_some_and(|r| r.has_open_session()) {
                return Ok((yesterday, previous));
            }
        }
        Ok((today, current))
    }
}

#[cfg(test)]
mod track_attendance_handler_tests {
    use super::*;
    use crate::modules::attendance::adapters::outbound::collaborators_in_memory::InMemoryShiftAssignments;
    use crate::modules::attendance::adapters::outbound::records_in_memory::InMemoryAttendanceRecords;
    use crate::modules::attendance::core::capability::Actor;
    use crate::modules::attendance::core::status::AttendanceStatus;
    use crate::shared::infrastructure::intent_outbox::in_memory::InMemoryDomainOutbox;
    use crate::tests::fixtures::policies::ShiftPolicyBuilder;
    use crate::tests::fixtures::records::{AttendanceRecordBuilder, at, day};
    use rstest::{fixture, rstest};
    use tokio::join;

    const TOPIC: &str = "attendance";

    type BeforeEachReturn = (
        Arc<InMemoryAttendanceRecords>,
        Arc<InMemoryDomainOutbox>,
        Arc<InMemoryShiftAssignments>,
    );

    #[fixture]
    fn before_each() -> BeforeEachReturn {
        (
            Arc::new(InMemoryAttendanceRecords::new()),
            Arc::new(InMemoryDomainOutbox::new()),
            Arc::new(InMemoryShiftAssignments::new()),
        )
    }

    fn handler(
        (repository, outbox, shifts): &BeforeEachReturn,
    ) -> TrackAttendanceHandler<InMemoryAttendanceRecords, InMemoryDomainOutbox> {
        TrackAttendanceHandler::new(
            TOPIC,
            repository.clone(),
            outbox.clone(),
            shifts.clone(),
            FallbackThresholds::default(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_run_a_full_live_day(before_each: BeforeEachReturn) {
        let handler = handler(&before_each);
        for (action, hour, minute) in [
            (AttendanceAction::ClockIn, 9, 0),
            (AttendanceAction::StartBreak, 12, 0),
            (AttendanceAction::EndBreak, 12, 45),
            (AttendanceAction::ClockOut, 17, 0),
        ] {
            handler
                .handle(TrackAttendance::new("emp-0001", action, at(hour, minute)))
                .await
                .expect("handle failed");
        }
        let (repository, outbox, _) = before_each;
        let record = repository.find("emp-0001", day()).await.unwrap().unwrap();
        assert_eq!(record.status, AttendanceStatus::Completed);
        assert_eq!(record.version, 4);
        assert_eq!(record.total_break_minutes, 45);
        assert_eq!(record.total_worked_minutes, 7 * 60 + 15);
        assert!(outbox.rows.lock().await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_deny_a_second_clock_in(before_each: BeforeEachReturn) {
        let handler = handler(&before_each);
        handler
            .handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockIn, at(9, 0)))
            .await
            .expect("first clock-in failed");
        let result = handler
            .handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockIn, at(9, 5)))
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Denied(ref reason)) if reason == "Already clocked in today"
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_let_exactly_one_of_two_racing_clock_ins_win(before_each: BeforeEachReturn) {
        before_each.0.set_delay_insert_ms(10);
        let handler1 = handler(&before_each);
        let handler2 = handler(&before_each);
        let (result1, result2) = join!(
            handler1.handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockIn, at(9, 0))),
            handler2.handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockIn, at(9, 0)))
        );
        assert!(
            result1.is_ok() ^ result2.is_ok(),
            "exactly one should be denied"
        );
        let err = result1.err().or(result2.err()).unwrap();
        assert!(matches!(err, ApplicationError::Denied(ref reason) if reason == "Already clocked in today"));
        assert_eq!(before_each.0.len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_forbid_acting_for_someone_else(before_each: BeforeEachReturn) {
        let handler = handler(&before_each);
        let mut command = TrackAttendance::new("emp-0002", AttendanceAction::ClockIn, at(9, 0));
        command.actor = Actor::employee("emp-0001");
        let result = handler.handle(command).await;
        assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
        assert!(before_each.0.is_empty().await);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_let_hr_clock_in_on_behalf_of_an_employee(before_each: BeforeEachReturn) {
        let handler = handler(&before_each);
        let mut command = TrackAttendance::new("emp-0002", AttendanceAction::ClockIn, at(9, 0));
        command.actor = Actor::hr_admin("hr-1");
        let record = handler.handle(command).await.expect("handle failed");
        assert_eq!(record.created_by, "hr-1");
        assert_eq!(record.employee_id, "emp-0002");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_close_an_overnight_session_on_yesterdays_record(
        before_each: BeforeEachReturn,
    ) {
        let night_shift = ShiftPolicyBuilder::new().id("shift-night").hours(22, 6).build();
        before_each
            .2
            .assign("emp-0001", day(), None, night_shift)
            .await
            .unwrap();
        let handler = handler(&before_each);
        handler
            .handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockIn, at(22, 0)))
            .await
            .expect("clock-in failed");
        let next_morning = day().succ_opt().unwrap().and_hms_opt(6, 5, 0).unwrap();
        let record = handler
            .handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockOut, next_morning))
            .await
            .expect("clock-out failed");
        assert_eq!(record.date, day());
        assert_eq!(record.total_worked_minutes, 8 * 60 + 5);
        assert_eq!(record.status, AttendanceStatus::Completed);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_deny_a_clock_out_past_the_deadline(before_each: BeforeEachReturn) {
        before_each
            .2
            .assign("emp-0001", day(), None, ShiftPolicyBuilder::new().build())
            .await
            .unwrap();
        let handler = handler(&before_each);
        handler
            .handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockIn, at(9, 0)))
            .await
            .expect("clock-in failed");
        let result = handler
            .handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockOut, at(18, 16)))
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Denied(ref reason)) if reason.contains("submit a correction request")
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_surface_an_offline_repository(before_each: BeforeEachReturn) {
        let (_, outbox, shifts) = before_each;
        let mut repository = InMemoryAttendanceRecords::new();
        repository.toggle_offline();
        let handler = TrackAttendanceHandler::new(
            TOPIC,
            Arc::new(repository),
            outbox,
            shifts,
            FallbackThresholds::default(),
        );
        let result = handler
            .handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockIn, at(9, 0)))
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "backend error: Attendance repository offline"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_touch_a_protected_day(before_each: BeforeEachReturn) {
        let leave = AttendanceRecordBuilder::new()
            .status(AttendanceStatus::Leave)
            .build();
        before_each.0.insert(leave).await.unwrap();
        let handler = handler(&before_each);
        let result = handler
            .handle(TrackAttendance::new("emp-0001", AttendanceAction::ClockIn, at(9, 0)))
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Denied(ref reason)) if reason.contains("marked as leave")
        ));
        let stored = before_each.0.find("emp-0001", day()).await.unwrap().unwrap();
        assert_eq!(stored.version, 1);
    }
}
