// Nightly reconciliation job.
//
// Purpose
// - Close out one calendar day for every employee.
//
// Responsibilities
// - Phase 0: seed leave, holiday and weekly-off records for rostered
//   employees who have none.
// - Phase 1: mark days without a clock-in `absent`.
// - Phase 2: mark days with a clock-in but no clock-out `pending_correction`,
//   once the shift's clock-out window has closed.
// - Phase 3: finalize every `completed` day through the finalization engine.
//
// Phases 2 and 3 also sweep the previous day, where overnight sessions close.
//
// Every phase is idempotent and touches only rows that still need it, so a
// rerun on the same date changes nothing and publishes nothing. A failing
// phase is logged and reported; the remaining phases still run.

use crate::modules::attendance::adapters::outbound::collaborators::{
    DayCalendar, EmployeeDirectory, ShiftPolicyProvider,
};
use crate::modules::attendance::adapters::outbound::intent_outbox::dispatch_intents;
use crate::modules::attendance::adapters::outbound::records::{
    AttendanceRepository, BulkStamp, RepositoryError, StatusTransition,
};
use crate::modules::attendance::core::finalize::finalize_record;
use crate::modules::attendance::core::intents::AttendanceIntent;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::shift_policy::FallbackThresholds;
use crate::modules::attendance::core::status::AttendanceStatus;
use crate::modules::attendance::use_cases::errors::ApplicationError;
use crate::modules::attendance::use_cases::reconcile_day::command::TriggerReconciliation;
use crate::shared::core::primitives::{Clock, EmployeeId};
use crate::shared::infrastructure::intent_outbox::DomainOutbox;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

const SYSTEM_USER: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationPhase {
    SeedExogenousDays,
    MarkAbsent,
    MarkMissedClockOuts,
    FinalizeClosedDays,
}

impl fmt::Display for ReconciliationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SeedExogenousDays => "seed_exogenous_days",
            Self::MarkAbsent => "mark_absent",
            Self::MarkMissedClockOuts => "mark_missed_clock_outs",
            Self::FinalizeClosedDays => "finalize_closed_days",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseOutcome {
    pub phase: ReconciliationPhase,
    pub updated: usize,
    /// Rows that could not be processed; the phase carried on without them.
    pub skipped: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    pub date: NaiveDate,
    pub phases: Vec<PhaseOutcome>,
}

impl ReconciliationReport {
    pub fn updated(&self, phase: ReconciliationPhase) -> usize {
        self.phases
            .iter()
            .find(|p| p.phase == phase)
            .map_or(0, |p| p.updated)
    }

    pub fn is_clean(&self) -> bool {
        self.phases.iter().all(|p| p.error.is_none() && p.skipped == 0)
    }
}

#[derive(Debug, Default)]
struct PhaseCounts {
    updated: usize,
    skipped: usize,
}

pub struct NightlyReconciliation<TRepo, TOutbox>
where
    TRepo: AttendanceRepository + 'static,
    TOutbox: DomainOutbox + Send + Sync + 'static,
{
    topic: String,
    repository: Arc<TRepo>,
    outbox: Arc<TOutbox>,
    shifts: Arc<dyn ShiftPolicyProvider>,
    calendar: Arc<dyn DayCalendar>,
    directory: Arc<dyn EmployeeDirectory>,
    clock: Arc<dyn Clock>,
    fallback: FallbackThresholds,
}

impl<TRepo, TOutbox> NightlyReconciliation<TRepo, TOutbox>
where
    TRepo: AttendanceRepository + 'static,
    TOutbox: DomainOutbox + Send + Sync + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        topic: impl Into<String>,
        repository: Arc<TRepo>,
        outbox: Arc<TOutbox>,
        shifts: Arc<dyn ShiftPolicyProvider>,
        calendar: Arc<dyn DayCalendar>,
        directory: Arc<dyn EmployeeDirectory>,
        clock: Arc<dyn Clock>,
        fallback: FallbackThresholds,
    ) -> Self {
        Self {
            topic: topic.into(),
            repository,
            outbox,
            shifts,
            calendar,
            directory,
            clock,
            fallback,
        }
    }

    pub async fn trigger(
        &self,
        command: TriggerReconciliation,
    ) -> Result<ReconciliationReport, ApplicationError> {
        if !command.actor.can_trigger_reconciliation() {
            return Err(ApplicationError::Forbidden(format!(
                "{} may not run reconciliation",
                command.actor.user_id
            )));
        }
        tracing::info!(date = %command.date, by = %command.actor.user_id, "manual reconciliation requested");
        self.run(command.date).await
    }

    /// Runs all phases for `date` under the per-date job lock.
    pub async fn run(&self, date: NaiveDate) -> Result<ReconciliationReport, ApplicationError> {
        if !self.repository.try_lock_reconciliation(date).await? {
            return Err(ApplicationError::ReconciliationInProgress(date));
        }
        let report = self.run_phases(date).await;
        if let Err(e) = self.repository.unlock_reconciliation(date).await {
            tracing::error!(date = %date, error = %e, "failed to release reconciliation lock");
        }
        Ok(report)
    }

    async fn run_phases(&self, date: NaiveDate) -> ReconciliationReport {
        let at = self.clock.now();
        let mut phases = Vec::with_capacity(4);
        phases.push(outcome(
            date,
            ReconciliationPhase::SeedExogenousDays,
            self.seed_exogenous_days(date, at).await,
        ));
        phases.push(outcome(
            date,
            ReconciliationPhase::MarkAbsent,
            self.mark_absent_for_no_clock_in(date, at).await,
        ));
        phases.push(outcome(
            date,
            ReconciliationPhase::MarkMissedClockOuts,
            self.mark_missed_clock_outs(date, at).await,
        ));
        phases.push(outcome(
            date,
            ReconciliationPhase::FinalizeClosedDays,
            self.finalize_closed_days(date, at).await,
        ));
        ReconciliationReport { date, phases }
    }

    async fn seed_exogenous_days(
        &self,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> Result<PhaseCounts, ApplicationError> {
        let mut counts = PhaseCounts::default();
        for employee_id in self.directory.active_employee_ids(date).await? {
            if self.repository.find(&employee_id, date).await?.is_some() {
                continue;
            }
            let Some((status, reason)) = self.exogenous_status(&employee_id, date).await? else {
                continue;
            };
            let mut record = AttendanceRecord::new(&employee_id, date, status, SYSTEM_USER, at);
            record.status_reason = Some(reason.to_string());
            if self.insert_and_publish(record).await? {
                counts.updated += 1;
            }
        }
        Ok(counts)
    }

    async fn exogenous_status(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<(AttendanceStatus, &'static str)>, ApplicationError> {
        if self.calendar.is_on_approved_leave(employee_id, date).await? {
            return Ok(Some((AttendanceStatus::Leave, "Approved leave")));
        }
        if self.calendar.is_company_holiday(date).await? {
            return Ok(Some((AttendanceStatus::Holiday, "Company holiday")));
        }
        let policy = self.shifts.active_policy(employee_id, date).await?;
        if policy.is_some_and(|p| p.is_weekly_off(date)) {
            return Ok(Some((AttendanceStatus::Weekend, "Weekly off")));
        }
        Ok(None)
    }

    async fn mark_absent_for_no_clock_in(
        &self,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> Result<PhaseCounts, ApplicationError> {
        let reason = format!("No clock-in recorded on {date}");
        let stamp = BulkStamp {
            reason: &reason,
            by: SYSTEM_USER,
            at,
        };
        let transitions = self
            .repository
            .mark_absent_where_no_clock_in(date, stamp)
            .await?;
        let mut counts = PhaseCounts {
            updated: transitions.len(),
            skipped: 0,
        };
        self.publish_transitions(transitions).await?;

        for employee_id in self.directory.active_employee_ids(date).await? {
            if self.repository.find(&employee_id, date).await?.is_some() {
                continue;
            }
            let (status, reason) = match self.exogenous_status(&employee_id, date).await {
                Ok(Some((status, reason))) => (status, reason.to_string()),
                Ok(None) => (AttendanceStatus::Absent, reason.clone()),
                Err(e) => {
                    tracing::warn!(
                        employee_id = %employee_id,
                        date = %date,
                        error = %e,
                        "cannot rule out leave or weekly off; absence left for the next run"
                    );
                    counts.skipped += 1;
                    continue;
                }
            };
            let mut record = AttendanceRecord::new(&employee_id, date, status, SYSTEM_USER, at);
            record.status_reason = Some(reason);
            if self.insert_and_publish(record).await? {
                counts.updated += 1;
            }
        }
        Ok(counts)
    }

    async fn mark_missed_clock_outs(
        &self,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> Result<PhaseCounts, ApplicationError> {
        let mut counts = PhaseCounts::default();
        for day in with_previous_day(date) {
            let deferred = self.sessions_within_clock_out_window(day, at).await?;
            let stamp = BulkStamp {
                reason: "Clocked in without clocking out; a correction is required",
                by: SYSTEM_USER,
                at,
            };
            let transitions = self
                .repository
                .mark_pending_correction_where_clock_out_missing(day, stamp, &deferred)
                .await?;
            if !deferred.is_empty() {
                tracing::debug!(
                    date = %day,
                    open = deferred.len(),
                    "sessions still inside their clock-out window"
                );
            }
            counts.updated += transitions.len();
            self.publish_transitions(transitions).await?;
        }
        Ok(counts)
    }

    /// Open sessions whose shift still allows a self-service clock-out at
    /// `now`, such as overnight shifts ending the next morning.
    async fn sessions_within_clock_out_window(
        &self,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<EmployeeId>, ApplicationError> {
        let mut deferred = Vec::new();
        let open = self
            .repository
            .list_by_date(date)
            .await?
            .into_iter()
            .filter(|r| r.has_open_session() && r.status.is_open_session());
        for record in open {
            let policy = self.shifts.active_policy(&record.employee_id, date).await?;
            if policy.is_some_and(|p| now <= p.clock_out_deadline_on(date)) {
                deferred.push(record.employee_id);
            }
        }
        Ok(deferred)
    }

    async fn finalize_closed_days(
        &self,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> Result<PhaseCounts, ApplicationError> {
        let mut counts = PhaseCounts::default();
        let mut closed = Vec::new();
        for day in with_previous_day(date) {
            closed.extend(
                self.repository
                    .list_by_date(day)
                    .await?
                    .into_iter()
                    .filter(is_ready_to_finalize),
            );
        }
        for record in closed {
            let employee_id = record.employee_id.clone();
            match self.finalize_one(record, at).await {
                Ok(()) => counts.updated += 1,
                Err(e) => {
                    tracing::error!(
                        employee_id = %employee_id,
                        date = %date,
                        error = %e,
                        "failed to finalize attendance record"
                    );
                    counts.skipped += 1;
                }
            }
        }
        Ok(counts)
    }

    async fn finalize_one(
        &self,
        mut record: AttendanceRecord,
        at: NaiveDateTime,
    ) -> Result<(), ApplicationError> {
        let from = record.status;
        let policy = self
            .shifts
            .active_policy(&record.employee_id, record.date)
            .await?;
        let verdict = finalize_record(&mut record, policy.as_ref(), &self.fallback).map_err(|e| {
            ApplicationError::Invalid {
                field: "clock_out".into(),
                message: e.to_string(),
            }
        })?;
        if verdict.work.unclosed_breaks > 0 {
            tracing::warn!(
                employee_id = %record.employee_id,
                date = %record.date,
                unclosed_breaks = verdict.work.unclosed_breaks,
                "record finalized with unclosed breaks"
            );
        }
        record.touch(SYSTEM_USER, at);
        let stored = self.repository.update(record).await?;
        self.publish(&stored, Some(from)).await
    }

    /// Inserts a system-created record; a row that appeared meanwhile wins.
    async fn insert_and_publish(&self, record: AttendanceRecord) -> Result<bool, ApplicationError> {
        match self.repository.insert(record).await {
            Ok(stored) => {
                self.publish(&stored, None).await?;
                Ok(true)
            }
            Err(RepositoryError::Duplicate { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn publish_transitions(
        &self,
        transitions: Vec<StatusTransition>,
    ) -> Result<(), ApplicationError> {
        for transition in transitions {
            self.publish(&transition.record, Some(transition.from)).await?;
        }
        Ok(())
    }

    async fn publish(
        &self,
        record: &AttendanceRecord,
        from: Option<AttendanceStatus>,
    ) -> Result<(), ApplicationError> {
        let intents = AttendanceIntent::for_transition(record, from)
            .into_iter()
            .collect();
        dispatch_intents(
            &*self.outbox,
            &record.aggregate_id(),
            record.version,
            &self.topic,
            intents,
        )
        .await?;
        Ok(())
    }
}

/// Only `completed` days; a day under correction review is finalized by the
/// correction decision.
fn is_ready_to_finalize(record: &AttendanceRecord) -> bool {
    record.status == AttendanceStatus::Completed
}

/// The run date plus the day before it, whose overnight sessions may only
/// have closed after that day's run.
fn with_previous_day(date: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    date.pred_opt().into_iter().chain(std::iter::once(date))
}

fn outcome(
    date: NaiveDate,
    phase: ReconciliationPhase,
    result: Result<PhaseCounts, ApplicationError>,
) -> PhaseOutcome {
    match result {
        Ok(counts) => {
            tracing::info!(
                date = %date,
                phase = %phase,
                updated = counts.updated,
                skipped = counts.skipped,
                "reconciliation phase finished"
            );
            PhaseOutcome {
                phase,
                updated: counts.updated,
                skipped: counts.skipped,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(date = %date, phase = %phase, error = %e, "reconciliation phase failed");
            PhaseOutcome {
                phase,
                updated: 0,
                skipped: 0,
                error: Some(e.to_string()),
            }
        }
    }
}
