// Manual override and supervisor flagging.
//
// An override may set any field, so the patched record is validated against
// the record invariants before it is stored and a violation names the field.

use crate::modules::attendance::adapters::outbound::collaborators::ShiftPolicyProvider;
use crate::modules::attendance::adapters::outbound::intent_outbox::dispatch_intents;
use crate::modules::attendance::adapters::outbound::records::AttendanceRepository;
use crate::modules::attendance::core::finalize::{FinalizeError, apply_work_time, finalize_record};
use crate::modules::attendance::core::intents::AttendanceIntent;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::shift_policy::{FallbackThresholds, ShiftPolicy};
use crate::modules::attendance::core::status::AttendanceStatus;
use crate::modules::attendance::core::work_time::final_snapshot;
use crate::modules::attendance::use_cases::errors::ApplicationError;
use crate::modules::attendance::use_cases::override_record::command::{
    FlagRecord, OverrideRecord, RecordPatch,
};
use crate::shared::infrastructure::intent_outbox::DomainOutbox;
use std::sync::Arc;

pub struct OverrideRecordHandler<TRepo, TOutbox>
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

impl<TRepo, TOutbox> OverrideRecordHandler<TRepo, TOutbox>
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

    pub async fn override_record(
        &self,
        command: OverrideRecord,
    ) -> Result<AttendanceRecord, ApplicationError> {
        if !command.actor.can_override() {
            return Err(ApplicationError::Forbidden(format!(
                "{} may not override attendance",
                command.actor.user_id
            )));
        }
        let by = command.actor.user_id.as_str();
        let existing = self
            .repository
            .find(&command.employee_id, command.date)
            .await?;
        let from = existing.as_ref().map(|r| r.status);
        let is_new = existing.is_none();
        let mut record = existing.unwrap_or_else(|| {
            AttendanceRecord::new(
                &command.employee_id,
                command.date,
                AttendanceStatus::Absent,
                by,
                command.at,
            )
        });

        let policy = self
            .shifts
            .active_policy(&command.employee_id, command.date)
            .await?;
        apply_patch(&mut record, &command.patch);
        if command.refinalize {
            self.refinalize(&mut record, policy.as_ref());
        } else {
            recompute_totals(&mut record);
        }
        record.touch(by, command.at);
        record.add_remark(
            by,
            command.at,
            command
                .patch
                .remarks
                .clone()
                .unwrap_or_else(|| "Record overridden".to_string()),
        );
        record.check_invariants()?;

        let stored = if is_new {
            self.repository.insert(record).await?
        } else {
            self.repository.update(record).await?
        };
        let intents = AttendanceIntent::for_transition(&stored, from)
            .into_iter()
            .collect();
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
            status = %stored.status,
            by = %by,
            "attendance overridden"
        );
        Ok(stored)
    }

    pub async fn flag(&self, command: FlagRecord) -> Result<AttendanceRecord, ApplicationError> {
        if !command.actor.can_flag() {
            return Err(ApplicationError::Forbidden(format!(
                "{} may not flag attendance",
                command.actor.user_id
            )));
        }
        let reason = command.reason.trim();
        if reason.is_empty() {
            return Err(ApplicationError::Invalid {
                field: "reason".into(),
                message: "a flag needs a reason".into(),
            });
        }
        let by = command.actor.user_id.as_str();
        let mut record = self
            .repository
            .find(&command.employee_id, command.date)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!(
                    "attendance for {} on {}",
                    command.employee_id, command.date
                ))
            })?;
        record.flagged_reason = Some(reason.to_string());
        record.flagged_by = Some(by.to_string());
        record.flagged_at = Some(command.at);
        record.touch(by, command.at);
        record.add_remark(by, command.at, format!("Flagged: {reason}"));
        let stored = self.repository.update(record).await?;
        tracing::info!(
            employee_id = %stored.employee_id,
            date = %stored.date,
            by = %by,
            "attendance flagged"
        );
        Ok(stored)
    }

    fn refinalize(&self, record: &mut AttendanceRecord, policy: Option<&ShiftPolicy>) {
        match finalize_record(record, policy, &self.fallback) {
            Ok(_) => {}
            Err(FinalizeError::MissingClockIn) => {
                record.status = AttendanceStatus::Absent;
                record.half_day_type = None;
                record.status_reason = Some("No clock-in after override".into());
            }
            Err(e @ FinalizeError::MissingClockOut) => {
                tracing::warn!(
                    employee_id = %record.employee_id,
                    date = %record.date,
                    error = %e,
                    "override asked to refinalize an open session; status kept"
                );
            }
        }
    }
}

fn apply_patch(record: &mut AttendanceRecord, patch: &RecordPatch) {
    if patch.clear_clock_in {
        record.clock_in = None;
    }
    if patch.clock_in.is_some() {
        record.clock_in = patch.clock_in;
    }
    if patch.clear_clock_out {
        record.clock_out = None;
    }
    if patch.clock_out.is_some() {
        record.clock_out = patch.clock_out;
    }
    if let Some(status) = patch.status {
        record.status = status;
    }
    if patch.status_reason.is_some() {
        record.status_reason = patch.status_reason.clone();
    }
    if patch.half_day_type.is_some() {
        record.half_day_type = patch.half_day_type;
    }
    if let Some(work_mode) = patch.work_mode {
        record.work_mode = work_mode;
    }
    if patch.location.is_some() {
        record.location = patch.location.clone();
    }
}

/// Keeps the stored totals in line with overridden times.
fn recompute_totals(record: &mut AttendanceRecord) {
    if let (Some(clock_in), Some(clock_out)) = (record.clock_in, record.clock_out) {
        let work = final_snapshot(clock_in, clock_out, &record.break_sessions);
        apply_work_time(record, &work);
    }
}
