use crate::modules::attendance::adapters::outbound::collaborators::ShiftPolicyProvider;
use crate::modules::attendance::adapters::outbound::intent_outbox::dispatch_intents;
use crate::modules::attendance::adapters::outbound::records::AttendanceRepository;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::shift_policy::FallbackThresholds;
use crate::modules::attendance::use_cases::errors::ApplicationError;
use crate::modules::attendance::use_cases::resolve_correction::command::{
    DecideCorrection, RequestCorrection,
};
use crate::modules::attendance::use_cases::resolve_correction::decide::{
    DecideError, Decision, decide_correction, decide_request,
};
use crate::shared::infrastructure::intent_outbox::DomainOutbox;
use chrono::NaiveDate;
use std::sync::Arc;

pub struct ResolveCorrectionHandler<TRepo, TOutbox>
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

impl<TRepo, TOutbox> ResolveCorrectionHandler<TRepo, TOutbox>
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

    pub async fn request(
        &self,
        command: RequestCorrection,
    ) -> Result<AttendanceRecord, ApplicationError> {
        if !command.actor.can_act_for(&command.employee_id) {
            return Err(ApplicationError::Forbidden(format!(
                "{} may not request corrections for {}",
                command.actor.user_id, command.employee_id
            )));
        }
        let record = self.load(&command.employee_id, command.date).await?;
        let decision = decide_request(&record, &command);
        let stored = self.apply(decision).await?;
        tracing::info!(
            employee_id = %stored.employee_id,
            date = %stored.date,
            "correction requested"
        );
        Ok(stored)
    }

    pub async fn decide(
        &self,
        command: DecideCorrection,
    ) -> Result<AttendanceRecord, ApplicationError> {
        if !command.actor.can_decide_corrections() {
            return Err(ApplicationError::Forbidden(format!(
                "{} may not decide corrections",
                command.actor.user_id
            )));
        }
        let record = self.load(&command.employee_id, command.date).await?;
        let policy = self
            .shifts
            .active_policy(&command.employee_id, command.date)
            .await?;
        let decision = decide_correction(&record, &command, policy.as_ref(), &self.fallback);
        let stored = self.apply(decision).await?;
        tracing::info!(
            employee_id = %stored.employee_id,
            date = %stored.date,
            status = %stored.status,
            by = %command.actor.user_id,
            "correction decided"
        );
        Ok(stored)
    }

    async fn load(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<AttendanceRecord, ApplicationError> {
        self.repository
            .find(employee_id, date)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("attendance for {employee_id} on {date}")))
    }

    async fn apply(&self, decision: Decision) -> Result<AttendanceRecord, ApplicationError> {
        match decision {
            Decision::Accepted { record, intents } => {
                let stored = self.repository.update(record).await?;
                dispatch_intents(
                    &*self.outbox,
                    &stored.aggregate_id(),
                    stored.version,
                    &self.topic,
                    intents,
                )
                .await?;
                Ok(stored)
            }
            Decision::Rejected {
                reason: DecideError::Invariant(violation),
            } => Err(violation.into()),
            Decision::Rejected { reason } => {
                tracing::warn!(reason = %reason, "correction refused");
                Err(ApplicationError::Denied(reason.to_string()))
            }
        }
    }
}
