use crate::modules::attendance::adapters::outbound::records::AttendanceRepository;
use crate::modules::attendance::core::capability::Actor;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::use_cases::errors::ApplicationError;
use crate::modules::attendance::use_cases::monthly_summary::aggregate::summarize;
use crate::modules::attendance::use_cases::monthly_summary::projection::MonthlySummary;
use crate::shared::core::primitives::Clock;
use chrono::NaiveDate;
use std::sync::Arc;

/// Read side: single-record lookup and the monthly aggregate.
pub struct AttendanceQueries<TRepo>
where
    TRepo: AttendanceRepository + 'static,
{
    repository: Arc<TRepo>,
    clock: Arc<dyn Clock>,
}

impl<TRepo> AttendanceQueries<TRepo>
where
    TRepo: AttendanceRepository + 'static,
{
    pub fn new(repository: Arc<TRepo>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn record(
        &self,
        actor: &Actor,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, ApplicationError> {
        ensure_can_view(actor, employee_id)?;
        Ok(self.repository.find(employee_id, date).await?)
    }

    pub async fn monthly_summary(
        &self,
        actor: &Actor,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlySummary, ApplicationError> {
        ensure_can_view(actor, employee_id)?;
        if !(1..=12).contains(&month) {
            return Err(ApplicationError::Invalid {
                field: "month".into(),
                message: format!("month must be between 1 and 12, got {month}"),
            });
        }
        let records = self
            .repository
            .list_for_month(employee_id, year, month)
            .await?;
        Ok(summarize(employee_id, year, month, &records, self.clock.now()))
    }
}

fn ensure_can_view(actor: &Actor, employee_id: &str) -> Result<(), ApplicationError> {
    if actor.can_view(employee_id) {
        Ok(())
    } else {
        Err(ApplicationError::Forbidden(format!(
            "{} may not view attendance of {employee_id}",
            actor.user_id
        )))
    }
}
