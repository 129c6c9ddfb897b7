// Ports onto the collaborators around the attendance core. Their failures are
// opaque to the core, so they report through `anyhow`.

use crate::modules::attendance::core::shift_policy::ShiftPolicy;
use crate::shared::core::primitives::EmployeeId;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait ShiftPolicyProvider: Send + Sync {
    /// Policy of the employee's shift assignment active on `date`.
    async fn active_policy(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Option<ShiftPolicy>>;
}

#[async_trait]
pub trait DayCalendar: Send + Sync {
    async fn is_on_approved_leave(&self, employee_id: &str, date: NaiveDate)
    -> anyhow::Result<bool>;

    async fn is_company_holiday(&self, date: NaiveDate) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Employees expected to have an attendance record on `date`.
    async fn active_employee_ids(&self, date: NaiveDate) -> anyhow::Result<Vec<EmployeeId>>;
}
