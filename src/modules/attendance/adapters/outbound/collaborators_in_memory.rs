// In memory collaborators for tests and local development.

use crate::modules::attendance::adapters::outbound::collaborators::{
    DayCalendar, EmployeeDirectory, ShiftPolicyProvider,
};
use crate::modules::attendance::core::shift_policy::ShiftPolicy;
use crate::shared::core::primitives::EmployeeId;
use chrono::NaiveDate;
use std::collections::HashSet;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct ShiftAssignment {
    employee_id: EmployeeId,
    from: NaiveDate,
    until: Option<NaiveDate>,
    policy: ShiftPolicy,
}

impl ShiftAssignment {
    fn covers(&self, date: NaiveDate) -> bool {
        self.from <= date && self.until.is_none_or(|until| date <= until)
    }

    fn overlaps(&self, from: NaiveDate, until: Option<NaiveDate>) -> bool {
        let starts_before_other_ends = until.is_none_or(|until| self.from <= until);
        let ends_after_other_starts = self.until.is_none_or(|own| from <= own);
        starts_before_other_ends && ends_after_other_starts
    }
}

/// Time-ranged shift assignments, non-overlapping per employee.
#[derive(Default)]
pub struct InMemoryShiftAssignments {
    assignments: RwLock<Vec<ShiftAssignment>>,
    is_offline: bool,
}

impl InMemoryShiftAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn assign(
        &self,
        employee_id: impl Into<EmployeeId>,
        from: NaiveDate,
        until: Option<NaiveDate>,
        policy: ShiftPolicy,
    ) -> anyhow::Result<()> {
        let employee_id = employee_id.into();
        let mut guard = self.assignments.write().await;
        if guard
            .iter()
            .any(|a| a.employee_id == employee_id && a.overlaps(from, until))
        {
            anyhow::bail!("shift assignment for {employee_id} overlaps an existing one");
        }
        guard.push(ShiftAssignment {
            employee_id,
            from,
            until,
            policy,
        });
        Ok(())
    }
}

#[async_trait::async_trait]
impl ShiftPolicyProvider for InMemoryShiftAssignments {
    async fn active_policy(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<Option<ShiftPolicy>> {
        if self.is_offline {
            anyhow::bail!("Shift configuration offline");
        }
        Ok(self
            .assignments
            .read()
            .await
            .iter()
            .find(|a| a.employee_id == employee_id && a.covers(date))
            .map(|a| a.policy.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryDayCalendar {
    leaves: RwLock<HashSet<(EmployeeId, NaiveDate)>>,
    holidays: RwLock<HashSet<NaiveDate>>,
}

impl InMemoryDayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn approve_leave(&self, employee_id: impl Into<EmployeeId>, date: NaiveDate) {
        self.leaves.write().await.insert((employee_id.into(), date));
    }

    pub async fn declare_holiday(&self, date: NaiveDate) {
        self.holidays.write().await.insert(date);
    }
}

#[async_trait::async_trait]
impl DayCalendar for InMemoryDayCalendar {
    async fn is_on_approved_leave(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<bool> {
        Ok(self
            .leaves
            .read()
            .await
            .contains(&(employee_id.to_string(), date)))
    }

    async fn is_company_holiday(&self, date: NaiveDate) -> anyhow::Result<bool> {
        Ok(self.holidays.read().await.contains(&date))
    }
}

#[derive(Default)]
pub struct InMemoryEmployeeDirectory {
    employees: RwLock<Vec<EmployeeId>>,
}

impl InMemoryEmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enroll(&self, employee_id: impl Into<EmployeeId>) {
        let employee_id = employee_id.into();
        let mut guard = self.employees.write().await;
        if !guard.contains(&employee_id) {
            guard.push(employee_id);
        }
    }
}

#[async_trait::async_trait]
impl EmployeeDirectory for InMemoryEmployeeDirectory {
    async fn active_employee_ids(&self, _date: NaiveDate) -> anyhow::Result<Vec<EmployeeId>> {
        Ok(self.employees.read().await.clone())
    }
}

#[cfg(test)]
mod in_memory_collaborators_tests {
    use super::*;
    use crate::tests::fixtures::policies::ShiftPolicyBuilder;
    use crate::tests::fixtures::records::day;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_resolve_the_assignment_covering_the_date() {
        let shifts = InMemoryShiftAssignments::new();
        let early = ShiftPolicyBuilder::new().id("early").hours(6, 14).build();
        let late = ShiftPolicyBuilder::new().id("late").hours(14, 22).build();
        shifts
            .assign("emp-0001", day(), Some(day() + Duration::days(6)), early)
            .await
            .unwrap();
        shifts
            .assign("emp-0001", day() + Duration::days(7), None, late)
            .await
            .unwrap();

        let first = shifts.active_policy("emp-0001", day()).await.unwrap();
        let later = shifts
            .active_policy("emp-0001", day() + Duration::days(30))
            .await
            .unwrap();
        assert_eq!(first.unwrap().shift_id, "early");
        assert_eq!(later.unwrap().shift_id, "late");
        assert!(
            shifts
                .active_policy("emp-0001", day() - Duration::days(1))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_overlapping_assignments() {
        let shifts = InMemoryShiftAssignments::new();
        let policy = ShiftPolicyBuilder::new().build();
        shifts
            .assign("emp-0001", day(), None, policy.clone())
            .await
            .unwrap();
        let result = shifts
            .assign("emp-0001", day() + Duration::days(3), None, policy.clone())
            .await;
        assert!(result.is_err());
        assert!(shifts.assign("emp-0002", day(), None, policy).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_answer_leave_and_holiday_questions() {
        let calendar = InMemoryDayCalendar::new();
        calendar.approve_leave("emp-0001", day()).await;
        calendar.declare_holiday(day() + Duration::days(1)).await;
        assert!(calendar.is_on_approved_leave("emp-0001", day()).await.unwrap());
        assert!(!calendar.is_on_approved_leave("emp-0002", day()).await.unwrap());
        assert!(
            calendar
                .is_company_holiday(day() + Duration::days(1))
                .await
                .unwrap()
        );
    }
}
