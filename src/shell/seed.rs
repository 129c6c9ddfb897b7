// Startup seed for the in-memory collaborators: roster, shift assignments,
// approved leave and company holidays.

use crate::modules::attendance::core::shift_policy::ShiftPolicy;
use crate::shell::state::InMemoryBackends;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub employees: Vec<String>,
    pub shift_assignments: Vec<SeedAssignment>,
    pub leaves: Vec<SeedLeave>,
    pub holidays: Vec<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SeedAssignment {
    pub employee_id: String,
    pub from: NaiveDate,
    pub until: Option<NaiveDate>,
    pub policy: ShiftPolicy,
}

#[derive(Debug, Deserialize)]
pub struct SeedLeave {
    pub employee_id: String,
    pub date: NaiveDate,
}

pub async fn load_seed_file(path: &Path, backends: &InMemoryBackends) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let seed: Seed = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;
    apply_seed(seed, backends).await
}

pub async fn apply_seed(seed: Seed, backends: &InMemoryBackends) -> anyhow::Result<()> {
    for employee_id in &seed.employees {
        backends.directory.enroll(employee_id.as_str()).await;
    }
    for assignment in seed.shift_assignments {
        backends
            .shifts
            .assign(
                assignment.employee_id,
                assignment.from,
                assignment.until,
                assignment.policy,
            )
            .await?;
    }
    for leave in seed.leaves {
        backends
            .calendar
            .approve_leave(leave.employee_id, leave.date)
            .await;
    }
    for holiday in seed.holidays {
        backends.calendar.declare_holiday(holiday).await;
    }
    tracing::info!(
        employees = seed.employees.len(),
        "seeded in-memory collaborators"
    );
    Ok(())
}

#[cfg(test)]
mod seed_tests {
    use super::*;
    use crate::modules::attendance::adapters::outbound::collaborators::{
        DayCalendar, EmployeeDirectory, ShiftPolicyProvider,
    };
    use rstest::rstest;

    const SEED: &str = r#"{
        "employees": ["emp-0001"],
        "shift_assignments": [{
            "employee_id": "emp-0001",
            "from": "2024-01-01",
            "until": null,
            "policy": {
                "shift_id": "general",
                "shift_start_time": "09:00:00",
                "shift_end_time": "18:00:00",
                "full_day_hours": 8.0,
                "half_day_hours": 4.0,
                "weekly_off_days": ["Sat", "Sun"]
            }
        }],
        "leaves": [{"employee_id": "emp-0001", "date": "2024-03-05"}],
        "holidays": ["2024-03-08"]
    }"#;

    #[rstest]
    #[tokio::test]
    async fn it_should_load_every_section_of_the_seed() {
        let backends = InMemoryBackends::new();
        let seed: Seed = serde_json::from_str(SEED).unwrap();
        apply_seed(seed, &backends).await.expect("seed failed");

        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(
            backends.directory.active_employee_ids(day).await.unwrap(),
            vec!["emp-0001".to_string()]
        );
        let policy = backends
            .shifts
            .active_policy("emp-0001", day)
            .await
            .unwrap()
            .expect("policy missing");
        assert_eq!(policy.grace_period_minutes, 15);
        assert!(
            backends
                .calendar
                .is_on_approved_leave("emp-0001", NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
                .await
                .unwrap()
        );
        assert!(
            backends
                .calendar
                .is_company_holiday(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap())
                .await
                .unwrap()
        );
    }
}
