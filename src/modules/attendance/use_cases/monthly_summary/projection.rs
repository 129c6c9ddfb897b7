use async_graphql::SimpleObject;
use serde::Serialize;

/// Month-to-date attendance figures for one employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, SimpleObject)]
pub struct MonthlySummary {
    pub employee_id: String,
    pub year: i32,
    pub month: u32,

    pub present_days: u32,
    pub half_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub holiday_days: u32,
    pub weekend_days: u32,
    pub pending_correction_days: u32,
    /// Days not finalized yet: open sessions and clocked-out days awaiting
    /// the nightly run.
    pub provisional_days: u32,

    pub total_work_minutes: i64,
    pub total_work_hours: f64,
    pub total_overtime_minutes: i64,
    pub total_overtime_hours: f64,

    pub late_days: u32,
    pub total_late_minutes: i64,
    pub early_departures: u32,
    pub total_early_exit_minutes: i64,

    /// Set when an open session was counted up to "now" or a closed day is
    /// not finalized yet; the totals are provisional.
    pub includes_live_session: bool,
}
