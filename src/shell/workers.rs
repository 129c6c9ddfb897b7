use crate::modules::attendance::use_cases::reconcile_day::scheduler::run_nightly;
use crate::shell::state::AppState;
use chrono::NaiveTime;
use tokio::task::JoinHandle;

pub fn spawn_nightly_reconciliation(state: &AppState, run_at: NaiveTime) -> JoinHandle<()> {
    tokio::spawn(run_nightly(
        state.reconciliation.clone(),
        state.clock.clone(),
        run_at,
    ))
}
