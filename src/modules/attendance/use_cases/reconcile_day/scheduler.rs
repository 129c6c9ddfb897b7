use crate::modules::attendance::adapters::outbound::records::AttendanceRepository;
use crate::modules::attendance::use_cases::reconcile_day::job::NightlyReconciliation;
use crate::shared::core::primitives::Clock;
use crate::shared::infrastructure::intent_outbox::DomainOutbox;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::sync::Arc;

/// First occurrence of `run_at` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, run_at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(run_at);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Sleeps until the configured local time of day, then reconciles
/// yesterday. Failures are logged and the loop keeps going.
pub async fn run_nightly<TRepo, TOutbox>(
    job: Arc<NightlyReconciliation<TRepo, TOutbox>>,
    clock: Arc<dyn Clock>,
    run_at: NaiveTime,
) where
    TRepo: AttendanceRepository + 'static,
    TOutbox: DomainOutbox + Send + Sync + 'static,
{
    loop {
        let now = clock.now();
        let next = next_run_after(now, run_at);
        tracing::info!(next_run = %next, "nightly reconciliation scheduled");
        tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

        let Some(date) = clock.today().pred_opt() else {
            tracing::error!("no previous day to reconcile");
            continue;
        };
        match job.run(date).await {
            Ok(report) if report.is_clean() => {
                tracing::info!(date = %date, "nightly reconciliation finished");
            }
            Ok(report) => {
                tracing::warn!(date = %date, phases = ?report.phases, "nightly reconciliation finished with failures");
            }
            Err(e) => {
                tracing::error!(date = %date, error = %e, "nightly reconciliation did not run");
            }
        }
    }
}
