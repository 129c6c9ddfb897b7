use crate::modules::attendance::adapters::outbound::collaborators_in_memory::{
    InMemoryDayCalendar, InMemoryEmployeeDirectory, InMemoryShiftAssignments,
};
use crate::modules::attendance::adapters::outbound::records_in_memory::InMemoryAttendanceRecords;
use crate::modules::attendance::core::shift_policy::FallbackThresholds;
use crate::modules::attendance::use_cases::monthly_summary::handler::AttendanceQueries;
use crate::modules::attendance::use_cases::override_record::handler::OverrideRecordHandler;
use crate::modules::attendance::use_cases::reconcile_day::job::NightlyReconciliation;
use crate::modules::attendance::use_cases::resolve_correction::handler::ResolveCorrectionHandler;
use crate::modules::attendance::use_cases::track_attendance::handler::TrackAttendanceHandler;
use crate::shared::core::primitives::Clock;
use crate::shared::infrastructure::intent_outbox::in_memory::InMemoryDomainOutbox;
use std::sync::Arc;

pub type Records = InMemoryAttendanceRecords;
pub type Outbox = InMemoryDomainOutbox;

/// Concrete in-memory backends behind the ports.
#[derive(Default)]
pub struct InMemoryBackends {
    pub records: Arc<InMemoryAttendanceRecords>,
    pub outbox: Arc<InMemoryDomainOutbox>,
    pub shifts: Arc<InMemoryShiftAssignments>,
    pub calendar: Arc<InMemoryDayCalendar>,
    pub directory: Arc<InMemoryEmployeeDirectory>,
}

impl InMemoryBackends {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub clock: Arc<dyn Clock>,
    pub track_handler: Arc<TrackAttendanceHandler<Records, Outbox>>,
    pub correction_handler: Arc<ResolveCorrectionHandler<Records, Outbox>>,
    pub override_handler: Arc<OverrideRecordHandler<Records, Outbox>>,
    pub reconciliation: Arc<NightlyReconciliation<Records, Outbox>>,
    pub queries: Arc<AttendanceQueries<Records>>,
}

impl AppState {
    pub fn in_memory(
        backends: &InMemoryBackends,
        clock: Arc<dyn Clock>,
        fallback: FallbackThresholds,
        topic: &str,
    ) -> Self {
        let track_handler = Arc::new(TrackAttendanceHandler::new(
            topic,
            backends.records.clone(),
            backends.outbox.clone(),
            backends.shifts.clone(),
            fallback,
        ));
        let correction_handler = Arc::new(ResolveCorrectionHandler::new(
            topic,
            backends.records.clone(),
            backends.outbox.clone(),
            backends.shifts.clone(),
            fallback,
        ));
        let override_handler = Arc::new(OverrideRecordHandler::new(
            topic,
            backends.records.clone(),
            backends.outbox.clone(),
            backends.shifts.clone(),
            fallback,
        ));
        let reconciliation = Arc::new(NightlyReconciliation::new(
            topic,
            backends.records.clone(),
            backends.outbox.clone(),
            backends.shifts.clone(),
            backends.calendar.clone(),
            backends.directory.clone(),
            clock.clone(),
            fallback,
        ));
        let queries = Arc::new(AttendanceQueries::new(
            backends.records.clone(),
            clock.clone(),
        ));
        Self {
            clock,
            track_handler,
            correction_handler,
            override_handler,
            reconciliation,
            queries,
        }
    }
}
