use crate::modules::attendance::core::events::v1::AttendanceStatusChangedV1;
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::status::AttendanceStatus;

/// Domain intents produced alongside a record mutation.
/// The outbound intent_outbox adapter translates these into OutboxRows.
#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceIntent {
    PublishStatusChanged { payload: AttendanceStatusChangedV1 },
}

impl AttendanceIntent {
    /// Only transitions into a FINAL status are published; live moves
    /// (break start/end, clock-out) stay internal.
    pub fn for_transition(
        record: &AttendanceRecord,
        from: Option<AttendanceStatus>,
    ) -> Option<Self> {
        if record.status.is_live() || from == Some(record.status) {
            return None;
        }
        Some(Self::PublishStatusChanged {
            payload: AttendanceStatusChangedV1::from_record(record, from),
        })
    }
}
