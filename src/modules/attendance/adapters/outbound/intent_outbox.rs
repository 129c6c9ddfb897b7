use crate::modules::attendance::core::intents::AttendanceIntent;
use crate::shared::infrastructure::intent_outbox::{DomainOutbox, OutboxError, OutboxRow};
use uuid::Uuid;

pub const STATUS_CHANGED_EVENT: &str = "AttendanceStatusChanged";

/// Translate a list of domain intents into outbox rows and enqueue them.
/// `version` is the record's stored version after the write that produced
/// the intents; it keys the row so a replayed write cannot publish twice.
pub async fn dispatch_intents(
    outbox: &impl DomainOutbox,
    aggregate_id: &str,
    version: i64,
    topic: &str,
    intents: Vec<AttendanceIntent>,
) -> Result<(), OutboxError> {
    for intent in intents {
        match intent {
            AttendanceIntent::PublishStatusChanged { payload } => {
                let occurred_at = payload.changed_at.and_utc().timestamp_millis();
                let payload = serde_json::to_value(payload)
                    .map_err(|e| OutboxError::Encoding(e.to_string()))?;
                outbox
                    .enqueue(OutboxRow {
                        event_id: Uuid::now_v7().to_string(),
                        topic: topic.to_string(),
                        event_type: STATUS_CHANGED_EVENT.to_string(),
                        event_version: 1,
                        aggregate_id: aggregate_id.to_string(),
                        sequence: version,
                        occurred_at,
                        payload,
                    })
                    .await?;
            }
        }
    }
    Ok(())
}
