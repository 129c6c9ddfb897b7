use async_trait::async_trait;
use serde_json::Value as Json;
use thiserror::Error;

/// One message waiting to be relayed to audit logging and notification
/// fan-out. `(aggregate_id, sequence)` identifies it.
#[derive(Debug, Clone)]
pub struct OutboxRow {
    pub event_id: String,
    pub topic: String,
    pub event_type: String,
    pub event_version: i32,
    pub aggregate_id: String,
    pub sequence: i64,
    pub occurred_at: i64,
    pub payload: Json,
}

#[derive(Debug, Error)]
pub enum OutboxError {
    #[error("duplicate outbox row for {aggregate_id} #{sequence}")]
    Duplicate { aggregate_id: String, sequence: i64 },

    #[error("payload could not be encoded: {0}")]
    Encoding(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait DomainOutbox: Send + Sync {
    async fn enqueue(&self, row: OutboxRow) -> Result<(), OutboxError>;
}

pub mod in_memory;
