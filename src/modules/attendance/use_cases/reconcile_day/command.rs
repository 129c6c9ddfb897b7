use crate::modules::attendance::core::capability::Actor;
use chrono::NaiveDate;

/// Manual run of the nightly reconciliation for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerReconciliation {
    pub date: NaiveDate,
    pub actor: Actor,
}
