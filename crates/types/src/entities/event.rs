use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Resource;

/// Indexed event. `event_index` is the position inside the emitting transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub transaction_id: String,
    pub block_id: String,
    pub transaction_index: u64,
    pub event_index: u64,
    pub data: Value,
}

impl Event {
    pub fn make_id(transaction_id: &str, event_index: u64) -> String {
        format!("{transaction_id}.{event_index}")
    }
}

impl Resource for Event {
    const KIND: &'static str = "event";

    fn id(&self) -> &str {
        &self.id
    }
}
