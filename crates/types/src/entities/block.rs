use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionGuarantee {
    pub collection_id: String,
    pub signer_ids: Vec<String>,
}

/// Indexed block. The id is the block hash, `height` is the ordering field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub height: u64,
    pub parent_id: String,
    pub timestamp: DateTime<Utc>,
    pub collection_guarantees: Vec<CollectionGuarantee>,
    pub signatures: Vec<String>,
}

impl Resource for Block {
    const KIND: &'static str = "block";

    fn id(&self) -> &str {
        &self.id
    }
}
