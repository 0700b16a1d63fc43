//! Chain data as returned by the access API, before it is mapped into indexed entities.
//!
//! Transaction arguments and event payloads are kept as raw JSON-Cadence values; decoding them
//! is left to the consumer so that a single malformed value only fails the entity it belongs to.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use flowdex_types::{Address, ExecutionStatus, ProposalKey, Signature, StorageDomain};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainCollectionGuarantee {
    pub collection_id: String,
    pub signer_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBlock {
    pub id: String,
    pub parent_id: String,
    pub height: u64,
    pub timestamp: DateTime<Utc>,
    pub collection_guarantees: Vec<ChainCollectionGuarantee>,
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainCollection {
    pub id: String,
    pub transaction_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTransaction {
    pub id: String,
    pub script: String,
    /// Raw JSON-Cadence values.
    pub arguments: Vec<Value>,
    pub reference_block_id: String,
    pub gas_limit: u64,
    pub payer: Address,
    pub proposal_key: ProposalKey,
    pub authorizers: Vec<Address>,
    pub payload_signatures: Vec<Signature>,
    pub envelope_signatures: Vec<Signature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEvent {
    pub event_type: String,
    pub transaction_id: String,
    pub transaction_index: u64,
    pub event_index: u64,
    /// Raw JSON-Cadence event value.
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTransactionStatus {
    /// Empty until the transaction is included in a block.
    pub block_id: String,
    pub execution_status: ExecutionStatus,
    /// Raw status code, see [`flowdex_types::GrpcStatus::from_raw`].
    pub status_code: i64,
    pub error_message: String,
    pub events: Vec<ChainEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainAccountKey {
    pub index: u32,
    pub public_key: String,
    pub sign_algo: String,
    pub hash_algo: String,
    pub weight: u32,
    pub sequence_number: u64,
    pub revoked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainAccount {
    pub address: Address,
    pub balance: u64,
    /// Legacy account code, empty on current networks.
    pub code: String,
    pub keys: Vec<ChainAccountKey>,
    /// Deployed contracts by name.
    pub contracts: BTreeMap<String, String>,
}

/// One path found while enumerating an account's storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageItem {
    pub domain: StorageDomain,
    /// Path identifier without the domain, e.g. `flowTokenVault`.
    pub path: String,
    /// Target of a capability link, if the path holds one.
    pub target_path: Option<String>,
    pub data: Value,
}
