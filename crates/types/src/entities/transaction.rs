use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Address, Resource, TransactionStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalKey {
    pub address: Address,
    pub key_index: u32,
    pub sequence_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub address: Address,
    pub key_index: u32,
    pub signature: String,
}

/// Parsed transaction argument: the JSON-Cadence type tag and the decoded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionArgument {
    #[serde(rename = "type")]
    pub type_id: String,
    pub value: Value,
}

/// Indexed transaction, keyed by the transaction hash.
///
/// `status` is overwritten until the transaction is sealed, no other field changes after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub script: String,
    pub block_id: String,
    pub reference_block_id: String,
    pub gas_limit: u64,
    pub payer: Address,
    pub proposal_key: ProposalKey,
    pub authorizers: Vec<Address>,
    pub arguments: Vec<TransactionArgument>,
    pub envelope_signatures: Vec<Signature>,
    pub payload_signatures: Vec<Signature>,
    pub status: TransactionStatus,
}

impl Resource for Transaction {
    const KIND: &'static str = "transaction";

    fn id(&self) -> &str {
        &self.id
    }
}
