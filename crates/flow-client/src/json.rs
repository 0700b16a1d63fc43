//! Access API REST response bodies.
//!
//! The API encodes 64-bit integers as strings and scripts, arguments and event payloads as
//! base64. These structs mirror the wire format, the `TryFrom` impls turn them into the
//! [`chain`](crate::chain) types.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use flowdex_types::{ExecutionStatus, ProposalKey, Signature, StorageDomain};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    ChainAccount, ChainAccountKey, ChainBlock, ChainCollection, ChainCollectionGuarantee,
    ChainEvent, ChainTransaction, ChainTransactionStatus, Error, StorageItem,
};

/// Accepts both `"42"` and `42`.
fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        String(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(number) => Ok(number),
        Raw::String(s) => s.parse().map_err(de::Error::custom),
    }
}

fn decode_base64_string(encoded: &str) -> Result<String, Error> {
    Ok(String::from_utf8(base64::decode(encoded)?)?)
}

fn decode_base64_json(encoded: &str) -> Result<Value, Error> {
    Ok(serde_json::from_slice(&base64::decode(encoded)?)?)
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    #[serde(default)]
    pub payload: Option<BlockPayload>,
}

#[derive(Debug, Deserialize)]
pub struct BlockHeader {
    pub id: String,
    pub parent_id: String,
    #[serde(deserialize_with = "number")]
    pub height: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub parent_voter_signature: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BlockPayload {
    #[serde(default)]
    pub collection_guarantees: Vec<CollectionGuarantee>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionGuarantee {
    pub collection_id: String,
    #[serde(default)]
    pub signer_ids: Vec<String>,
    #[serde(default)]
    pub signer_indices: Option<String>,
}

impl From<CollectionGuarantee> for ChainCollectionGuarantee {
    fn from(guarantee: CollectionGuarantee) -> Self {
        let mut signer_ids = guarantee.signer_ids;
        if signer_ids.is_empty() {
            signer_ids.extend(guarantee.signer_indices);
        }

        Self {
            collection_id: guarantee.collection_id,
            signer_ids,
        }
    }
}

impl From<Block> for ChainBlock {
    fn from(block: Block) -> Self {
        let payload = block.payload.unwrap_or_default();

        Self {
            id: block.header.id,
            parent_id: block.header.parent_id,
            height: block.header.height,
            timestamp: block.header.timestamp,
            collection_guarantees: payload
                .collection_guarantees
                .into_iter()
                .map(Into::into)
                .collect(),
            signatures: block.header.parent_voter_signature.into_iter().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub transactions: Vec<CollectionTransaction>,
    #[serde(default, rename = "_expandable")]
    pub expandable: CollectionExpandable,
}

#[derive(Debug, Deserialize)]
pub struct CollectionTransaction {
    pub id: String,
}

/// Transaction links, present when transactions were not expanded.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionExpandable {
    #[serde(default)]
    pub transactions: Vec<String>,
}

impl From<Collection> for ChainCollection {
    fn from(collection: Collection) -> Self {
        let transaction_ids = if collection.transactions.is_empty() {
            collection
                .expandable
                .transactions
                .iter()
                .filter_map(|link| link.rsplit('/').next())
                .map(str::to_owned)
                .collect()
        } else {
            collection
                .transactions
                .into_iter()
                .map(|transaction| transaction.id)
                .collect()
        };

        Self {
            id: collection.id,
            transaction_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonProposalKey {
    pub address: String,
    #[serde(deserialize_with = "number")]
    pub key_index: u32,
    #[serde(deserialize_with = "number")]
    pub sequence_number: u64,
}

#[derive(Debug, Deserialize)]
pub struct JsonSignature {
    pub address: String,
    #[serde(deserialize_with = "number")]
    pub key_index: u32,
    pub signature: String,
}

impl TryFrom<JsonSignature> for Signature {
    type Error = Error;

    fn try_from(signature: JsonSignature) -> Result<Self, Self::Error> {
        Ok(Self {
            address: signature.address.parse()?,
            key_index: signature.key_index,
            signature: signature.signature,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub script: String,
    #[serde(default)]
    pub arguments: Vec<String>,
    pub reference_block_id: String,
    #[serde(deserialize_with = "number")]
    pub gas_limit: u64,
    pub payer: String,
    pub proposal_key: JsonProposalKey,
    #[serde(default)]
    pub authorizers: Vec<String>,
    #[serde(default)]
    pub payload_signatures: Vec<JsonSignature>,
    #[serde(default)]
    pub envelope_signatures: Vec<JsonSignature>,
}

impl TryFrom<Transaction> for ChainTransaction {
    type Error = Error;

    fn try_from(transaction: Transaction) -> Result<Self, Self::Error> {
        Ok(Self {
            id: transaction.id,
            script: decode_base64_string(&transaction.script)?,
            arguments: transaction
                .arguments
                .iter()
                .map(|argument| decode_base64_json(argument))
                .collect::<Result<_, _>>()?,
            reference_block_id: transaction.reference_block_id,
            gas_limit: transaction.gas_limit,
            payer: transaction.payer.parse()?,
            proposal_key: ProposalKey {
                address: transaction.proposal_key.address.parse()?,
                key_index: transaction.proposal_key.key_index,
                sequence_number: transaction.proposal_key.sequence_number,
            },
            authorizers: transaction
                .authorizers
                .iter()
                .map(|address| address.parse())
                .collect::<Result<_, _>>()?,
            payload_signatures: transaction
                .payload_signatures
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            envelope_signatures: transaction
                .envelope_signatures
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub transaction_id: String,
    #[serde(deserialize_with = "number")]
    pub transaction_index: u64,
    #[serde(deserialize_with = "number")]
    pub event_index: u64,
    pub payload: String,
}

impl TryFrom<Event> for ChainEvent {
    type Error = Error;

    fn try_from(event: Event) -> Result<Self, Self::Error> {
        Ok(Self {
            payload: decode_base64_json(&event.payload)?,
            event_type: event.event_type,
            transaction_id: event.transaction_id,
            transaction_index: event.transaction_index,
            event_index: event.event_index,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TransactionResult {
    #[serde(default)]
    pub block_id: String,
    pub status: String,
    #[serde(deserialize_with = "number")]
    pub status_code: i64,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl TryFrom<TransactionResult> for ChainTransactionStatus {
    type Error = Error;

    fn try_from(result: TransactionResult) -> Result<Self, Self::Error> {
        Ok(Self {
            execution_status: result
                .status
                .parse::<ExecutionStatus>()
                .unwrap_or_default(),
            block_id: result.block_id,
            status_code: result.status_code,
            error_message: result.error_message,
            events: result
                .events
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountKey {
    #[serde(deserialize_with = "number")]
    pub index: u32,
    pub public_key: String,
    pub signing_algorithm: String,
    pub hashing_algorithm: String,
    #[serde(deserialize_with = "number")]
    pub sequence_number: u64,
    #[serde(deserialize_with = "number")]
    pub weight: u32,
    pub revoked: bool,
}

impl From<AccountKey> for ChainAccountKey {
    fn from(key: AccountKey) -> Self {
        Self {
            index: key.index,
            public_key: key.public_key,
            sign_algo: key.signing_algorithm,
            hash_algo: key.hashing_algorithm,
            weight: key.weight,
            sequence_number: key.sequence_number,
            revoked: key.revoked,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Account {
    pub address: String,
    #[serde(deserialize_with = "number")]
    pub balance: u64,
    #[serde(default)]
    pub keys: Vec<AccountKey>,
    /// Contract code by name, base64 encoded.
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

impl TryFrom<Account> for ChainAccount {
    type Error = Error;

    fn try_from(account: Account) -> Result<Self, Self::Error> {
        Ok(Self {
            address: account.address.parse()?,
            balance: account.balance,
            code: String::new(),
            keys: account.keys.into_iter().map(Into::into).collect(),
            contracts: account
                .contracts
                .iter()
                .map(|(name, code)| Ok((name.clone(), decode_base64_string(code)?)))
                .collect::<Result<_, Error>>()?,
        })
    }
}

/// One entry returned by the storage enumeration script, after JSON-Cadence decoding.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEntry {
    pub domain: String,
    /// Full path, e.g. `/storage/flowTokenVault`.
    pub path: String,
    #[serde(default)]
    pub target_path: Option<String>,
    #[serde(rename = "type", default)]
    pub type_id: Option<String>,
}

impl TryFrom<StorageEntry> for StorageItem {
    type Error = Error;

    fn try_from(entry: StorageEntry) -> Result<Self, Self::Error> {
        let domain: StorageDomain = entry
            .domain
            .parse()
            .map_err(Error::UnexpectedStructure)?;

        let prefix = format!("/{domain}/");
        let path = entry
            .path
            .strip_prefix(&prefix)
            .unwrap_or(&entry.path)
            .to_owned();

        Ok(Self {
            domain,
            path,
            target_path: entry.target_path,
            data: serde_json::json!({ "type": entry.type_id }),
        })
    }
}

/// Script execution request body.
#[derive(Debug, serde::Serialize)]
pub struct ScriptRequest {
    /// Base64 encoded Cadence source.
    pub script: String,
    /// Base64 encoded JSON-Cadence arguments.
    pub arguments: Vec<String>,
}

impl ScriptRequest {
    pub fn new(script: &str, arguments: &[Value]) -> Self {
        Self {
            script: base64::encode(script),
            arguments: arguments
                .iter()
                .map(|argument| base64::encode(argument.to_string()))
                .collect(),
        }
    }
}
