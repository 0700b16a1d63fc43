use serde::{Deserialize, Serialize};

use crate::{AccountOwned, Address, Resource};

/// Indexed account, keyed by its normalized address.
///
/// `keys` is replaced in full on every re-index, keys are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub address: Address,
    pub balance: u64,
    pub code: String,
    pub keys: Vec<AccountKey>,
    /// Block whose processing last re-indexed the account.
    pub block_id: String,
}

impl Resource for Account {
    const KIND: &'static str = "account";

    fn id(&self) -> &str {
        &self.id
    }
}

impl AccountOwned for Account {
    fn address(&self) -> &Address {
        &self.address
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    pub id: String,
    pub index: u32,
    pub address: Address,
    pub public_key: String,
    pub sign_algo: String,
    pub hash_algo: String,
    pub weight: u32,
    pub sequence_number: u64,
    pub revoked: bool,
    pub block_id: String,
}

impl AccountKey {
    pub fn make_id(address: &Address, index: u32) -> String {
        format!("{address}.{index}")
    }
}

impl Resource for AccountKey {
    const KIND: &'static str = "account key";

    fn id(&self) -> &str {
        &self.id
    }
}

impl AccountOwned for AccountKey {
    fn address(&self) -> &Address {
        &self.address
    }
}

/// One row per (account, contract name) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    pub address: Address,
    pub name: String,
    pub code: String,
    pub block_id: String,
}

impl Contract {
    pub fn make_id(address: &Address, name: &str) -> String {
        format!("{address}.{name}")
    }
}

impl Resource for Contract {
    const KIND: &'static str = "contract";

    fn id(&self) -> &str {
        &self.id
    }
}

impl AccountOwned for Contract {
    fn address(&self) -> &Address {
        &self.address
    }
}
