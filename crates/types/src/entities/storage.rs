use core::fmt::{self, Display};
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AccountOwned, Address, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageDomain {
    Storage,
    Public,
    Private,
}

impl Display for StorageDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Storage => "storage",
            Self::Public => "public",
            Self::Private => "private",
        })
    }
}

impl FromStr for StorageDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "storage" => Ok(Self::Storage),
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(format!("unknown storage domain: {other}")),
        }
    }
}

/// Item found in an account's storage. Re-derived for every known account after each block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStorage {
    pub id: String,
    pub address: Address,
    pub domain: StorageDomain,
    pub path: String,
    pub target_path: Option<String>,
    pub data: Value,
}

impl AccountStorage {
    pub fn make_id(address: &Address, domain: StorageDomain, path: &str) -> String {
        format!("{address}/{domain}/{path}")
    }
}

impl Resource for AccountStorage {
    const KIND: &'static str = "account storage";

    fn id(&self) -> &str {
        &self.id
    }
}

impl AccountOwned for AccountStorage {
    fn address(&self) -> &Address {
        &self.address
    }
}
