use flowdex_storage::Stored;
use flowdex_types::{
    Account, AccountKey, AccountStorage, Block, Contract, Event, Transaction,
};

mod rpc;
pub use rpc::*;

/// Error code returned when the requested entity isn't indexed.
pub const NOT_FOUND_CODE: i32 = -32001;

pub type AccountResponse = Stored<Account>;
pub type AccountKeyResponse = Stored<AccountKey>;
pub type ContractResponse = Stored<Contract>;
pub type BlockResponse = Stored<Block>;
pub type TransactionResponse = Stored<Transaction>;
pub type EventResponse = Stored<Event>;
pub type StorageItemResponse = Stored<AccountStorage>;
