//! Entities stored in the resource index, one module per entity kind.

mod account;
pub use account::{Account, AccountKey, Contract};

mod block;
pub use block::{Block, CollectionGuarantee};

mod event;
pub use event::Event;

mod storage;
pub use storage::{AccountStorage, StorageDomain};

mod transaction;
pub use transaction::{ProposalKey, Signature, Transaction, TransactionArgument};
