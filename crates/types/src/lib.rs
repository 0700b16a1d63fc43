//! Entities produced by the Flowdex indexing pipeline and the Flow chain primitives they are
//! derived from.
//!
//! Every entity implements [`Resource`]: its id is a deterministic function of the entity's
//! natural key, so re-indexing the same logical entity always lands on the same record.

mod address;
pub use address::{Address, AddressError, ADDRESS_LENGTH};

mod resource;
pub use resource::{AccountOwned, Resource};

pub mod entities;
pub use entities::{
    Account, AccountKey, AccountStorage, Block, CollectionGuarantee, Contract, Event,
    ProposalKey, Signature, StorageDomain, Transaction, TransactionArgument,
};

mod status;
pub use status::{ExecutionStatus, GrpcStatus, TransactionStatus};

pub mod well_known;
pub use well_known::{AddressScheme, WellKnownAccount};

mod events;
pub use events::{CoreEvent, CoreEventKind};

/// Id of the synthetic block which owns entities indexed outside of the block stream (e.g. the
/// well-known accounts bootstrapped before any block creates them).
pub const NULL_BLOCK_ID: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";
