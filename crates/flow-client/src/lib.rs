//! Access to a Flow chain through the Access REST API.
//!
//! [`GatewayApi`] and [`AccountStorageApi`] are the seams the indexer depends on; [`FlowClient`]
//! implements both over HTTP. Enable the `mocks` feature to get `mockall` implementations.

mod api;
pub use api::{AccountStorageApi, GatewayApi};

#[cfg(any(test, feature = "mocks"))]
pub use api::{MockAccountStorageApi, MockGatewayApi};

mod client;
pub use client::{Client as FlowClient, Error, Result, DEFAULT_STATUS_POLLING_PERIOD};

pub mod cadence;
pub use cadence::CadenceError;

mod chain;
pub use chain::{
    ApiStatus, ChainAccount, ChainAccountKey, ChainBlock, ChainCollection,
    ChainCollectionGuarantee, ChainEvent, ChainTransaction, ChainTransactionStatus, StorageItem,
};

pub mod json;

mod subscription;
pub use subscription::{SubscriptionError, TxStatusSubscription, Unsubscribe};
