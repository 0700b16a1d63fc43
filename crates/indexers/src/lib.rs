//! This module provides the [`BlockchainIndexer`] which mirrors a Flow chain into an
//! [`IndexStore`](flowdex_storage::IndexStore), and the [`IndexerService`] that drives it on
//! an [`IntervalScheduler`].

mod params;
pub use params::{IndexingParams, RunParams};

mod scheduler;
pub use scheduler::IntervalScheduler;

mod indexer;
pub use indexer::BlockchainIndexer;

mod accounts;
pub use accounts::AccountsProcessor;

mod events;

mod mapping;

mod subscriptions;
pub use subscriptions::TxStatusTracker;

mod service;
pub use service::IndexerService;

#[cfg(test)]
mod tests;
