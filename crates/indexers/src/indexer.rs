//! This module provides the main indexer: [`BlockchainIndexer`].

use std::ops::RangeInclusive;
use std::sync::Arc;

use eyre::WrapErr;
use flow_client::{
    AccountStorageApi, ApiStatus, ChainEvent, ChainTransaction, ChainTransactionStatus,
    GatewayApi,
};
use flowdex_storage::{BlocksIndex, IndexStore, ResourceIndex};
use futures::future::{join_all, try_join_all};
use tracing::instrument;

use crate::{events, mapping, AccountsProcessor, IndexingParams, TxStatusTracker};

/// Mirrors a Flow chain into an [`IndexStore`], one block at a time.
pub struct BlockchainIndexer<G, S> {
    /// Access node client.
    gateway: Arc<G>,
    /// Index the chain data is mirrored into.
    store: IndexStore,
    accounts: AccountsProcessor<G, S>,
    subscriptions: TxStatusTracker,
    params: IndexingParams,
}

impl<G, S> BlockchainIndexer<G, S>
where
    G: GatewayApi + 'static,
    S: AccountStorageApi + 'static,
{
    pub fn new(
        gateway: Arc<G>,
        storage_api: Arc<S>,
        store: IndexStore,
        params: IndexingParams,
    ) -> Self {
        Self {
            accounts: AccountsProcessor::new(gateway.clone(), storage_api, store.clone()),
            subscriptions: TxStatusTracker::new(store.transactions.clone()),
            gateway,
            store,
            params,
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    pub fn accounts(&self) -> &AccountsProcessor<G, S> {
        &self.accounts
    }

    pub fn subscriptions(&self) -> &TxStatusTracker {
        &self.subscriptions
    }

    /// One indexing tick.
    ///
    /// # Flow
    ///
    /// 1. Return if the access node is offline.
    /// 2. Compute the range of unprocessed heights while the well-known accounts are bootstrapped.
    /// 3. Process every height of the range in ascending order, one after the other.
    ///
    /// A failed height aborts the tick. Heights processed before it stay indexed, and the next
    /// tick recomputes the range from the index, so the failed height is retried first.
    pub async fn process_blockchain_data(&self) -> eyre::Result<()> {
        if self.gateway.get_api_status().await == ApiStatus::Offline {
            tracing::debug!("Access node is offline, skipping");
            return Ok(());
        }

        let (range, ()) = tokio::join!(
            self.unprocessed_range(),
            self.accounts.process_well_known_accounts(&self.params),
        );

        let Some(range) = range? else {
            return Ok(());
        };

        for height in range {
            self.process_block_with_height(height)
                .await
                .wrap_err_with(|| format!("failed to process block at height {height}"))?;
        }

        Ok(())
    }

    /// Heights from the one after the last indexed block up to the latest sealed one. An empty
    /// index starts at the latest sealed block, history is never backfilled.
    async fn unprocessed_range(&self) -> eyre::Result<Option<RangeInclusive<u64>>> {
        let latest_height = self
            .gateway
            .get_latest_block()
            .await
            .wrap_err("failed to get latest block")?
            .height;

        let next_height = match self.store.blocks.last_indexed_height().await {
            Some(height) => height + 1,
            None => {
                tracing::info!(height = latest_height, "Starting indexing from the latest block");
                latest_height
            }
        };

        if next_height > latest_height {
            return Ok(None);
        }

        Ok(Some(next_height..=latest_height))
    }

    /// Fetches the block at `height` with everything it contains and indexes it.
    ///
    /// Core events are processed before anything of the block is persisted. Each transaction
    /// and event is then persisted independently, a failure is logged and skipped. Afterwards
    /// the storage of every known account is re-scanned and the status of each transaction is
    /// followed in the background.
    #[instrument(skip(self))]
    pub async fn process_block_with_height(&self, height: u64) -> eyre::Result<()> {
        let block = self
            .gateway
            .get_block_by_height(height)
            .await
            .wrap_err("failed to get block")?;

        let collections = try_join_all(
            block
                .collection_guarantees
                .iter()
                .map(|guarantee| self.gateway.get_collection_by_id(&guarantee.collection_id)),
        )
        .await
        .wrap_err("failed to get collections")?;

        let transactions = try_join_all(
            collections
                .iter()
                .flat_map(|collection| &collection.transaction_ids)
                .map(|id| self.fetch_transaction(id)),
        )
        .await
        .wrap_err("failed to get transactions")?;

        // Events are tagged with the transaction that emitted them.
        let events: Vec<(&str, &ChainEvent)> = transactions
            .iter()
            .flat_map(|(transaction, status)| {
                status
                    .events
                    .iter()
                    .map(move |event| (transaction.id.as_str(), event))
            })
            .collect();

        let chain_events = events.iter().map(|(_, event)| *event);
        events::process_core_events(&self.accounts, chain_events, &block.id)
            .await
            .wrap_err("failed to process core events")?;

        self.store
            .blocks
            .upsert(mapping::block(&block))
            .await
            .wrap_err("failed to persist block")?;

        join_all(transactions.iter().map(|(transaction, status)| {
            self.persist_transaction(transaction, status, &block.id)
        }))
        .await;

        join_all(events.iter().map(|(transaction_id, event)| {
            self.persist_event(transaction_id, event, &block.id)
        }))
        .await;

        self.accounts.rescan_storage().await;

        for (transaction, _) in &transactions {
            self.subscriptions
                .track(self.gateway.clone(), transaction.id.clone());
        }

        tracing::debug!(
            block_id = %block.id,
            transactions = transactions.len(),
            events = events.len(),
            "Indexed block"
        );

        Ok(())
    }

    async fn fetch_transaction(
        &self,
        id: &str,
    ) -> flow_client::Result<(ChainTransaction, ChainTransactionStatus)> {
        tokio::try_join!(
            self.gateway.get_transaction_by_id(id),
            self.gateway.get_transaction_status_by_id(id),
        )
    }

    async fn persist_transaction(
        &self,
        transaction: &ChainTransaction,
        status: &ChainTransactionStatus,
        block_id: &str,
    ) {
        let result = async {
            let transaction = mapping::transaction(transaction, status, block_id)?;
            self.store.transactions.upsert(transaction).await?;

            Ok::<_, eyre::Report>(())
        }
        .await;

        if let Err(err) = result {
            tracing::error!(tx_id = %transaction.id, "Failed to persist transaction: {:#}", err);
        }
    }

    async fn persist_event(&self, transaction_id: &str, event: &ChainEvent, block_id: &str) {
        let result = async {
            let event = mapping::event(event, transaction_id, block_id)?;
            self.store.events.upsert(event).await?;

            Ok::<_, eyre::Report>(())
        }
        .await;

        if let Err(err) = result {
            tracing::error!(
                tx_id = transaction_id,
                event_index = event.event_index,
                "Failed to persist event: {:#}",
                err
            );
        }
    }
}
