use std::sync::Arc;

use flow_client::{AccountStorageApi, GatewayApi};

use crate::{BlockchainIndexer, IntervalScheduler, RunParams};

/// Owns an indexer and the scheduler driving it.
///
/// Every service has its own scheduler, so several chains can be indexed side by side.
pub struct IndexerService<G, S> {
    indexer: Arc<BlockchainIndexer<G, S>>,
    scheduler: IntervalScheduler,
}

impl<G, S> IndexerService<G, S>
where
    G: GatewayApi + 'static,
    S: AccountStorageApi + 'static,
{
    pub fn new(indexer: BlockchainIndexer<G, S>, params: RunParams) -> Self {
        tracing::info!("Creating indexer service, parameters: {:?}", params);

        Self {
            indexer: Arc::new(indexer),
            scheduler: IntervalScheduler::new(params.polling_period),
        }
    }

    pub fn indexer(&self) -> &Arc<BlockchainIndexer<G, S>> {
        &self.indexer
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Starts indexing in the background. Does nothing if already started.
    pub fn start(&self) {
        let indexer = self.indexer.clone();

        self.scheduler.start(move || {
            let indexer = indexer.clone();
            async move { indexer.process_blockchain_data().await }
        });
    }

    /// Stops polling the chain. Transaction statuses keep being followed.
    pub fn stop(&self) {
        self.scheduler.stop();
    }

    /// Stops polling, waits for the running tick and unsubscribes from every transaction status.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
        self.indexer.subscriptions().shutdown().await;

        tracing::info!("Indexer service stopped");
    }
}
