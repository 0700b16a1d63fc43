use std::sync::Arc;
use std::time::Duration;

use eyre::WrapErr;
use flow_client::FlowClient;
use flowdex_indexers::{BlockchainIndexer, IndexerService};
use flowdex_rpc_server::ServerConfig;
use flowdex_storage::IndexStore;
use tokio::select;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::config::NodeConfig;

/// Node encapsulate node service's start
pub struct Node {
    config: NodeConfig,
    store: IndexStore,
    indexer: IndexerService<FlowClient, FlowClient>,

    cancelation: CancellationToken,
    pub(crate) task_tracker: TaskTracker,
}

impl Node {
    pub fn new(config: NodeConfig) -> eyre::Result<Self> {
        let client = Arc::new(
            FlowClient::new(config.gateway.url.clone(), config.gateway.timeout)
                .wrap_err("failed to create the access API client")?
                .with_status_polling_period(config.gateway.status_polling_period),
        );

        let store = IndexStore::new();
        let indexer = IndexerService::new(
            BlockchainIndexer::new(
                client.clone(),
                client,
                store.clone(),
                (&config.indexer).into(),
            ),
            (&config.indexer).into(),
        );

        Ok(Self {
            config,
            store,
            indexer,
            cancelation: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        })
    }

    /// Wait for the signal from any node's service about the cancellation.
    pub async fn cancelled(&self) {
        self.cancelation.cancelled().await
    }

    pub fn run(&self) {
        info!(url = %self.config.gateway.url, "Starting indexer");
        self.indexer.start();

        self.spawn_rpc();

        self.task_tracker.close();
    }

    fn spawn_rpc(&self) {
        let config = ServerConfig {
            address: self.config.rpc.address.to_string(),
            max_request_size_kb: self.config.rpc.max_request_size_kb,
        };
        let store = self.store.clone();
        let cancelation = self.cancelation.clone();

        self.task_tracker.spawn(async move {
            if let Err(err) =
                flowdex_rpc_server::run_server(config, store, cancelation.clone()).await
            {
                tracing::error!("RPC server failed: {:?}", err);
                cancelation.cancel();
            }
        });
    }

    pub async fn shutdown(&self) {
        info!("Shutting down node, finishing received requests...");

        self.cancelation.cancel();

        let timeout = Duration::from_secs(self.config.indexer.shutdown_timeout);

        let shutdown = async {
            self.indexer.shutdown().await;
            self.task_tracker.wait().await;
        };

        select! {
            // Wait until the indexer and all tasks are finished
            _ = shutdown => {},
            // Or wait for and exit by timeout
            _ = sleep(timeout) => {
                info!("Shutdown timeout reached, exiting...");
            },
        }
    }
}
