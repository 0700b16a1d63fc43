use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use flow_client::{ChainTransactionStatus, GatewayApi};
use flowdex_storage::{IndexError, InMemoryIndex, ResourceIndex};
use flowdex_types::Transaction;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::mapping;

/// Follows the status of indexed transactions until they are sealed.
///
/// Each transaction is followed by its own background task. The set of followed ids is only
/// kept to avoid following a transaction twice and to clean up on shutdown.
#[derive(Clone)]
pub struct TxStatusTracker {
    transactions: InMemoryIndex<Transaction>,
    active: Arc<Mutex<HashSet<String>>>,
    tracker: TaskTracker,
    cancellation: CancellationToken,
}

impl TxStatusTracker {
    pub fn new(transactions: InMemoryIndex<Transaction>) -> Self {
        Self {
            transactions,
            active: Default::default(),
            tracker: TaskTracker::new(),
            cancellation: CancellationToken::new(),
        }
    }

    fn active(&self) -> MutexGuard<'_, HashSet<String>> {
        lock(&self.active)
    }

    /// Number of transactions currently followed.
    pub fn active_count(&self) -> usize {
        self.active().len()
    }

    pub fn is_active(&self, transaction_id: &str) -> bool {
        self.active().contains(transaction_id)
    }

    /// Starts following `transaction_id` in the background. Returns immediately.
    pub fn track<G>(&self, gateway: Arc<G>, transaction_id: String)
    where
        G: GatewayApi + 'static,
    {
        if self.cancellation.is_cancelled() || !self.active().insert(transaction_id.clone()) {
            return;
        }

        let transactions = self.transactions.clone();
        let active = self.active.clone();
        let cancellation = self.cancellation.clone();

        self.tracker.spawn(async move {
            follow_status(gateway, transactions, &transaction_id, cancellation).await;
            lock(&active).remove(&transaction_id);
        });
    }

    /// Waits until every followed transaction is final or its subscription has failed.
    #[cfg(test)]
    pub(crate) async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Unsubscribes from every followed transaction and waits for the tasks to finish. No
    /// transaction is followed afterwards.
    pub async fn shutdown(&self) {
        self.cancellation.cancel();
        self.tracker.close();
        self.tracker.wait().await;

        tracing::debug!("Transaction status tracker stopped");
    }
}

fn lock(active: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn follow_status<G: GatewayApi>(
    gateway: Arc<G>,
    transactions: InMemoryIndex<Transaction>,
    transaction_id: &str,
    cancellation: CancellationToken,
) {
    let subscription = match gateway.get_tx_status_subscription(transaction_id).await {
        Ok(subscription) => subscription,
        Err(err) => {
            tracing::debug!(tx_id = transaction_id, "Failed to subscribe to status: {}", err);
            return;
        }
    };

    let id = transaction_id.to_owned();
    let listener = subscription.subscribe(move |status| {
        let transactions = transactions.clone();
        let id = id.clone();
        async move { apply_status(&transactions, &id, status).await }
    });

    tokio::select! {
        result = subscription.once_sealed() => {
            if let Err(err) = result {
                tracing::debug!(tx_id = transaction_id, "Transaction was not sealed: {}", err);
            }
        }
        _ = cancellation.cancelled() => {}
    }

    listener.unsubscribe().await;
}

/// Overwrites the status of an indexed transaction. Nothing else is changed.
async fn apply_status(
    transactions: &InMemoryIndex<Transaction>,
    id: &str,
    status: ChainTransactionStatus,
) {
    let new_status = mapping::transaction_status(&status);

    match transactions
        .update(id, move |transaction| transaction.status = new_status)
        .await
    {
        Ok(_) => {}
        // Cleared while the subscription was running.
        Err(IndexError::NotFound { .. }) => {
            tracing::debug!(tx_id = id, "Status update for a transaction that isn't indexed")
        }
        Err(err) => tracing::error!(tx_id = id, "Failed to update status: {}", err),
    }
}
