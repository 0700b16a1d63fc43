use std::future::Future;

use flowdex_types::ExecutionStatus;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::ChainTransactionStatus;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("transaction {0} expired before being sealed")]
    Expired(String),
    #[error("status updates of transaction {0} stopped before it was sealed")]
    Closed(String),
}

/// Stream of status changes of one transaction.
///
/// Only the latest status is retained: a slow listener may skip intermediate statuses but always
/// observes the last one published.
#[derive(Debug, Clone)]
pub struct TxStatusSubscription {
    transaction_id: String,
    updates: watch::Receiver<Option<ChainTransactionStatus>>,
}

impl TxStatusSubscription {
    pub fn new(
        transaction_id: impl Into<String>,
        updates: watch::Receiver<Option<ChainTransactionStatus>>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            updates,
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Calls `on_update` with every status change, in order, until the status is final or the
    /// returned handle is used to unsubscribe.
    pub fn subscribe<F, Fut>(&self, on_update: F) -> Unsubscribe
    where
        F: Fn(ChainTransactionStatus) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut updates = self.updates.clone();
        let cancellation = CancellationToken::new();
        let cancelled = cancellation.clone();

        let handle = tokio::spawn(async move {
            loop {
                let current = updates.borrow_and_update().clone();

                if let Some(status) = current {
                    let is_final = status.execution_status.is_final();
                    on_update(status).await;

                    if is_final {
                        return;
                    }
                }

                tokio::select! {
                    // A pending change wins over cancellation so that the final status is never
                    // lost to an unsubscribe racing with it.
                    biased;

                    changed = updates.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                    _ = cancelled.cancelled() => return,
                }
            }
        });

        Unsubscribe {
            cancellation,
            handle,
        }
    }

    /// Resolves once the transaction is sealed.
    pub async fn once_sealed(&self) -> Result<ChainTransactionStatus, SubscriptionError> {
        let mut updates = self.updates.clone();

        loop {
            let current = updates.borrow_and_update().clone();

            match current {
                Some(status) if status.execution_status == ExecutionStatus::Sealed => {
                    return Ok(status)
                }
                Some(status) if status.execution_status == ExecutionStatus::Expired => {
                    return Err(SubscriptionError::Expired(self.transaction_id.clone()))
                }
                _ => {}
            }

            if updates.changed().await.is_err() {
                return Err(SubscriptionError::Closed(self.transaction_id.clone()));
            }
        }
    }
}

/// Handle returned by [`TxStatusSubscription::subscribe`].
#[derive(Debug)]
pub struct Unsubscribe {
    cancellation: CancellationToken,
    handle: JoinHandle<()>,
}

impl Unsubscribe {
    /// Stops the listener and waits for an in-flight update to complete. No update is applied
    /// after this returns.
    pub async fn unsubscribe(self) {
        self.cancellation.cancel();

        if let Err(err) = self.handle.await {
            debug!(target: "flow_client", "Status listener terminated abnormally: {}", err);
        }
    }

    /// Waits for the listener to finish on its own.
    pub async fn finished(self) {
        if let Err(err) = self.handle.await {
            debug!(target: "flow_client", "Status listener terminated abnormally: {}", err);
        }
    }
}
