use async_trait::async_trait;
use flowdex_types::Address;

use crate::{
    ApiStatus, ChainAccount, ChainBlock, ChainCollection, ChainTransaction,
    ChainTransactionStatus, Result, StorageItem, TxStatusSubscription,
};

/// Read access to a Flow chain through an access node.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Never fails: an unreachable node is reported as [`ApiStatus::Offline`].
    async fn get_api_status(&self) -> ApiStatus;

    /// Latest sealed block.
    async fn get_latest_block(&self) -> Result<ChainBlock>;

    async fn get_block_by_height(&self, height: u64) -> Result<ChainBlock>;

    async fn get_collection_by_id(&self, id: &str) -> Result<ChainCollection>;

    async fn get_transaction_by_id(&self, id: &str) -> Result<ChainTransaction>;

    async fn get_transaction_status_by_id(&self, id: &str) -> Result<ChainTransactionStatus>;

    async fn get_account(&self, address: &Address) -> Result<ChainAccount>;

    /// Opens a stream of status changes for a transaction. The stream ends after the first
    /// sealed or expired status.
    async fn get_tx_status_subscription(&self, id: &str) -> Result<TxStatusSubscription>;
}

/// Enumerates what an account keeps in its storage.
#[async_trait]
pub trait AccountStorageApi: Send + Sync {
    async fn get_account_storage_items(&self, address: &Address) -> Result<Vec<StorageItem>>;
}

#[cfg(any(test, feature = "mocks"))]
mockall::mock! {
    pub GatewayApi { }

    #[async_trait]
    impl GatewayApi for GatewayApi {
        async fn get_api_status(&self) -> ApiStatus;

        async fn get_latest_block(&self) -> Result<ChainBlock>;

        async fn get_block_by_height(&self, height: u64) -> Result<ChainBlock>;

        async fn get_collection_by_id(&self, id: &str) -> Result<ChainCollection>;

        async fn get_transaction_by_id(&self, id: &str) -> Result<ChainTransaction>;

        async fn get_transaction_status_by_id(&self, id: &str) -> Result<ChainTransactionStatus>;

        async fn get_account(&self, address: &Address) -> Result<ChainAccount>;

        async fn get_tx_status_subscription(&self, id: &str) -> Result<TxStatusSubscription>;
    }
}

#[cfg(any(test, feature = "mocks"))]
mockall::mock! {
    pub AccountStorageApi { }

    #[async_trait]
    impl AccountStorageApi for AccountStorageApi {
        async fn get_account_storage_items(&self, address: &Address) -> Result<Vec<StorageItem>>;
    }
}
