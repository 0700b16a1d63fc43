use async_trait::async_trait;
use flowdex_rpc_api::index::{
    AccountKeyResponse, AccountResponse, BlockResponse, ContractResponse, EventResponse,
    IndexRpcServer, StorageItemResponse, TransactionResponse, NOT_FOUND_CODE,
};
use flowdex_storage::{IndexError, IndexStore, InMemoryIndex, ResourceIndex, Stored};
use flowdex_types::{Address, Resource};
use jsonrpsee::{
    core::RpcResult,
    types::{error::INTERNAL_ERROR_CODE, ErrorObject, ErrorObjectOwned},
};

/// Read-only controller over the indexed entities, plus the index reset.
pub struct IndexController {
    store: IndexStore,
}

impl IndexController {
    pub fn new(store: IndexStore) -> Self {
        Self { store }
    }
}

fn index_error(err: IndexError) -> ErrorObjectOwned {
    let code = match err {
        IndexError::NotFound { .. } => NOT_FOUND_CODE,
        IndexError::AlreadyExists { .. } => INTERNAL_ERROR_CODE,
    };

    ErrorObject::owned(code, err.to_string(), Option::<Vec<u8>>::None)
}

async fn find_one<R: Resource>(index: &InMemoryIndex<R>, id: &str) -> RpcResult<Stored<R>> {
    index.find_one_by_id(id).await.map_err(index_error)
}

#[async_trait]
impl IndexRpcServer for IndexController {
    async fn list_accounts(&self) -> RpcResult<Vec<AccountResponse>> {
        Ok(self.store.accounts.find_all().await)
    }

    async fn get_account(&self, address: Address) -> RpcResult<AccountResponse> {
        find_one(&self.store.accounts, address.as_str()).await
    }

    async fn list_account_keys(&self) -> RpcResult<Vec<AccountKeyResponse>> {
        Ok(self.store.keys.find_all().await)
    }

    async fn get_account_key(&self, id: String) -> RpcResult<AccountKeyResponse> {
        find_one(&self.store.keys, &id).await
    }

    async fn list_contracts(&self) -> RpcResult<Vec<ContractResponse>> {
        Ok(self.store.contracts.find_all().await)
    }

    async fn get_contract(&self, id: String) -> RpcResult<ContractResponse> {
        find_one(&self.store.contracts, &id).await
    }

    async fn list_blocks(&self) -> RpcResult<Vec<BlockResponse>> {
        Ok(self.store.blocks.find_all().await)
    }

    async fn get_block(&self, id: String) -> RpcResult<BlockResponse> {
        find_one(&self.store.blocks, &id).await
    }

    async fn list_transactions(&self) -> RpcResult<Vec<TransactionResponse>> {
        Ok(self.store.transactions.find_all().await)
    }

    async fn get_transaction(&self, id: String) -> RpcResult<TransactionResponse> {
        find_one(&self.store.transactions, &id).await
    }

    async fn list_events(&self) -> RpcResult<Vec<EventResponse>> {
        Ok(self.store.events.find_all().await)
    }

    async fn get_event(&self, id: String) -> RpcResult<EventResponse> {
        find_one(&self.store.events, &id).await
    }

    async fn list_storage(&self) -> RpcResult<Vec<StorageItemResponse>> {
        Ok(self.store.storage.find_all().await)
    }

    async fn get_storage_item(&self, id: String) -> RpcResult<StorageItemResponse> {
        find_one(&self.store.storage, &id).await
    }

    async fn clear_index(&self) -> RpcResult<bool> {
        self.store.clear().await;
        tracing::info!("Index cleared over RPC");

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use flowdex_types::{Block, Contract};

    use super::*;

    fn block(height: u64) -> Block {
        Block {
            id: format!("block-{height}"),
            height,
            parent_id: format!("block-{}", height.saturating_sub(1)),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            collection_guarantees: vec![],
            signatures: vec![],
        }
    }

    #[tokio::test]
    async fn test_blocks_are_listed_newest_first() {
        let store = IndexStore::new();
        for height in 1..=3 {
            store.blocks.upsert(block(height)).await.unwrap();
        }

        let controller = IndexController::new(store);
        let heights: Vec<u64> = controller
            .list_blocks()
            .await
            .unwrap()
            .iter()
            .map(|block| block.height)
            .collect();

        assert_eq!(heights, vec![3, 2, 1]);
        assert_eq!(
            controller.get_block("block-2".into()).await.unwrap().height,
            2
        );
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_found() {
        let controller = IndexController::new(IndexStore::new());

        let err = controller.get_event("tx.0".into()).await.unwrap_err();
        assert_eq!(err.code(), NOT_FOUND_CODE);

        let address: Address = "0x01".parse().unwrap();
        let err = controller.get_account(address).await.unwrap_err();
        assert_eq!(err.code(), NOT_FOUND_CODE);
    }

    #[tokio::test]
    async fn test_clear_index_removes_everything() {
        let store = IndexStore::new();
        let address: Address = "0x01".parse().unwrap();

        store.blocks.upsert(block(1)).await.unwrap();
        store
            .contracts
            .upsert(Contract {
                id: Contract::make_id(&address, "Hello"),
                address: address.clone(),
                name: "Hello".into(),
                code: "access(all) contract Hello {}".into(),
                block_id: "block-1".into(),
            })
            .await
            .unwrap();

        let controller = IndexController::new(store.clone());
        assert_eq!(controller.list_contracts().await.unwrap().len(), 1);

        assert!(controller.clear_index().await.unwrap());
        assert!(controller.list_blocks().await.unwrap().is_empty());
        assert!(controller.list_contracts().await.unwrap().is_empty());
        assert!(store.blocks.is_empty().await);
    }
}
