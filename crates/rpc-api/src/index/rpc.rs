use flowdex_types::Address;
use jsonrpsee::proc_macros::rpc;

#[cfg(feature = "server")]
use jsonrpsee::core::RpcResult;

use crate::index::{
    AccountKeyResponse, AccountResponse, BlockResponse, ContractResponse, EventResponse,
    StorageItemResponse, TransactionResponse,
};

/// RPC methods for reading the index.
#[cfg_attr(all(feature = "client", not(feature = "server")), rpc(client))]
#[cfg_attr(all(feature = "server", not(feature = "client")), rpc(server))]
#[cfg_attr(all(feature = "server", feature = "client"), rpc(server, client))]
#[async_trait::async_trait]
pub trait IndexRpc {
    /// List indexed accounts, newest first.
    #[method(name = "listaccounts")]
    async fn list_accounts(&self) -> RpcResult<Vec<AccountResponse>>;

    /// Get an indexed account by its address. The address doesn't need to be normalized.
    #[method(name = "getaccount")]
    async fn get_account(&self, address: Address) -> RpcResult<AccountResponse>;

    #[method(name = "listaccountkeys")]
    async fn list_account_keys(&self) -> RpcResult<Vec<AccountKeyResponse>>;

    /// Get an account key by id (`<address>.<index>`).
    #[method(name = "getaccountkey")]
    async fn get_account_key(&self, id: String) -> RpcResult<AccountKeyResponse>;

    #[method(name = "listcontracts")]
    async fn list_contracts(&self) -> RpcResult<Vec<ContractResponse>>;

    /// Get a contract by id (`<address>.<name>`).
    #[method(name = "getcontract")]
    async fn get_contract(&self, id: String) -> RpcResult<ContractResponse>;

    #[method(name = "listblocks")]
    async fn list_blocks(&self) -> RpcResult<Vec<BlockResponse>>;

    /// Get a block by its id.
    #[method(name = "getblock")]
    async fn get_block(&self, id: String) -> RpcResult<BlockResponse>;

    #[method(name = "listtransactions")]
    async fn list_transactions(&self) -> RpcResult<Vec<TransactionResponse>>;

    /// Get a transaction with its latest known status.
    #[method(name = "gettransaction")]
    async fn get_transaction(&self, id: String) -> RpcResult<TransactionResponse>;

    #[method(name = "listevents")]
    async fn list_events(&self) -> RpcResult<Vec<EventResponse>>;

    /// Get an event by id (`<transaction id>.<event index>`).
    #[method(name = "getevent")]
    async fn get_event(&self, id: String) -> RpcResult<EventResponse>;

    #[method(name = "liststorage")]
    async fn list_storage(&self) -> RpcResult<Vec<StorageItemResponse>>;

    /// Get a storage item by id (`<address>/<domain>/<path>`).
    #[method(name = "getstorageitem")]
    async fn get_storage_item(&self, id: String) -> RpcResult<StorageItemResponse>;

    /// Remove every indexed entity. Indexing continues from the latest block.
    #[method(name = "clearindex")]
    async fn clear_index(&self) -> RpcResult<bool>;
}
