use std::collections::HashSet;
use std::sync::Arc;

use eyre::WrapErr;
use flow_client::{AccountStorageApi, GatewayApi};
use flowdex_storage::{AccountScopedIndex, AccountsIndex, IndexStore, ResourceIndex};
use flowdex_types::{well_known, Address, WellKnownAccount, NULL_BLOCK_ID};
use futures::future::{join_all, try_join_all};

use crate::{mapping, IndexingParams};

/// Re-derives everything the index knows about an account from the chain.
pub struct AccountsProcessor<G, S> {
    gateway: Arc<G>,
    storage_api: Arc<S>,
    store: IndexStore,
}

impl<G, S> AccountsProcessor<G, S>
where
    G: GatewayApi + 'static,
    S: AccountStorageApi + 'static,
{
    pub fn new(gateway: Arc<G>, storage_api: Arc<S>, store: IndexStore) -> Self {
        Self {
            gateway,
            storage_api,
            store,
        }
    }

    /// Fetches the account and replaces its indexed state: the account itself, one row per key
    /// and one row per deployed contract. Rows of keys and contracts the account no longer has
    /// are deleted.
    pub async fn reindex_account(&self, address: &Address, block_id: &str) -> eyre::Result<()> {
        let chain_account = self
            .gateway
            .get_account(address)
            .await
            .wrap_err_with(|| format!("failed to get account {address}"))?;

        let address = &chain_account.address;
        let keys = mapping::account_keys(&chain_account, block_id);
        let contracts = mapping::contracts(&chain_account, block_id);

        let key_ids: HashSet<String> = keys.iter().map(|key| key.id.clone()).collect();
        let contract_ids: HashSet<String> = contracts
            .iter()
            .map(|contract| contract.id.clone())
            .collect();

        self.store
            .accounts
            .upsert(mapping::account(&chain_account, keys.clone(), block_id))
            .await?;

        try_join_all(keys.into_iter().map(|key| self.store.keys.upsert(key))).await?;
        self.store.keys.retain_for_address(address, &key_ids).await?;

        try_join_all(
            contracts
                .into_iter()
                .map(|contract| self.store.contracts.upsert(contract)),
        )
        .await?;
        self.store
            .contracts
            .retain_for_address(address, &contract_ids)
            .await?;

        tracing::trace!(%address, block_id, "Re-indexed account");

        Ok(())
    }

    /// Indexes the system accounts that no block ever creates.
    ///
    /// The addressing scheme of the chain isn't known, so the accounts are re-indexed under both
    /// and the failures of the scheme that doesn't resolve are ignored. Nothing is done once the
    /// service account carries a key, or when the chain is managed by the caller.
    pub async fn process_well_known_accounts(&self, params: &IndexingParams) {
        if params.managed_chain {
            return;
        }

        for address in WellKnownAccount::Service.addresses() {
            if self.store.accounts.has_public_key(&address).await {
                return;
            }
        }

        let addresses = well_known::all_addresses();
        let results = join_all(
            addresses
                .iter()
                .map(|address| self.reindex_account(address, NULL_BLOCK_ID)),
        )
        .await;

        let mut resolved = 0;
        for (address, result) in addresses.iter().zip(results) {
            match result {
                Ok(()) => resolved += 1,
                Err(err) => {
                    tracing::trace!(%address, "Well-known account not resolved: {:#}", err)
                }
            }
        }

        if resolved > 0 {
            tracing::info!(resolved, "Processed well-known accounts");
        }
    }

    /// Re-scans the storage of every indexed account, each account independently.
    pub async fn rescan_storage(&self) {
        let accounts = self.store.accounts.find_all().await;

        join_all(accounts.iter().map(|account| async move {
            if let Err(err) = self.rescan_account_storage(&account.address).await {
                tracing::error!(address = %account.address, "Failed to re-scan storage: {:#}", err);
            }
        }))
        .await;
    }

    async fn rescan_account_storage(&self, address: &Address) -> eyre::Result<()> {
        let items = self
            .storage_api
            .get_account_storage_items(address)
            .await
            .wrap_err("failed to get storage items")?;

        let rows: Vec<_> = items
            .into_iter()
            .map(|item| mapping::storage_item(address, item))
            .collect();
        let ids: HashSet<String> = rows.iter().map(|row| row.id.clone()).collect();

        try_join_all(rows.into_iter().map(|row| self.store.storage.upsert(row))).await?;
        self.store.storage.retain_for_address(address, &ids).await?;

        Ok(())
    }
}
