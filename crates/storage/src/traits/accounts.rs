use std::collections::HashSet;

use async_trait::async_trait;
use flowdex_types::{Account, AccountOwned, Address};

use crate::{IndexError, IndexResult, ResourceIndex, Stored};

#[async_trait]
pub trait AccountsIndex: ResourceIndex<Account> {
    /// Whether the account is indexed and carries at least one public key.
    async fn has_public_key(&self, address: &Address) -> bool {
        self.find_one_by_id(address.as_str())
            .await
            .map(|account| !account.keys.is_empty())
            .unwrap_or(false)
    }
}

/// Queries over entities that are re-derived per account.
#[async_trait]
pub trait AccountScopedIndex<R: AccountOwned>: ResourceIndex<R> {
    async fn find_by_address(&self, address: &Address) -> Vec<Stored<R>> {
        self.find_all()
            .await
            .into_iter()
            .filter(|stored| stored.address() == address)
            .collect()
    }

    /// Deletes every resource of `address` whose id is not in `keep`. Returns the number of
    /// deleted resources.
    async fn retain_for_address(
        &self,
        address: &Address,
        keep: &HashSet<String>,
    ) -> IndexResult<usize> {
        let mut deleted = 0;

        for stored in self.find_by_address(address).await {
            if keep.contains(stored.id()) {
                continue;
            }

            match self.delete(stored.id()).await {
                Ok(()) => deleted += 1,
                // Removed concurrently, nothing left to do.
                Err(IndexError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }

        Ok(deleted)
    }
}
