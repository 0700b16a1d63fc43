use flowdex_types::{Account, AccountKey, AccountStorage, Block, Contract, Event, Transaction};

use crate::{InMemoryIndex, ResourceIndex};

/// One index per entity kind. Clones share the same underlying state.
#[derive(Clone, Default)]
pub struct IndexStore {
    pub accounts: InMemoryIndex<Account>,
    pub keys: InMemoryIndex<AccountKey>,
    pub contracts: InMemoryIndex<Contract>,
    pub blocks: InMemoryIndex<Block>,
    pub transactions: InMemoryIndex<Transaction>,
    pub events: InMemoryIndex<Event>,
    pub storage: InMemoryIndex<AccountStorage>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every indexed entity of every kind.
    pub async fn clear(&self) {
        tokio::join!(
            self.accounts.clear(),
            self.keys.clear(),
            self.contracts.clear(),
            self.blocks.clear(),
            self.transactions.clear(),
            self.events.clear(),
            self.storage.clear(),
        );

        tracing::debug!("Cleared the resource index");
    }
}
