use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use flowdex_types::{AccountOwned, Block, Resource};
use tokio::sync::RwLock;

use crate::{
    AccountScopedIndex, AccountsIndex, BlocksIndex, IndexError, IndexResult, ResourceIndex,
    Stored,
};

/// In-memory [`ResourceIndex`]. Indexed state is ephemeral and lives as long as the process.
pub struct InMemoryIndex<R> {
    entries: Arc<RwLock<Entries<R>>>,
}

struct Entries<R> {
    records: HashMap<String, Entry<R>>,
    /// Insertion counter, breaks ties between resources created at the same instant.
    next_sequence: u64,
}

struct Entry<R> {
    stored: Stored<R>,
    sequence: u64,
}

impl<R> Clone for InMemoryIndex<R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<R> Default for InMemoryIndex<R> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Entries {
                records: HashMap::new(),
                next_sequence: 0,
            })),
        }
    }
}

impl<R: Resource> InMemoryIndex<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.records.is_empty()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.entries.read().await.records.contains_key(id)
    }
}

impl<R: Resource> Entries<R> {
    fn insert(&mut self, resource: R) -> Stored<R> {
        let stored = Stored::new(resource, Utc::now());
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.records.insert(
            stored.id().to_owned(),
            Entry {
                stored: stored.clone(),
                sequence,
            },
        );

        stored
    }
}

#[async_trait]
impl<R: Resource> ResourceIndex<R> for InMemoryIndex<R> {
    async fn find_all(&self) -> Vec<Stored<R>> {
        let entries = self.entries.read().await;

        let mut records: Vec<&Entry<R>> = entries.records.values().collect();
        records.sort_by(|a, b| {
            b.stored
                .created_at
                .cmp(&a.stored.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });

        records
            .into_iter()
            .map(|entry| entry.stored.clone())
            .collect()
    }

    async fn find_one_by_id(&self, id: &str) -> IndexResult<Stored<R>> {
        let entries = self.entries.read().await;

        entries
            .records
            .get(id)
            .map(|entry| entry.stored.clone())
            .ok_or_else(|| IndexError::not_found::<R>(id))
    }

    async fn create(&self, resource: R) -> IndexResult<Stored<R>> {
        let mut entries = self.entries.write().await;

        if entries.records.contains_key(resource.id()) {
            return Err(IndexError::already_exists::<R>(resource.id()));
        }

        Ok(entries.insert(resource))
    }

    async fn upsert(&self, resource: R) -> IndexResult<Stored<R>> {
        let mut entries = self.entries.write().await;

        match entries.records.get_mut(resource.id()) {
            Some(entry) => {
                entry.stored.resource = resource;
                entry.stored.updated_at = Utc::now();

                Ok(entry.stored.clone())
            }
            None => Ok(entries.insert(resource)),
        }
    }

    async fn update<F>(&self, id: &str, patch: F) -> IndexResult<Stored<R>>
    where
        F: FnOnce(&mut R) + Send + 'static,
    {
        let mut entries = self.entries.write().await;

        let entry = entries
            .records
            .get_mut(id)
            .ok_or_else(|| IndexError::not_found::<R>(id))?;

        patch(&mut entry.stored.resource);
        entry.stored.updated_at = Utc::now();

        Ok(entry.stored.clone())
    }

    async fn delete(&self, id: &str) -> IndexResult<()> {
        let mut entries = self.entries.write().await;

        entries
            .records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| IndexError::not_found::<R>(id))
    }

    async fn clear(&self) {
        self.entries.write().await.records.clear();
    }
}

#[async_trait]
impl BlocksIndex for InMemoryIndex<Block> {
    async fn last_indexed_height(&self) -> Option<u64> {
        let entries = self.entries.read().await;

        entries
            .records
            .values()
            .map(|entry| entry.stored.height)
            .max()
    }
}

impl AccountsIndex for InMemoryIndex<flowdex_types::Account> {}

impl<R: AccountOwned> AccountScopedIndex<R> for InMemoryIndex<R> {}
