use async_trait::async_trait;
use flowdex_types::Resource;

use crate::Stored;

mod blocks;
pub use blocks::BlocksIndex;

mod accounts;
pub use accounts::{AccountScopedIndex, AccountsIndex};

pub type IndexResult<T> = Result<T, IndexError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: &'static str, id: String },
}

impl IndexError {
    pub fn not_found<R: Resource>(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: R::KIND,
            id: id.into(),
        }
    }

    pub fn already_exists<R: Resource>(id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: R::KIND,
            id: id.into(),
        }
    }
}

/// Keyed store of a single entity kind.
///
/// Writes are keyed by id only and carry no cross-id invariants, so concurrent writers can
/// only ever create or merge a single record each.
#[async_trait]
pub trait ResourceIndex<R: Resource>: Send + Sync {
    /// Every stored resource, newest (by `created_at`) first.
    async fn find_all(&self) -> Vec<Stored<R>>;

    async fn find_one_by_id(&self, id: &str) -> IndexResult<Stored<R>>;

    /// Strict insert, fails with [`IndexError::AlreadyExists`] if the id is taken.
    async fn create(&self, resource: R) -> IndexResult<Stored<R>>;

    /// Inserts the resource or replaces the stored one, keeping its `created_at` and bumping
    /// `updated_at`.
    async fn upsert(&self, resource: R) -> IndexResult<Stored<R>>;

    /// Applies `patch` to the stored resource and bumps `updated_at`. The patch must not
    /// change the id.
    async fn update<F>(&self, id: &str, patch: F) -> IndexResult<Stored<R>>
    where
        F: FnOnce(&mut R) + Send + 'static;

    async fn delete(&self, id: &str) -> IndexResult<()>;

    async fn clear(&self);
}
