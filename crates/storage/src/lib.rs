//! Generic keyed store for indexed entities.
//!
//! The store knows nothing about blockchain semantics: every entity kind gets its own
//! [`ResourceIndex`], ids come from the entities themselves and timestamps are set here.

mod traits;
pub use traits::{
    AccountScopedIndex, AccountsIndex, BlocksIndex, IndexError, IndexResult, ResourceIndex,
};

mod stored;
pub use stored::Stored;

mod impls;
pub use impls::memory::InMemoryIndex;

mod store;
pub use store::IndexStore;
