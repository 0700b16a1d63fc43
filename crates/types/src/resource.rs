use crate::Address;

/// Base shape shared by every indexed entity.
///
/// The id must be derived from the entity's natural key and never regenerated, which is what
/// makes re-indexing an upsert instead of a duplicate. Timestamps are owned by the store.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Human readable name of the entity kind, used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Entity that belongs to a single account and is re-derived per account.
pub trait AccountOwned: Resource {
    fn address(&self) -> &Address;
}
