//! JSON RPC declaration of the read side of the Flowdex index.
//!
//! Consumers poll the index: every entity kind can be listed (newest first) or fetched by id.
//! There are no subscriptions.

pub mod index;
