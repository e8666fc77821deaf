//! Cached query store.
//!
//! This crate provides:
//! - `QueryKey` - Identifier of a cache entry
//! - `QueryState` / `QueryStatus` - Per-key lifecycle (Idle, Loading, Success, Error)
//! - `QueryStore` - Cache with at most one in-flight request per key
//! - `Subscription` - Listener registration, released on drop

mod key;
mod state;
mod store;

pub use key::QueryKey;
pub use state::{QueryState, QueryStatus};
pub use store::{FetchResult, QueryStore, Subscription};
