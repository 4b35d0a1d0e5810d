//! Request/response cache for fetched pair collections.
//!
//! - [`query::QueryCache`]: keyed entries with fetch bookkeeping, in-place
//!   point updates, idle eviction and optional change notifications.

pub mod query;

pub use query::{CacheConfig, QueryCache, QueryData, QueryKey, QueryState};
