//! Indexer querying, response caching, and raw record shapes.

pub(crate) mod cache;
pub(crate) mod fetch;
pub(crate) mod records;

pub use cache::{CacheError, ResponseCache};
pub use fetch::{FetchConfig, FetchError, Fetcher, RefreshPolicy};
pub use records::{AccountTransfers, CallRecord, EventCallArgs, EventRecord};
