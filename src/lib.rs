//! A bounded key-value cache with pluggable eviction and best-effort
//! snapshot persistence.
//!
//! # Features
//! - **Pluggable Eviction**: LRU, LFU and FIFO policies, switchable at
//!   runtime without losing bookkeeping.
//! - **Observability**: hit/miss/eviction counters with derived hit ratio
//!   and utilization.
//! - **Persistence**: optional `serde` feature for saving snapshots to a
//!   pluggable blob store and re-hydrating at construction. Persistence is
//!   strictly best-effort: a broken sink degrades to a cold cache, never
//!   to an error.
//! - **Non-Clone Support**: stores values in an `Arc<V>`, avoiding
//!   `V: Clone` bounds on reads.
//! - **Simple Concurrency**: one coarse lock; handles are `Send + Sync`
//!   and every operation is a short, capacity-bounded critical section.

// Public modules that form the API
pub mod builder;
pub mod error;
pub mod metrics;
pub mod policy;

// Internal, crate-only modules
mod cache;
mod entry;
mod store;
mod time;

#[cfg(feature = "serde")]
pub mod snapshot;

// Re-export the primary user-facing types for convenience
pub use builder::CacheBuilder;
pub use cache::Cache;
pub use error::BuildError;
pub use metrics::MetricsSnapshot;
pub use policy::EvictionPolicy;

#[cfg(feature = "serde")]
pub use error::{PersistError, StoreError};
#[cfg(feature = "serde")]
pub use snapshot::{FileStore, MemoryStore, SnapshotStore};
