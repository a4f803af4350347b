pub(crate) mod fifo;
pub(crate) mod lfu;
pub(crate) mod lru;

use crate::store::OrderedStore;

use core::fmt;

/// Selects which entry is sacrificed when an insertion would exceed the
/// cache's capacity.
///
/// The policy can be swapped at runtime with
/// [`Cache::set_policy`](crate::Cache::set_policy); switching only affects
/// future eviction choices and never reorders existing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvictionPolicy {
  /// Least Recently Used: evicts the entry at the oldest position of the
  /// iteration order. Reads move entries to the newest position.
  #[cfg_attr(feature = "serde", serde(rename = "LRU"))]
  Lru,
  /// Least Frequently Used: evicts the entry with the lowest access count,
  /// breaking ties towards the oldest last-access time.
  #[cfg_attr(feature = "serde", serde(rename = "LFU"))]
  Lfu,
  /// First In First Out: evicts the entry with the oldest creation time,
  /// ignoring the access pattern entirely.
  #[cfg_attr(feature = "serde", serde(rename = "FIFO"))]
  Fifo,
}

impl fmt::Display for EvictionPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvictionPolicy::Lru => write!(f, "LRU"),
      EvictionPolicy::Lfu => write!(f, "LFU"),
      EvictionPolicy::Fifo => write!(f, "FIFO"),
    }
  }
}

/// The internal seam each eviction policy implements.
///
/// Policies here are stateless selectors: all the bookkeeping they consult
/// (frequency, timestamps, iteration order) lives in the entries themselves,
/// which is what makes runtime policy switching lossless.
pub(crate) trait CachePolicy<V>: fmt::Debug + Send {
  /// Called after a successful read so the policy can adjust the iteration
  /// order.
  fn on_access(&self, key: &str, store: &mut OrderedStore<V>);

  /// Picks the key to evict. Called only when a new key is inserted into a
  /// full cache; `store` is non-empty at that point.
  fn victim(&self, store: &OrderedStore<V>) -> Option<String>;
}

/// Resolves a policy selector to its implementation.
pub(crate) fn policy_impl<V>(policy: EvictionPolicy) -> Box<dyn CachePolicy<V>> {
  match policy {
    EvictionPolicy::Lru => Box::new(lru::LruPolicy),
    EvictionPolicy::Lfu => Box::new(lfu::LfuPolicy),
    EvictionPolicy::Fifo => Box::new(fifo::FifoPolicy),
  }
}
