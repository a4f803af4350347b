use crate::builder::CacheBuilder;
use crate::entry::CacheEntry;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::policy::{policy_impl, CachePolicy, EvictionPolicy};
use crate::store::OrderedStore;

use core::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// The mutable cache state, guarded by the handle's single lock.
pub(crate) struct CacheInner<V> {
  pub(crate) store: OrderedStore<V>,
  pub(crate) capacity: usize,
  pub(crate) policy: EvictionPolicy,
  pub(crate) policy_impl: Box<dyn CachePolicy<V>>,
  pub(crate) metrics: Metrics,
  pub(crate) insert_count: u64,
}

/// A bounded key-value cache with a pluggable eviction policy.
///
/// All state sits behind one coarse `Mutex`, so a `Cache` can be shared
/// across threads by reference (or in an `Arc`) without external locking;
/// every public operation is a short critical section bounded by the
/// capacity. Values are stored in an `Arc<V>`, so reads hand out cheap
/// clones without requiring `V: Clone`.
pub struct Cache<V> {
  pub(crate) inner: Mutex<CacheInner<V>>,
  #[cfg(feature = "serde")]
  pub(crate) persistence: Option<crate::snapshot::Persistence<V>>,
}

impl<V> Cache<V> {
  /// Starts building a cache that can hold at most `capacity` entries.
  pub fn builder(capacity: usize) -> CacheBuilder<V> {
    CacheBuilder::new(capacity)
  }

  /// Fetches a value, counting a hit or a miss.
  ///
  /// A hit bumps the entry's access frequency and last-access time, and
  /// under the LRU policy moves the entry to the most recently used end of
  /// the iteration order.
  pub fn get(&self, key: &str) -> Option<Arc<V>> {
    let mut guard = self.inner.lock();
    let inner = &mut *guard;

    let value = inner.store.get_mut(key).map(|entry| {
      entry.record_access();
      entry.value()
    });

    match value {
      Some(value) => {
        inner.metrics.hits += 1;
        inner.policy_impl.on_access(key, &mut inner.store);
        Some(value)
      }
      None => {
        inner.metrics.misses += 1;
        None
      }
    }
  }

  /// Inserts or replaces a value.
  ///
  /// Replacing an existing key updates the entry in place: its frequency
  /// keeps counting, its creation time and iteration-order position are
  /// untouched. A new key lands at the most recently used end; if the
  /// cache is full, exactly one victim chosen by the active policy is
  /// evicted first.
  pub fn insert(&self, key: impl Into<String>, value: V) {
    let key = key.into();
    let mut guard = self.inner.lock();
    let inner = &mut *guard;

    if let Some(entry) = inner.store.get_mut(&key) {
      entry.record_overwrite(value);
      inner.metrics.inserts += 1;
      inner.metrics.updates += 1;
    } else {
      if inner.store.len() >= inner.capacity {
        if let Some(victim) = inner.policy_impl.victim(&inner.store) {
          inner.store.remove(&victim);
          inner.metrics.evictions += 1;
        }
      }
      inner.store.push_back(key, CacheEntry::new(value));
      inner.metrics.inserts += 1;
    }

    inner.insert_count += 1;

    #[cfg(feature = "serde")]
    if let Some(persistence) = &self.persistence {
      if inner.insert_count % persistence.every == 0 {
        crate::snapshot::persist_locked(persistence, inner);
      }
    }
  }

  /// Returns whether `key` is present. No statistics or ordering effect.
  pub fn contains(&self, key: &str) -> bool {
    self.inner.lock().store.contains(key)
  }

  /// Removes an entry, returning whether it existed.
  pub fn remove(&self, key: &str) -> bool {
    let mut inner = self.inner.lock();
    if inner.store.remove(key).is_some() {
      inner.metrics.invalidations += 1;
      true
    } else {
      false
    }
  }

  /// Drops every entry and resets all statistics counters.
  pub fn clear(&self) {
    let mut inner = self.inner.lock();
    inner.store.clear();
    inner.metrics.reset();
    inner.insert_count = 0;
  }

  /// Bulk-loads entries through the normal insert path, so capacity and
  /// eviction rules apply exactly as for repeated [`insert`](Self::insert)
  /// calls.
  pub fn prewarm<I>(&self, entries: I)
  where
    I: IntoIterator<Item = (String, V)>,
  {
    for (key, value) in entries {
      self.insert(key, value);
    }
  }

  /// Returns up to `count` entries sorted by descending access frequency.
  /// Read-only: no statistics or ordering effect.
  pub fn most_frequent(&self, count: usize) -> Vec<(String, Arc<V>, u64)> {
    let inner = self.inner.lock();
    let mut ranked: Vec<(String, Arc<V>, u64)> = inner
      .store
      .iter()
      .map(|(key, entry)| (key.to_string(), entry.value(), entry.frequency))
      .collect();
    // Stable sort keeps iteration order among equal frequencies.
    ranked.sort_by(|a, b| b.2.cmp(&a.2));
    ranked.truncate(count);
    ranked
  }

  /// Drops every entry whose access frequency is below half the mean
  /// frequency. An explicit compaction for callers that want to shed cold
  /// entries without waiting for capacity pressure; never runs on its own.
  pub fn optimize(&self) {
    let mut inner = self.inner.lock();
    if inner.store.is_empty() {
      return;
    }

    let total: u64 = inner.store.iter().map(|(_, entry)| entry.frequency).sum();
    let threshold = total as f64 / inner.store.len() as f64 / 2.0;

    let cold: Vec<String> = inner
      .store
      .iter()
      .filter(|(_, entry)| (entry.frequency as f64) < threshold)
      .map(|(key, _)| key.to_string())
      .collect();

    for key in cold {
      inner.store.remove(&key);
      inner.metrics.evictions += 1;
    }
  }

  /// Switches the eviction policy for future eviction decisions.
  ///
  /// Existing entries and their iteration order are left untouched; all
  /// the bookkeeping each policy consults lives in the entries, so nothing
  /// is lost by switching back and forth.
  pub fn set_policy(&self, policy: EvictionPolicy) {
    let mut inner = self.inner.lock();
    inner.policy = policy;
    inner.policy_impl = policy_impl(policy);
  }

  /// The currently active eviction policy.
  pub fn policy(&self) -> EvictionPolicy {
    self.inner.lock().policy
  }

  /// A read-only export of the current contents in iteration order
  /// (oldest position first), without bookkeeping fields.
  pub fn snapshot(&self) -> Vec<(String, Arc<V>)> {
    let inner = self.inner.lock();
    inner
      .store
      .iter()
      .map(|(key, entry)| (key.to_string(), entry.value()))
      .collect()
  }

  /// A point-in-time snapshot of the cache's counters.
  pub fn metrics(&self) -> MetricsSnapshot {
    let inner = self.inner.lock();
    inner.metrics.snapshot(inner.store.len(), inner.capacity)
  }

  /// The current number of entries.
  pub fn len(&self) -> usize {
    self.inner.lock().store.len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.lock().store.is_empty()
  }

  /// The configured maximum number of entries.
  pub fn capacity(&self) -> usize {
    self.inner.lock().capacity
  }
}

impl<V> fmt::Debug for Cache<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.inner.lock();
    f.debug_struct("Cache")
      .field("len", &inner.store.len())
      .field("capacity", &inner.capacity)
      .field("policy", &inner.policy)
      .finish_non_exhaustive()
  }
}
