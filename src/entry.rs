use crate::time;

use std::sync::Arc;

/// A container for a value in the cache, holding all necessary metadata.
///
/// The eviction policies never inspect the value itself; they only read the
/// bookkeeping fields kept here and the iteration order of the store.
#[derive(Debug)]
pub(crate) struct CacheEntry<V> {
  /// The user's value, wrapped in an Arc for shared ownership.
  pub(crate) value: Arc<V>,
  /// Number of reads and rewrites since creation. Starts at 1 and only
  /// grows; the LFU policy evicts the smallest.
  pub(crate) frequency: u64,
  /// Wall-clock millis of the last read or rewrite. LFU tie-breaker and
  /// LRU bookkeeping.
  pub(crate) last_access: u64,
  /// Wall-clock millis at first insertion. Never updated by an overwrite;
  /// the FIFO policy evicts the smallest.
  pub(crate) created_at: u64,
}

impl<V> CacheEntry<V> {
  /// Creates a fresh entry for a newly inserted key.
  pub(crate) fn new(value: V) -> Self {
    let now = time::now_millis();
    Self {
      value: Arc::new(value),
      frequency: 1,
      last_access: now,
      created_at: now,
    }
  }

  /// Rebuilds an entry from persisted bookkeeping, verbatim.
  pub(crate) fn from_parts(value: V, frequency: u64, last_access: u64, created_at: u64) -> Self {
    Self {
      value: Arc::new(value),
      frequency,
      last_access,
      created_at,
    }
  }

  /// Returns a clone of the `Arc` containing the value.
  #[inline]
  pub(crate) fn value(&self) -> Arc<V> {
    self.value.clone()
  }

  /// Records a successful read.
  #[inline]
  pub(crate) fn record_access(&mut self) {
    self.frequency = self.frequency.saturating_add(1);
    self.last_access = time::now_millis();
  }

  /// Replaces the value in place. Frequency keeps counting from the
  /// existing total and `created_at` is left untouched.
  #[inline]
  pub(crate) fn record_overwrite(&mut self, value: V) {
    self.value = Arc::new(value);
    self.frequency = self.frequency.saturating_add(1);
    self.last_access = time::now_millis();
  }
}
