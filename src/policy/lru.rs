use super::CachePolicy;
use crate::store::OrderedStore;

/// An eviction policy that evicts the least recently used entry.
#[derive(Debug)]
pub(crate) struct LruPolicy;

impl<V> CachePolicy<V> for LruPolicy {
  /// When an entry is read, move it to the newest position so the oldest
  /// position always holds the least recently used key.
  fn on_access(&self, key: &str, store: &mut OrderedStore<V>) {
    store.move_to_back(key);
  }

  /// The oldest position is the least recently used entry.
  fn victim(&self, store: &OrderedStore<V>) -> Option<String> {
    store.front_key().map(str::to_string)
  }
}
