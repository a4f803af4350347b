use super::CachePolicy;
use crate::store::OrderedStore;

/// An eviction policy that evicts entries in a First-In, First-Out manner.
#[derive(Debug)]
pub(crate) struct FifoPolicy;

impl<V> CachePolicy<V> for FifoPolicy {
  /// A FIFO policy does not care about access patterns. This is a no-op.
  fn on_access(&self, _key: &str, _store: &mut OrderedStore<V>) {}

  /// Scans for the oldest creation time. Reads under other policies may
  /// have shuffled the iteration order, so the front of the list is not
  /// authoritative; `created_at` is.
  fn victim(&self, store: &OrderedStore<V>) -> Option<String> {
    let mut victim: Option<(&str, u64)> = None;

    for (key, entry) in store.iter() {
      let older = match victim {
        None => true,
        Some((_, created_at)) => entry.created_at < created_at,
      };
      if older {
        victim = Some((key, entry.created_at));
      }
    }

    victim.map(|(key, _)| key.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entry::CacheEntry;

  fn push(store: &mut OrderedStore<i32>, key: &str, created_at: u64) {
    store.push_back(
      key.to_string(),
      CacheEntry::from_parts(0, 1, created_at, created_at),
    );
  }

  #[test]
  fn victim_is_oldest_creation() {
    let mut store = OrderedStore::new();
    push(&mut store, "second", 20);
    push(&mut store, "first", 10);
    push(&mut store, "third", 30);

    let policy = FifoPolicy;
    assert_eq!(policy.victim(&store), Some("first".to_string()));
  }

  #[test]
  fn reordered_list_does_not_change_victim() {
    let mut store = OrderedStore::new();
    push(&mut store, "first", 10);
    push(&mut store, "second", 20);

    // Simulate an LRU-era reorder that put the oldest entry at the back.
    store.move_to_back("first");
    assert_eq!(store.keys_as_vec(), vec!["second", "first"]);

    let policy = FifoPolicy;
    assert_eq!(policy.victim(&store), Some("first".to_string()));
  }

  #[test]
  fn access_is_a_noop() {
    let mut store = OrderedStore::new();
    push(&mut store, "a", 1);
    push(&mut store, "b", 2);

    let keys_before = store.keys_as_vec();
    let policy = FifoPolicy;
    policy.on_access("a", &mut store);
    assert_eq!(
      keys_before,
      store.keys_as_vec(),
      "Access should not change FIFO order"
    );
  }
}
