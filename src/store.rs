use crate::entry::CacheEntry;

use core::fmt;
use std::collections::HashMap;

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node<V> {
  key: String,
  entry: CacheEntry<V>,
  next: Option<Index>,
  prev: Option<Index>,
}

/// An insertion-ordered map from key to [`CacheEntry`].
///
/// Nodes live in an arena and are threaded into a doubly-linked list whose
/// head is the oldest position and whose tail is the newest. A lookup map
/// gives O(1) access, and relinking gives O(1) `move_to_back` (LRU touch),
/// `pop_front` (LRU victim) and `remove`. Iteration walks front to back,
/// which is the order `snapshot()` and the persisted blob expose.
pub(crate) struct OrderedStore<V> {
  nodes: Arena<Node<V>>,
  lookup: HashMap<String, Index, ahash::RandomState>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl<V> fmt::Debug for OrderedStore<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OrderedStore")
      .field("len", &self.lookup.len())
      .finish()
  }
}

impl<V> OrderedStore<V> {
  pub(crate) fn new() -> Self {
    Self {
      nodes: Arena::new(),
      lookup: HashMap::default(),
      head: None,
      tail: None,
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.lookup.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.lookup.is_empty()
  }

  pub(crate) fn contains(&self, key: &str) -> bool {
    self.lookup.contains_key(key)
  }

  pub(crate) fn get(&self, key: &str) -> Option<&CacheEntry<V>> {
    let index = *self.lookup.get(key)?;
    Some(&self.nodes[index].entry)
  }

  pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry<V>> {
    let index = *self.lookup.get(key)?;
    Some(&mut self.nodes[index].entry)
  }

  /// The key at the oldest position, if any.
  pub(crate) fn front_key(&self) -> Option<&str> {
    self.head.map(|index| self.nodes[index].key.as_str())
  }

  /// Inserts a new key at the newest position. The caller guarantees the
  /// key is not already present.
  pub(crate) fn push_back(&mut self, key: String, entry: CacheEntry<V>) {
    debug_assert!(!self.lookup.contains_key(&key));
    let index = self.nodes.insert(Node {
      key: key.clone(),
      entry,
      next: None,
      prev: None,
    });
    self.lookup.insert(key, index);
    self.link_back(index);
  }

  /// Moves an existing key to the newest position. No-op for a missing key
  /// or one already at the tail.
  pub(crate) fn move_to_back(&mut self, key: &str) {
    if let Some(&index) = self.lookup.get(key) {
      if self.tail != Some(index) {
        self.unlink(index);
        self.link_back(index);
      }
    }
  }

  /// Removes and returns the entry at the oldest position.
  pub(crate) fn pop_front(&mut self) -> Option<(String, CacheEntry<V>)> {
    let head = self.head?;
    let key = self.nodes[head].key.clone();
    let entry = self.remove(&key)?;
    Some((key, entry))
  }

  pub(crate) fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
    let index = self.lookup.remove(key)?;
    self.unlink(index);
    let node = self.nodes.remove(index)?;
    Some(node.entry)
  }

  pub(crate) fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
  }

  /// Iterates entries from the oldest position to the newest.
  pub(crate) fn iter(&self) -> Iter<'_, V> {
    Iter {
      store: self,
      next: self.head,
    }
  }

  // Detach a node from the list without touching the arena or lookup map.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev = node.prev;
    let next = node.next;

    if let Some(prev_index) = prev {
      self.nodes[prev_index].next = next;
    } else {
      // Unlinking the head.
      self.head = next;
    }

    if let Some(next_index) = next {
      self.nodes[next_index].prev = prev;
    } else {
      // Unlinking the tail.
      self.tail = prev;
    }
  }

  // Attach an already-allocated node as the new tail.
  fn link_back(&mut self, index: Index) {
    let old_tail = self.tail;
    self.nodes[index].prev = old_tail;
    self.nodes[index].next = None;
    self.tail = Some(index);

    if let Some(tail_index) = old_tail {
      self.nodes[tail_index].next = Some(index);
    } else {
      self.head = Some(index);
    }
  }

  // A helper for tests, to get the order of keys from oldest to newest.
  #[cfg(test)]
  pub(crate) fn keys_as_vec(&self) -> Vec<String> {
    self.iter().map(|(key, _)| key.to_string()).collect()
  }
}

pub(crate) struct Iter<'a, V> {
  store: &'a OrderedStore<V>,
  next: Option<Index>,
}

impl<'a, V> Iterator for Iter<'a, V> {
  type Item = (&'a str, &'a CacheEntry<V>);

  fn next(&mut self) -> Option<Self::Item> {
    let index = self.next?;
    let node = &self.store.nodes[index];
    self.next = node.next;
    Some((node.key.as_str(), &node.entry))
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn store_with(keys: &[&str]) -> OrderedStore<i32> {
    let mut store = OrderedStore::new();
    for (i, key) in keys.iter().enumerate() {
      store.push_back(key.to_string(), CacheEntry::new(i as i32));
    }
    store
  }

  #[test]
  fn new_store_is_empty() {
    let store = OrderedStore::<i32>::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert!(store.front_key().is_none());
    assert!(!store.contains("anything"));
  }

  #[test]
  fn push_back_appends_in_order() {
    let store = store_with(&["a", "b", "c"]);
    assert_eq!(store.len(), 3);
    assert_eq!(store.keys_as_vec(), vec!["a", "b", "c"]);
    assert_eq!(store.front_key(), Some("a"));
  }

  #[test]
  fn move_to_back_reorders() {
    let mut store = store_with(&["a", "b", "c"]);
    store.move_to_back("a");
    assert_eq!(store.keys_as_vec(), vec!["b", "c", "a"]);
    assert_eq!(store.front_key(), Some("b"));

    // Moving the tail is a no-op.
    store.move_to_back("a");
    assert_eq!(store.keys_as_vec(), vec!["b", "c", "a"]);

    // Missing keys are ignored.
    store.move_to_back("zzz");
    assert_eq!(store.len(), 3);
  }

  #[test]
  fn pop_front_returns_oldest() {
    let mut store = store_with(&["a", "b"]);
    let (key, entry) = store.pop_front().unwrap();
    assert_eq!(key, "a");
    assert_eq!(*entry.value(), 0);
    assert_eq!(store.keys_as_vec(), vec!["b"]);

    store.pop_front();
    assert!(store.pop_front().is_none());
    assert!(store.is_empty());
  }

  #[test]
  fn remove_from_middle_relinks() {
    let mut store = store_with(&["a", "b", "c"]);
    assert!(store.remove("b").is_some());
    assert_eq!(store.keys_as_vec(), vec!["a", "c"]);
    assert!(store.remove("b").is_none());

    // The remaining list still walks cleanly in both directions.
    store.move_to_back("a");
    assert_eq!(store.keys_as_vec(), vec!["c", "a"]);
  }

  #[test]
  fn clear_resets_all_state() {
    let mut store = store_with(&["a", "b"]);
    store.clear();
    assert!(store.is_empty());
    assert!(store.front_key().is_none());

    // Reusable after a clear.
    store.push_back("x".to_string(), CacheEntry::new(9));
    assert_eq!(store.keys_as_vec(), vec!["x"]);
  }
}
