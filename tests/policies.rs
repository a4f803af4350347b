mod common;

use common::build_cache;
use hoard_cache::EvictionPolicy;

use std::thread;
use std::time::Duration;

// Millisecond timestamps need a nudge apart when a test depends on strict
// creation/access ordering.
fn tick() {
  thread::sleep(Duration::from_millis(5));
}

// --- LRU Policy Tests ---
mod lru {
  use super::*;

  #[test]
  fn test_lru_evicts_least_recently_read() {
    let cache = build_cache(2, EvictionPolicy::Lru);
    cache.insert("a", 1);
    cache.insert("b", 2);

    // Touch "a" so "b" becomes the least recently used entry.
    cache.get("a");

    cache.insert("c", 3);
    assert!(!cache.contains("b"), "Key b should have been evicted");
    assert!(cache.contains("a"));
    assert!(cache.contains("c"));
    assert_eq!(cache.metrics().evictions, 1);
  }

  #[test]
  fn test_lru_overwrite_does_not_refresh_position() {
    let cache = build_cache(2, EvictionPolicy::Lru);
    cache.insert("a", 1);
    cache.insert("b", 2);

    // Rewriting "a" updates it in place but leaves it at the oldest
    // position; only reads refresh recency.
    cache.insert("a", 10);

    cache.insert("c", 3);
    assert!(!cache.contains("a"), "Key a should have been evicted");
    assert!(cache.contains("b"));
    assert!(cache.contains("c"));
  }
}

// --- LFU Policy Tests ---
mod lfu {
  use super::*;

  #[test]
  fn test_lfu_evicts_least_frequently_used() {
    let cache = build_cache(2, EvictionPolicy::Lfu);
    cache.insert("a", 1);
    cache.insert("b", 2);

    // "a" reaches frequency 3; "b" stays at 1.
    cache.get("a");
    cache.get("a");

    cache.insert("c", 3);
    assert!(!cache.contains("b"), "Key b should have been evicted");
    assert!(cache.contains("a"));
    assert!(cache.contains("c"));
  }

  #[test]
  fn test_lfu_tie_breaks_on_oldest_access() {
    let cache = build_cache(2, EvictionPolicy::Lfu);
    cache.insert("a", 1);
    cache.insert("b", 2);

    // Both end at frequency 2, but "a" was touched first.
    cache.get("a");
    tick();
    cache.get("b");

    cache.insert("c", 3);
    assert!(!cache.contains("a"), "Key a should have been evicted");
    assert!(cache.contains("b"));
    assert!(cache.contains("c"));
  }
}

// --- FIFO Policy Tests ---
mod fifo {
  use super::*;

  #[test]
  fn test_fifo_ignores_access_pattern() {
    let cache = build_cache(2, EvictionPolicy::Fifo);
    cache.insert("a", 1);
    tick();
    cache.insert("b", 2);

    // A read must not save "a" from FIFO eviction.
    cache.get("a");

    cache.insert("c", 3);
    assert!(!cache.contains("a"), "Key a should have been evicted");
    assert!(cache.contains("b"));
    assert!(cache.contains("c"));
  }

  #[test]
  fn test_fifo_overwrite_keeps_creation_time() {
    let cache = build_cache(2, EvictionPolicy::Fifo);
    cache.insert("a", 1);
    tick();
    cache.insert("b", 2);
    tick();

    // Rewriting "a" must not make it younger than "b".
    cache.insert("a", 10);

    cache.insert("c", 3);
    assert!(!cache.contains("a"), "Key a is still the oldest creation");
    assert!(cache.contains("b"));
    assert!(cache.contains("c"));
  }
}

// --- Runtime Switching Tests ---

#[test]
fn test_switch_to_fifo_uses_original_creation_times() {
  let cache = build_cache(2, EvictionPolicy::Lru);
  cache.insert("a", 1);
  tick();
  cache.insert("b", 2);

  // Under LRU this read moves "a" to the newest position.
  cache.get("a");

  // Switching policies neither reorders entries nor rewrites their
  // bookkeeping; FIFO now consults creation times.
  cache.set_policy(EvictionPolicy::Fifo);
  assert_eq!(cache.policy(), EvictionPolicy::Fifo);

  cache.insert("c", 3);
  assert!(!cache.contains("a"), "Key a has the oldest creation time");
  assert!(cache.contains("b"));
  assert!(cache.contains("c"));
}

#[test]
fn test_switch_to_lru_sees_unshuffled_order() {
  let cache = build_cache(2, EvictionPolicy::Fifo);
  cache.insert("a", 1);
  cache.insert("b", 2);

  // Under FIFO a read does not reorder, so "a" stays at the oldest
  // position even though it was just touched.
  cache.get("a");

  cache.set_policy(EvictionPolicy::Lru);
  cache.insert("c", 3);
  assert!(!cache.contains("a"));
  assert!(cache.contains("b"));
  assert!(cache.contains("c"));
}
