use hoard_cache::{Cache, EvictionPolicy, FileStore};

fn main() {
  let dir = std::env::temp_dir().join("hoard_cache_demo");

  {
    let cache: Cache<String> = Cache::builder(16)
      .policy(EvictionPolicy::Lfu)
      .persistence(FileStore::new(&dir), "palette")
      .build()
      .expect("Failed to build cache");

    cache.insert("primary", "#3366ff".to_string());
    cache.insert("accent", "#ff6633".to_string());
    cache.get("primary");

    // Inserts also persist automatically every 10th insertion; this just
    // makes sure the snapshot is on disk before we drop the cache.
    cache.persist();
    println!("Persisted {} entries to {:?}", cache.len(), dir);
  }

  // A fresh cache with the same store and key re-hydrates on build.
  let restored: Cache<String> = Cache::builder(16)
    .policy(EvictionPolicy::Lfu)
    .persistence(FileStore::new(&dir), "palette")
    .build()
    .expect("Failed to build cache");

  println!("\nRestored snapshot:");
  for (key, value) in restored.snapshot() {
    println!("  {} = {}", key, value);
  }
  println!("\nCache metrics: {:#?}", restored.metrics());
}
