use hoard_cache::{Cache, EvictionPolicy};

fn main() {
  // A three-entry LRU cache, no persistence.
  let cache: Cache<&str> = Cache::builder(3)
    .policy(EvictionPolicy::Lru)
    .build()
    .expect("Failed to build cache");

  cache.insert("red", "#ff0000");
  cache.insert("green", "#00ff00");
  cache.insert("blue", "#0000ff");

  // Touch "red" so it survives the next eviction.
  match cache.get("red") {
    Some(value) => println!("Found value for red: {}", value),
    None => println!("Value for red not found."),
  }

  // "green" is now the least recently used entry and gets evicted.
  cache.insert("yellow", "#ffff00");
  println!("green still cached: {}", cache.contains("green"));

  println!("\nMost frequent entries: {:?}", cache.most_frequent(2));
  println!("\nCache metrics: {:#?}", cache.metrics());
}
