use hoard_cache::{Cache, CacheBuilder, EvictionPolicy};

// Helper to build an in-memory cache for testing.
pub fn build_cache(capacity: usize, policy: EvictionPolicy) -> Cache<i32> {
  CacheBuilder::new(capacity)
    .policy(policy)
    .build()
    .unwrap()
}
