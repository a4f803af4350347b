use crate::cache::{Cache, CacheInner};
use crate::error::BuildError;
use crate::metrics::Metrics;
use crate::policy::{policy_impl, EvictionPolicy};
use crate::store::OrderedStore;

use core::fmt;
use std::marker::PhantomData;

use parking_lot::Mutex;

/// How many insertions pass between automatic snapshot writes.
#[cfg(feature = "serde")]
const DEFAULT_PERSIST_EVERY: u64 = 10;

/// How old a persisted snapshot may be before `restore` discards it.
#[cfg(feature = "serde")]
const DEFAULT_MAX_SNAPSHOT_AGE_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// A builder for creating [`Cache`] instances.
///
/// Only the capacity is mandatory; the policy defaults to LRU and
/// persistence stays off until a store is supplied.
pub struct CacheBuilder<V> {
  capacity: usize,
  policy: EvictionPolicy,
  #[cfg(feature = "serde")]
  persist_every: u64,
  #[cfg(feature = "serde")]
  max_snapshot_age_millis: u64,
  #[cfg(feature = "serde")]
  persistence: Option<crate::snapshot::Persistence<V>>,
  _value_marker: PhantomData<V>,
}

impl<V> fmt::Debug for CacheBuilder<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut builder = f.debug_struct("CacheBuilder");
    builder
      .field("capacity", &self.capacity)
      .field("policy", &self.policy);
    #[cfg(feature = "serde")]
    builder.field("has_persistence", &self.persistence.is_some());
    builder.finish_non_exhaustive()
  }
}

impl<V> CacheBuilder<V> {
  /// Creates a builder for a cache holding at most `capacity` entries.
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      policy: EvictionPolicy::Lru,
      #[cfg(feature = "serde")]
      persist_every: DEFAULT_PERSIST_EVERY,
      #[cfg(feature = "serde")]
      max_snapshot_age_millis: DEFAULT_MAX_SNAPSHOT_AGE_MILLIS,
      #[cfg(feature = "serde")]
      persistence: None,
      _value_marker: PhantomData,
    }
  }

  /// Sets the eviction policy the cache starts with.
  pub fn policy(mut self, policy: EvictionPolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Builds the cache, hydrating it from the snapshot store when one was
  /// configured. Hydration is best-effort and cannot fail the build.
  pub fn build(self) -> Result<Cache<V>, BuildError> {
    self.validate()?;

    let cache = Cache {
      inner: Mutex::new(CacheInner {
        store: OrderedStore::new(),
        capacity: self.capacity,
        policy: self.policy,
        policy_impl: policy_impl(self.policy),
        metrics: Metrics::default(),
        insert_count: 0,
      }),
      #[cfg(feature = "serde")]
      persistence: self.persistence,
    };

    #[cfg(feature = "serde")]
    if cache.persistence.is_some() {
      cache.restore();
    }

    Ok(cache)
  }

  /// Validates the builder configuration.
  fn validate(&self) -> Result<(), BuildError> {
    if self.capacity == 0 {
      return Err(BuildError::ZeroCapacity);
    }
    #[cfg(feature = "serde")]
    if self.persist_every == 0 {
      return Err(BuildError::ZeroPersistInterval);
    }
    Ok(())
  }
}

#[cfg(feature = "serde")]
impl<V> CacheBuilder<V>
where
  V: serde::Serialize + serde::de::DeserializeOwned + 'static,
{
  /// Attaches a snapshot store and the key this cache persists under.
  ///
  /// With a store configured, `build()` restores the previous snapshot
  /// (if fresh enough), inserts write a snapshot on a periodic cadence,
  /// and [`Cache::persist`] becomes effective.
  pub fn persistence<S>(mut self, store: S, key: impl Into<String>) -> Self
  where
    S: crate::snapshot::SnapshotStore + 'static,
  {
    self.persistence = Some(crate::snapshot::Persistence::new(
      std::sync::Arc::new(store),
      key.into(),
      self.persist_every,
      self.max_snapshot_age_millis,
    ));
    self
  }
}

#[cfg(feature = "serde")]
impl<V> CacheBuilder<V> {
  /// Sets the auto-persist cadence: a snapshot is written after every
  /// `every`-th insertion. Zero is rejected at build time. There is no
  /// background timer; snapshots are only written from the insert path
  /// and from explicit [`Cache::persist`] calls.
  pub fn persist_every(mut self, every: u64) -> Self {
    self.persist_every = every;
    if let Some(persistence) = &mut self.persistence {
      persistence.every = every;
    }
    self
  }

  /// Sets the freshness window: snapshots older than this are deleted and
  /// ignored by `restore`. Defaults to 24 hours.
  pub fn max_snapshot_age(mut self, age: std::time::Duration) -> Self {
    self.max_snapshot_age_millis = age.as_millis() as u64;
    if let Some(persistence) = &mut self.persistence {
      persistence.max_age_millis = self.max_snapshot_age_millis;
    }
    self
  }
}
