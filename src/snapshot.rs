// This entire module is only compiled when the 'serde' feature is enabled.
#![cfg(feature = "serde")]

use crate::cache::{Cache, CacheInner};
use crate::entry::CacheEntry;
use crate::error::{PersistError, StoreError};
use crate::policy::EvictionPolicy;
use crate::time;

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// An owned, deserializable representation of a single persisted entry.
/// Field names are fixed by the wire contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PersistentEntry<V> {
  pub(crate) key: String,
  pub(crate) value: V,
  pub(crate) frequency: u64,
  #[serde(rename = "lastAccess")]
  pub(crate) last_access: u64,
  #[serde(rename = "createdAt")]
  pub(crate) created_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PersistentStats {
  pub(crate) hits: u64,
  pub(crate) misses: u64,
}

/// A serializable, point-in-time snapshot of the cache's data, statistics
/// and active policy, tagged with its wall-clock write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheSnapshot<V> {
  pub(crate) data: Vec<PersistentEntry<V>>,
  pub(crate) stats: PersistentStats,
  pub(crate) strategy: EvictionPolicy,
  pub(crate) timestamp: u64,
}

// Borrowed mirror of the wire types, so writing a snapshot never needs
// `V: Clone`.
#[derive(Serialize)]
struct WireEntryRef<'a, V> {
  key: &'a str,
  value: &'a V,
  frequency: u64,
  #[serde(rename = "lastAccess")]
  last_access: u64,
  #[serde(rename = "createdAt")]
  created_at: u64,
}

#[derive(Serialize)]
struct WireSnapshotRef<'a, V> {
  data: Vec<WireEntryRef<'a, V>>,
  stats: PersistentStats,
  strategy: EvictionPolicy,
  timestamp: u64,
}

/// A durable key-value blob sink for cache snapshots.
///
/// The cache treats the sink as best-effort: any error returned here is
/// logged and absorbed at the `persist`/`restore` boundary, never surfaced
/// to cache callers.
pub trait SnapshotStore: Send + Sync {
  /// Reads the blob stored under `key`, or `None` if absent.
  fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

  /// Writes `blob` under `key`, replacing any previous value.
  fn save(&self, key: &str, blob: &str) -> Result<(), StoreError>;

  /// Deletes the blob under `key`. Deleting an absent key is not an error.
  fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// An in-memory [`SnapshotStore`], mainly for tests and embedding.
///
/// Clones share the same underlying blobs, so a store handle can be kept
/// on the test side while the cache owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SnapshotStore for MemoryStore {
  fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
    Ok(self.blobs.lock().get(key).cloned())
  }

  fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
    self.blobs.lock().insert(key.to_string(), blob.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StoreError> {
    self.blobs.lock().remove(key);
    Ok(())
  }
}

/// A [`SnapshotStore`] that keeps one JSON file per key inside a directory.
///
/// Keys are sanitized to a conservative character set before becoming file
/// names, so arbitrary cache names cannot escape the directory.
#[derive(Debug, Clone)]
pub struct FileStore {
  dir: PathBuf,
}

impl FileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn path_for(&self, key: &str) -> PathBuf {
    let sanitized: String = key
      .chars()
      .map(|c| {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
          c
        } else {
          '_'
        }
      })
      .collect();
    self.dir.join(format!("{}.json", sanitized))
  }
}

impl SnapshotStore for FileStore {
  fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(self.path_for(key)) {
      Ok(blob) => Ok(Some(blob)),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
      Err(err) => Err(err.into()),
    }
  }

  fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
    fs::create_dir_all(&self.dir)?;
    fs::write(self.path_for(key), blob)?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), StoreError> {
    match fs::remove_file(self.path_for(key)) {
      Ok(()) => Ok(()),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
      Err(err) => Err(err.into()),
    }
  }
}

/// Persistence wiring carried by a cache that was built with a store.
///
/// The encode/decode closures are created in the builder, where the
/// `V: Serialize + DeserializeOwned` bounds are paid once; `persist` and
/// `restore` themselves stay bound-free and callable from any context.
pub(crate) struct Persistence<V> {
  pub(crate) store: Arc<dyn SnapshotStore>,
  pub(crate) key: String,
  pub(crate) every: u64,
  pub(crate) max_age_millis: u64,
  encode: Box<dyn Fn(&CacheInner<V>) -> Result<String, PersistError> + Send + Sync>,
  decode: Box<dyn Fn(&str) -> Result<CacheSnapshot<V>, PersistError> + Send + Sync>,
}

impl<V> Persistence<V>
where
  V: Serialize + DeserializeOwned + 'static,
{
  pub(crate) fn new(
    store: Arc<dyn SnapshotStore>,
    key: String,
    every: u64,
    max_age_millis: u64,
  ) -> Self {
    Self {
      store,
      key,
      every,
      max_age_millis,
      encode: Box::new(|inner: &CacheInner<V>| {
        let wire = WireSnapshotRef {
          data: inner
            .store
            .iter()
            .map(|(key, entry)| WireEntryRef {
              key,
              value: entry.value.as_ref(),
              frequency: entry.frequency,
              last_access: entry.last_access,
              created_at: entry.created_at,
            })
            .collect(),
          stats: PersistentStats {
            hits: inner.metrics.hits,
            misses: inner.metrics.misses,
          },
          strategy: inner.policy,
          timestamp: time::now_millis(),
        };
        serde_json::to_string(&wire).map_err(PersistError::Encode)
      }),
      decode: Box::new(|blob: &str| {
        serde_json::from_str::<CacheSnapshot<V>>(blob).map_err(PersistError::Decode)
      }),
    }
  }
}

/// Serializes the locked cache state and writes it to the sink.
///
/// Shared by the explicit `persist()` call and the auto-persist hook on the
/// insert path, which already holds the lock.
pub(crate) fn persist_locked<V>(persistence: &Persistence<V>, inner: &CacheInner<V>) {
  let blob = match (persistence.encode)(inner) {
    Ok(blob) => blob,
    Err(err) => {
      warn!(key = %persistence.key, error = %err, "failed to encode cache snapshot");
      return;
    }
  };

  match persistence.store.save(&persistence.key, &blob) {
    Ok(()) => {
      debug!(key = %persistence.key, entries = inner.store.len(), "cache snapshot written");
    }
    Err(err) => {
      warn!(key = %persistence.key, error = %err, "failed to write cache snapshot");
    }
  }
}

impl<V> Cache<V> {
  /// Writes a point-in-time snapshot of the cache to its configured
  /// [`SnapshotStore`].
  ///
  /// Best-effort: a sink or serialization failure is logged and absorbed,
  /// never returned. A cache built without persistence makes this a no-op.
  /// The cache also calls this automatically on a periodic insert cadence.
  pub fn persist(&self) {
    let Some(persistence) = &self.persistence else {
      debug!("persist called on a cache without a snapshot store");
      return;
    };

    let inner = self.inner.lock();
    persist_locked(persistence, &inner);
  }

  /// Replaces the cache contents from the configured [`SnapshotStore`].
  ///
  /// Invoked once at construction when persistence is configured; callable
  /// again to re-hydrate explicitly. Snapshots older than the configured
  /// freshness window are deleted from the sink and ignored; unreadable or
  /// corrupt blobs leave the cache untouched. Never fails.
  pub fn restore(&self) {
    let Some(persistence) = &self.persistence else {
      return;
    };

    let blob = match persistence.store.load(&persistence.key) {
      Ok(Some(blob)) => blob,
      Ok(None) => {
        debug!(key = %persistence.key, "no cache snapshot to restore");
        return;
      }
      Err(err) => {
        warn!(key = %persistence.key, error = %err, "failed to read cache snapshot");
        return;
      }
    };

    let snapshot = match (persistence.decode)(&blob) {
      Ok(snapshot) => snapshot,
      Err(err) => {
        warn!(key = %persistence.key, error = %err, "discarding unreadable cache snapshot");
        return;
      }
    };

    let age = time::now_millis().saturating_sub(snapshot.timestamp);
    if age > persistence.max_age_millis {
      debug!(key = %persistence.key, age_millis = age, "discarding stale cache snapshot");
      if let Err(err) = persistence.store.remove(&persistence.key) {
        warn!(key = %persistence.key, error = %err, "failed to delete stale cache snapshot");
      }
      return;
    }

    let mut inner = self.inner.lock();
    let capacity = inner.capacity;
    let total = snapshot.data.len();

    inner.store.clear();
    for persisted in snapshot.data.into_iter().take(capacity) {
      // A well-formed snapshot has unique keys; drop duplicates rather
      // than corrupting the order list.
      if inner.store.contains(&persisted.key) {
        continue;
      }
      inner.store.push_back(
        persisted.key,
        CacheEntry::from_parts(
          persisted.value,
          persisted.frequency,
          persisted.last_access,
          persisted.created_at,
        ),
      );
    }
    if total > capacity {
      warn!(
        key = %persistence.key,
        loaded = capacity,
        dropped = total - capacity,
        "cache snapshot exceeds capacity; newest entries dropped"
      );
    }

    inner.metrics.hits = snapshot.stats.hits;
    inner.metrics.misses = snapshot.stats.misses;
    debug!(key = %persistence.key, entries = inner.store.len(), "cache snapshot restored");
  }
}
