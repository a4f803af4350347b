use std::fmt;

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
  /// The cache was configured with a capacity of zero. A bounded cache
  /// must be able to hold at least one entry.
  ZeroCapacity,
  /// The auto-persist interval was set to zero insertions.
  ZeroPersistInterval,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::ZeroCapacity => write!(f, "cache capacity cannot be zero"),
      BuildError::ZeroPersistInterval => {
        write!(f, "auto-persist interval cannot be zero insertions")
      }
    }
  }
}

impl std::error::Error for BuildError {}

/// Errors raised by a [`SnapshotStore`](crate::snapshot::SnapshotStore)
/// implementation.
///
/// These never escape `persist`/`restore`; the cache logs and absorbs them.
#[cfg(feature = "serde")]
#[derive(Debug)]
pub enum StoreError {
  /// An underlying I/O failure (file store).
  Io(std::io::Error),
  /// The sink rejected the operation for a non-I/O reason.
  Unavailable(String),
}

#[cfg(feature = "serde")]
impl fmt::Display for StoreError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StoreError::Io(err) => write!(f, "snapshot store I/O error: {}", err),
      StoreError::Unavailable(reason) => write!(f, "snapshot store unavailable: {}", reason),
    }
  }
}

#[cfg(feature = "serde")]
impl std::error::Error for StoreError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      StoreError::Io(err) => Some(err),
      StoreError::Unavailable(_) => None,
    }
  }
}

#[cfg(feature = "serde")]
impl From<std::io::Error> for StoreError {
  fn from(err: std::io::Error) -> Self {
    StoreError::Io(err)
  }
}

/// Errors that can occur while writing or reading a persisted snapshot.
#[cfg(feature = "serde")]
#[derive(Debug)]
pub enum PersistError {
  /// The blob store failed.
  Store(StoreError),
  /// The snapshot could not be serialized.
  Encode(serde_json::Error),
  /// The persisted blob could not be parsed.
  Decode(serde_json::Error),
}

#[cfg(feature = "serde")]
impl fmt::Display for PersistError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PersistError::Store(err) => write!(f, "{}", err),
      PersistError::Encode(err) => write!(f, "failed to encode snapshot: {}", err),
      PersistError::Decode(err) => write!(f, "failed to decode snapshot: {}", err),
    }
  }
}

#[cfg(feature = "serde")]
impl std::error::Error for PersistError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PersistError::Store(err) => Some(err),
      PersistError::Encode(err) | PersistError::Decode(err) => Some(err),
    }
  }
}

#[cfg(feature = "serde")]
impl From<StoreError> for PersistError {
  fn from(err: StoreError) -> Self {
    PersistError::Store(err)
  }
}
