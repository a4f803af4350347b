use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in milliseconds since the Unix epoch.
///
/// Snapshot timestamps must survive process restarts, so entry bookkeeping
/// uses wall-clock millis rather than a process-local `Instant` epoch.
#[inline]
pub(crate) fn now_millis() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as u64)
    .unwrap_or(0)
}
