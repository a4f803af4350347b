use core::fmt;

/// Internal counters, updated under the cache's lock.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
  // Hit/miss ratios.
  pub(crate) hits: u64,
  pub(crate) misses: u64,

  // Throughput.
  pub(crate) inserts: u64,
  pub(crate) updates: u64,
  pub(crate) invalidations: u64,

  // Capacity evictions plus optimize() compactions.
  pub(crate) evictions: u64,
}

impl Metrics {
  /// Creates a point-in-time snapshot of the current counters.
  pub(crate) fn snapshot(&self, size: usize, max_size: usize) -> MetricsSnapshot {
    let total_lookups = self.hits + self.misses;

    MetricsSnapshot {
      hits: self.hits,
      misses: self.misses,
      hit_ratio: if total_lookups == 0 {
        0.0
      } else {
        self.hits as f64 / total_lookups as f64
      },
      inserts: self.inserts,
      updates: self.updates,
      invalidations: self.invalidations,
      evictions: self.evictions,
      size,
      max_size,
      utilization: size as f64 / max_size as f64 * 100.0,
    }
  }

  pub(crate) fn reset(&mut self) {
    *self = Metrics::default();
  }
}

/// A point-in-time, public-facing snapshot of the cache's counters.
#[derive(Clone)]
pub struct MetricsSnapshot {
  /// The number of successful lookups.
  pub hits: u64,
  /// The number of failed lookups.
  pub misses: u64,
  /// The cache hit ratio (hits / (hits + misses)); 0.0 before any lookup.
  pub hit_ratio: f64,
  /// The total number of insert calls, including overwrites.
  pub inserts: u64,
  /// The number of inserts that replaced an existing value in place.
  pub updates: u64,
  /// The number of manual removals.
  pub invalidations: u64,
  /// The number of entries dropped by capacity eviction or `optimize`.
  pub evictions: u64,
  /// The current number of entries.
  pub size: usize,
  /// The configured capacity.
  pub max_size: usize,
  /// How full the cache is, as a percentage of capacity.
  pub utilization: f64,
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("hit_ratio", &format!("{:.2}%", self.hit_ratio * 100.0))
      .field("inserts", &self.inserts)
      .field("updates", &self.updates)
      .field("invalidations", &self.invalidations)
      .field("evictions", &self.evictions)
      .field("size", &self.size)
      .field("max_size", &self.max_size)
      .field("utilization", &format!("{:.1}%", self.utilization))
      .finish()
  }
}
