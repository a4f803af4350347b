use super::CachePolicy;
use crate::store::OrderedStore;

/// An eviction policy that evicts the least frequently used entry.
///
/// Ties are broken towards the entry touched longest ago, so a burst of
/// equally-cold keys sheds its stalest member first.
#[derive(Debug)]
pub(crate) struct LfuPolicy;

impl<V> CachePolicy<V> for LfuPolicy {
  /// Frequency counting happens in the entry itself; the iteration order
  /// is left alone.
  fn on_access(&self, _key: &str, _store: &mut OrderedStore<V>) {}

  /// Scans for the lowest frequency, tie-breaking on the oldest
  /// last-access time. O(len), which is bounded by the cache capacity.
  fn victim(&self, store: &OrderedStore<V>) -> Option<String> {
    let mut victim: Option<(&str, u64, u64)> = None;

    for (key, entry) in store.iter() {
      let colder = match victim {
        None => true,
        Some((_, frequency, last_access)) => {
          entry.frequency < frequency
            || (entry.frequency == frequency && entry.last_access < last_access)
        }
      };
      if colder {
        victim = Some((key, entry.frequency, entry.last_access));
      }
    }

    victim.map(|(key, _, _)| key.to_string())
  }
}
