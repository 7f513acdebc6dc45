//! Content resolver
//!
//! Turns a frozen timestamp into the payload for the display, reloading
//! the cache through the store when the hour changes.

use crate::cache::{CacheLoad, ContentCache};
use crate::payload::DisplayPayload;
use crate::time::{HourKey, Timestamp};
use crate::traits::{ContentStore, StoreError};

/// How a resolution went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResolveStatus {
    /// An entry exists for this minute
    Found,
    /// The bucket loaded but has nothing for this minute
    MissingEntry,
    /// The hour's bucket could not be loaded
    LoadFailed(StoreError),
}

/// Payload plus what it took to produce it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub payload: DisplayPayload,
    pub status: ResolveStatus,
    /// Whether the store was read for this resolution
    pub reloaded: bool,
}

/// Resolves timestamps to display payloads
pub struct ContentResolver<S> {
    store: S,
    cache: ContentCache,
}

impl<S: ContentStore> ContentResolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: ContentCache::new(),
        }
    }

    /// Build the payload for `timestamp`
    ///
    /// Failures never escape: a load failure or a missing minute yields a
    /// payload with only the time text, which the scheduler treats as
    /// "nothing to show".
    pub fn resolve(&mut self, timestamp: &Timestamp) -> Resolution {
        let hour: HourKey = timestamp.hour_key();
        let mut payload = DisplayPayload::time_only(timestamp);

        let load = match self.cache.ensure_loaded(&mut self.store, hour) {
            Ok(load) => load,
            Err(e) => {
                return Resolution {
                    payload,
                    status: ResolveStatus::LoadFailed(e),
                    reloaded: true,
                }
            }
        };

        let status = match self.cache.lookup(timestamp.minute_key()) {
            Some(entry) => {
                payload.label = entry.label();
                payload.body = entry.text.clone();
                ResolveStatus::Found
            }
            None => ResolveStatus::MissingEntry,
        };

        Resolution {
            payload,
            status,
            reloaded: load == CacheLoad::Loaded,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hour currently held by the cache
    pub fn resident(&self) -> Option<HourKey> {
        self.cache.resident()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingStore;

    fn at(hour: u8, minute: u8) -> Timestamp {
        Timestamp::new(hour, minute, 0, 0).unwrap()
    }

    #[test]
    fn test_resolve_found_entry() {
        let mut resolver = ContentResolver::new(CountingStore::new());
        let resolution = resolver.resolve(&at(5, 7));

        assert_eq!(resolution.status, ResolveStatus::Found);
        assert!(resolution.reloaded);
        assert_eq!(resolution.payload.time_text.as_str(), "05:07");
        assert_eq!(resolution.payload.label.as_deref(), Some("[Psalms]"));
        assert_eq!(resolution.payload.body, "Verse for hour 05");
    }

    #[test]
    fn test_resolve_missing_minute() {
        let mut resolver = ContentResolver::new(CountingStore::new());
        let resolution = resolver.resolve(&at(5, 8));

        assert_eq!(resolution.status, ResolveStatus::MissingEntry);
        assert_eq!(resolution.payload.time_text.as_str(), "05:08");
        assert!(resolution.payload.is_blank());
    }

    #[test]
    fn test_resolve_load_failure_keeps_time() {
        let mut store = CountingStore::new();
        store.fail_next = 1;
        let mut resolver = ContentResolver::new(store);

        let resolution = resolver.resolve(&at(5, 7));
        assert_eq!(resolution.status, ResolveStatus::LoadFailed(StoreError::Io));
        assert_eq!(resolution.payload.time_text.as_str(), "05:07");
        assert!(resolution.payload.is_blank());
        assert_eq!(resolver.resident(), None);

        // Same hour retries the load on the next resolution
        let resolution = resolver.resolve(&at(5, 7));
        assert_eq!(resolution.status, ResolveStatus::Found);
        assert_eq!(resolver.store.loads.len(), 2);
    }

    #[test]
    fn test_midnight_uses_bucket_24() {
        let mut resolver = ContentResolver::new(CountingStore::new());
        resolver.resolve(&at(0, 7));
        assert_eq!(resolver.resident(), HourKey::new(24));
    }

    #[test]
    fn test_reload_only_on_hour_change() {
        let mut resolver = ContentResolver::new(CountingStore::new());
        assert!(resolver.resolve(&at(5, 7)).reloaded);
        assert!(!resolver.resolve(&at(5, 8)).reloaded);
        assert!(resolver.resolve(&at(6, 0)).reloaded);
        assert_eq!(resolver.store.loads.len(), 2);
    }
}
