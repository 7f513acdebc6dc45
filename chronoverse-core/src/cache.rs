//! Content cache
//!
//! Holds the single resident bucket. Loading and reading are separate
//! operations: [`ContentCache::lookup`] never touches the store.

use crate::content::{ContentBucket, ContentEntry};
use crate::time::{HourKey, MinuteKey};
use crate::traits::{ContentStore, StoreError};

/// How [`ContentCache::ensure_loaded`] satisfied a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CacheLoad {
    /// The requested hour was already resident
    AlreadyResident,
    /// A fresh bucket was loaded from the store
    Loaded,
}

/// Cache of the current hour's content bucket
#[derive(Debug, Default)]
pub struct ContentCache {
    resident: Option<ContentBucket>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self { resident: None }
    }

    /// Make `hour` the resident bucket
    ///
    /// A no-op when `hour` is already resident. Otherwise the resident
    /// bucket is dropped before the store is asked, so a failed load
    /// leaves the cache empty rather than holding a stale hour.
    pub fn ensure_loaded<S: ContentStore>(
        &mut self,
        store: &mut S,
        hour: HourKey,
    ) -> Result<CacheLoad, StoreError> {
        if self.resident() == Some(hour) {
            return Ok(CacheLoad::AlreadyResident);
        }

        self.resident = None;
        let bucket = store.load_bucket(hour)?;
        if bucket.hour() != hour {
            return Err(StoreError::Corrupt);
        }
        self.resident = Some(bucket);
        Ok(CacheLoad::Loaded)
    }

    /// Entry for `minute` in the resident bucket, if any
    pub fn lookup(&self, minute: MinuteKey) -> Option<&ContentEntry> {
        self.resident.as_ref()?.get(minute)
    }

    /// Hour key of the resident bucket
    pub fn resident(&self) -> Option<HourKey> {
        self.resident.as_ref().map(ContentBucket::hour)
    }

    /// Drop the resident bucket
    pub fn clear(&mut self) {
        self.resident = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingStore;

    fn hour(h: u8) -> HourKey {
        HourKey::new(h).unwrap()
    }

    #[test]
    fn test_same_hour_loads_once() {
        let mut store = CountingStore::new();
        let mut cache = ContentCache::new();

        assert_eq!(cache.ensure_loaded(&mut store, hour(5)), Ok(CacheLoad::Loaded));
        assert_eq!(
            cache.ensure_loaded(&mut store, hour(5)),
            Ok(CacheLoad::AlreadyResident)
        );
        assert_eq!(store.loads.len(), 1);
    }

    #[test]
    fn test_hour_change_replaces_bucket() {
        let mut store = CountingStore::new();
        let mut cache = ContentCache::new();

        let minute = MinuteKey::from_minute(7).unwrap();
        cache.ensure_loaded(&mut store, hour(5)).unwrap();
        assert_eq!(cache.lookup(minute).unwrap().text, "Verse for hour 05");

        cache.ensure_loaded(&mut store, hour(6)).unwrap();
        assert_eq!(cache.resident(), Some(hour(6)));
        assert_eq!(store.loads.as_slice(), &[hour(5), hour(6)]);
        // Only the new hour's entries are visible
        assert_eq!(cache.lookup(minute).unwrap().text, "Verse for hour 06");
    }

    #[test]
    fn test_failed_load_leaves_cache_empty() {
        let mut store = CountingStore::new();
        let mut cache = ContentCache::new();

        cache.ensure_loaded(&mut store, hour(5)).unwrap();
        store.fail_next = 1;
        assert_eq!(cache.ensure_loaded(&mut store, hour(6)), Err(StoreError::Io));
        assert_eq!(cache.resident(), None);
        assert!(cache.lookup(MinuteKey::from_minute(7).unwrap()).is_none());

        // Next request for the same hour goes back to the store
        assert_eq!(cache.ensure_loaded(&mut store, hour(6)), Ok(CacheLoad::Loaded));
        assert_eq!(store.loads.len(), 3);
    }

    #[test]
    fn test_mismatched_bucket_rejected() {
        let mut store = CountingStore::new();
        store.wrong_hour = true;
        let mut cache = ContentCache::new();

        assert_eq!(
            cache.ensure_loaded(&mut store, hour(5)),
            Err(StoreError::Corrupt)
        );
        assert_eq!(cache.resident(), None);
    }

    #[test]
    fn test_lookup_never_loads() {
        let store = CountingStore::new();
        let cache = ContentCache::new();
        assert!(cache.lookup(MinuteKey::from_minute(7).unwrap()).is_none());
        assert!(store.loads.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = CountingStore::new();
        let mut cache = ContentCache::new();
        cache.ensure_loaded(&mut store, hour(1)).unwrap();
        cache.clear();
        assert_eq!(cache.resident(), None);
    }
}
