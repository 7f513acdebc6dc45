//! Content store trait

use crate::content::ContentBucket;
use crate::time::HourKey;

/// Errors from the content store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// No bucket exists for the requested hour
    NotFound,
    /// The backing storage could not be read
    Io,
    /// The bucket bytes did not decode
    Corrupt,
}

/// Read-only source of per-hour content buckets
pub trait ContentStore {
    /// Load the complete bucket for `hour`
    ///
    /// Takes `&mut self` because flash reads need mutable access to the
    /// peripheral.
    fn load_bucket(&mut self, hour: HourKey) -> Result<ContentBucket, StoreError>;
}
