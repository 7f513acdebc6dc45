//! Postcard bucket records
//!
//! The on-device form of a bucket: its hour followed by the entries in
//! minute order.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use chronoverse_core::content::{ContentBucket, ContentEntry};
use chronoverse_core::time::{HourKey, MinuteKey};

use crate::error::ContentError;

#[derive(Serialize, Deserialize)]
struct BucketRecord {
    hour: u8,
    entries: Vec<EntryRecord>,
}

#[derive(Serialize, Deserialize)]
struct EntryRecord {
    minute: u8,
    reference: String,
    text: String,
}

/// Encode a bucket as a postcard record
pub fn encode_bucket(bucket: &ContentBucket) -> Result<Vec<u8>, ContentError> {
    let record = BucketRecord {
        hour: bucket.hour().get(),
        entries: bucket
            .iter()
            .map(|(minute, entry)| EntryRecord {
                minute: minute.get(),
                reference: entry.reference.clone(),
                text: entry.text.clone(),
            })
            .collect(),
    };
    postcard::to_allocvec(&record).map_err(|_| ContentError::Record)
}

/// Decode a postcard record stored in `hour`'s slot
pub fn decode_bucket(hour: HourKey, bytes: &[u8]) -> Result<ContentBucket, ContentError> {
    let record: BucketRecord = postcard::from_bytes(bytes).map_err(|_| ContentError::Record)?;
    if record.hour != hour.get() {
        return Err(ContentError::HourMismatch);
    }

    let mut bucket = ContentBucket::new(hour);
    for entry in record.entries {
        let minute = MinuteKey::from_minute(entry.minute).ok_or(ContentError::Record)?;
        bucket.insert(minute, ContentEntry::new(entry.reference, entry.text));
    }
    Ok(bucket)
}
