//! JSON bucket files
//!
//! An authored bucket is one JSON object per hour, keyed by two-digit
//! minute:
//!
//! ```json
//! { "07": { "reference": "Psalm 23:1 (Psalms)", "text": "The Lord is my shepherd" } }
//! ```

use alloc::collections::BTreeMap;
use alloc::string::String;

use serde_json::Value;

use chronoverse_core::content::{ContentBucket, ContentEntry};
use chronoverse_core::time::{HourKey, MinuteKey};

use crate::error::ContentError;

/// Decode one hour's JSON bucket
///
/// The top level must be an object; anything else is
/// [`ContentError::Json`]. Past that, problems stay with the minute they
/// belong to: keys that are not two-digit minutes are ignored, and entries
/// that are not objects with string `reference` and `text` fields are
/// dropped, so those minutes resolve as missing.
pub fn parse_bucket_json(hour: HourKey, json: &[u8]) -> Result<ContentBucket, ContentError> {
    let raw: BTreeMap<String, Value> =
        serde_json::from_slice(json).map_err(|_| ContentError::Json)?;

    let mut bucket = ContentBucket::new(hour);
    for (key, value) in &raw {
        let Some(minute) = MinuteKey::parse(key) else {
            continue;
        };
        if let Some(entry) = entry_from_value(value) {
            bucket.insert(minute, entry);
        }
    }
    Ok(bucket)
}

fn entry_from_value(value: &Value) -> Option<ContentEntry> {
    let reference = value.get("reference")?.as_str()?;
    let text = value.get("text")?.as_str()?;
    Some(ContentEntry::new(reference, text))
}
