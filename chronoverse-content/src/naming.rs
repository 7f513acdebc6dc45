//! Per-hour resource names

use alloc::format;
use alloc::string::String;

use chronoverse_core::time::HourKey;

/// Prefix of the authored bucket files
pub const DEFAULT_PREFIX: &str = "bible_verses_hour";

/// Resource name of one hour's bucket, e.g. `bible_verses_hour05.json`
pub fn bucket_resource_name(prefix: &str, hour: HourKey) -> String {
    format!("{}{}.json", prefix, hour)
}

/// Hour key encoded in a resource name, if it follows the naming scheme
pub fn parse_resource_name(prefix: &str, name: &str) -> Option<HourKey> {
    let digits = name.strip_prefix(prefix)?.strip_suffix(".json")?;
    if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    HourKey::new(digits.parse().ok()?)
}
