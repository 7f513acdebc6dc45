//! Content format errors

use core::fmt;

use chronoverse_core::traits::StoreError;

/// Errors decoding or building content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContentError {
    /// JSON bucket did not parse
    Json,
    /// Postcard record did not encode or decode
    Record,
    /// Image does not start with the expected magic
    BadMagic,
    /// Image version is not supported
    UnsupportedVersion(u8),
    /// Image is shorter than its header or a slot claims
    Truncated,
    /// No bucket is stored for the hour
    Missing,
    /// A record's hour differs from the slot it was read from
    HourMismatch,
    /// Image would exceed the 32-bit offset range
    TooLarge,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Json => write!(f, "malformed JSON bucket"),
            ContentError::Record => write!(f, "malformed bucket record"),
            ContentError::BadMagic => write!(f, "not a content image (bad magic)"),
            ContentError::UnsupportedVersion(v) => write!(f, "unsupported image version {}", v),
            ContentError::Truncated => write!(f, "content image is truncated"),
            ContentError::Missing => write!(f, "no bucket for this hour"),
            ContentError::HourMismatch => write!(f, "bucket hour does not match its slot"),
            ContentError::TooLarge => write!(f, "content image exceeds 4 GiB"),
        }
    }
}

impl core::error::Error for ContentError {}

impl From<ContentError> for StoreError {
    fn from(e: ContentError) -> Self {
        match e {
            ContentError::Missing => StoreError::NotFound,
            _ => StoreError::Corrupt,
        }
    }
}
