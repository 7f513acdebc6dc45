//! Packed content image
//!
//! Layout (all integers little-endian):
//!
//! | Offset | Size   | Field                                   |
//! |--------|--------|-----------------------------------------|
//! | 0      | 4      | magic `b"CVRS"`                         |
//! | 4      | 1      | version (1)                             |
//! | 5      | 3      | reserved, zero                          |
//! | 8      | 24 × 8 | slots for hour keys 1..=24: offset, len |
//! | 200    | ...    | postcard bucket records                 |
//!
//! A slot with zero length marks an hour with no bucket.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use chronoverse_core::content::ContentBucket;
use chronoverse_core::time::HourKey;

use crate::error::ContentError;
use crate::record::{decode_bucket, encode_bucket};

/// Image magic
pub const MAGIC: [u8; 4] = *b"CVRS";

/// Current image version
pub const VERSION: u8 = 1;

/// One slot per hour key
pub const SLOT_COUNT: usize = 24;

const PREAMBLE_LEN: usize = 8;
const SLOT_LEN: usize = 8;

/// Total header size
pub const HEADER_LEN: usize = PREAMBLE_LEN + SLOT_COUNT * SLOT_LEN;

/// Location of one bucket record inside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot {
    pub offset: u32,
    pub len: u32,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte, or `None` on overflow
    pub fn end(&self) -> Option<u32> {
        self.offset.checked_add(self.len)
    }
}

/// Parsed image header
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageHeader {
    slots: [Slot; SLOT_COUNT],
}

impl ImageHeader {
    /// Parse the first [`HEADER_LEN`] bytes of an image
    pub fn parse(bytes: &[u8]) -> Result<Self, ContentError> {
        if bytes.len() < HEADER_LEN {
            return Err(ContentError::Truncated);
        }
        if bytes[..4] != MAGIC {
            return Err(ContentError::BadMagic);
        }
        if bytes[4] != VERSION {
            return Err(ContentError::UnsupportedVersion(bytes[4]));
        }

        let mut slots = [Slot::default(); SLOT_COUNT];
        for (i, slot) in slots.iter_mut().enumerate() {
            let at = PREAMBLE_LEN + i * SLOT_LEN;
            slot.offset = read_u32(&bytes[at..at + 4]);
            slot.len = read_u32(&bytes[at + 4..at + 8]);
        }
        Ok(Self { slots })
    }

    /// Slot holding `hour`'s bucket, if one is stored
    pub fn slot(&self, hour: HourKey) -> Option<Slot> {
        let slot = self.slots[hour.index()];
        (!slot.is_empty()).then_some(slot)
    }

    /// Check every non-empty slot lies after the header and within
    /// `image_len` bytes
    pub fn check_bounds(&self, image_len: usize) -> Result<(), ContentError> {
        for slot in self.slots.iter().filter(|s| !s.is_empty()) {
            let end = slot.end().ok_or(ContentError::Truncated)? as usize;
            if (slot.offset as usize) < HEADER_LEN || end > image_len {
                return Err(ContentError::Truncated);
            }
        }
        Ok(())
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&[0; 3]);
        for slot in &self.slots {
            out.extend_from_slice(&slot.offset.to_le_bytes());
            out.extend_from_slice(&slot.len.to_le_bytes());
        }
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// A complete image held in memory
#[derive(Debug, Clone)]
pub struct ContentImage<'a> {
    header: ImageHeader,
    bytes: &'a [u8],
}

impl<'a> ContentImage<'a> {
    /// Parse and bounds-check an image
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ContentError> {
        let header = ImageHeader::parse(bytes)?;
        header.check_bounds(bytes.len())?;
        Ok(Self { header, bytes })
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// Raw record bytes for `hour`
    pub fn bucket_bytes(&self, hour: HourKey) -> Result<&'a [u8], ContentError> {
        let slot = self.header.slot(hour).ok_or(ContentError::Missing)?;
        let start = slot.offset as usize;
        let end = start + slot.len as usize;
        self.bytes.get(start..end).ok_or(ContentError::Truncated)
    }

    /// Decode `hour`'s bucket
    pub fn load(&self, hour: HourKey) -> Result<ContentBucket, ContentError> {
        decode_bucket(hour, self.bucket_bytes(hour)?)
    }
}

/// Assembles an image from buckets
#[derive(Debug, Default)]
pub struct ImageBuilder {
    records: BTreeMap<HourKey, Vec<u8>>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the bucket for its hour
    pub fn insert(&mut self, bucket: &ContentBucket) -> Result<(), ContentError> {
        let record = encode_bucket(bucket)?;
        self.records.insert(bucket.hour(), record);
        Ok(())
    }

    /// Number of hours with a bucket
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lay out the header followed by the records in hour order
    pub fn build(&self) -> Result<Vec<u8>, ContentError> {
        let mut header = ImageHeader {
            slots: [Slot::default(); SLOT_COUNT],
        };
        let mut offset = HEADER_LEN;
        for (hour, record) in &self.records {
            let len = u32::try_from(record.len()).map_err(|_| ContentError::TooLarge)?;
            header.slots[hour.index()] = Slot {
                offset: u32::try_from(offset).map_err(|_| ContentError::TooLarge)?,
                len,
            };
            offset = offset
                .checked_add(record.len())
                .ok_or(ContentError::TooLarge)?;
        }

        let mut out = Vec::with_capacity(offset);
        header.write(&mut out);
        for record in self.records.values() {
            out.extend_from_slice(record);
        }
        Ok(out)
    }
}
