//! Content store in a raw flash partition
//!
//! The packed content image is written at [`IMAGE_OFFSET`] with
//! `espflash write-bin`. Only the header and the one bucket being loaded
//! are read into RAM.

use alloc::vec::Vec;

use chronoverse_content::{decode_bucket, ImageHeader, HEADER_LEN};
use chronoverse_core::content::ContentBucket;
use chronoverse_core::time::HourKey;
use chronoverse_core::traits::{ContentStore, StoreError};
use embedded_storage::ReadStorage;
use esp_storage::FlashStorage;
use log::warn;

/// Start of the content partition
pub const IMAGE_OFFSET: u32 = 0x0030_0000;

/// Size of the content partition
pub const IMAGE_CAPACITY: u32 = 0x0010_0000;

/// [`ContentStore`] reading a packed image straight out of flash
pub struct FlashContentStore<'d> {
    flash: FlashStorage<'d>,
    header: Option<ImageHeader>,
}

impl<'d> FlashContentStore<'d> {
    pub fn new(flash: FlashStorage<'d>) -> Self {
        Self {
            flash,
            header: None,
        }
    }

    /// Header of the image, read once and kept after the first success
    fn header(&mut self) -> Result<ImageHeader, StoreError> {
        if let Some(header) = &self.header {
            return Ok(header.clone());
        }

        let mut bytes = [0u8; HEADER_LEN];
        self.read(IMAGE_OFFSET, &mut bytes)?;
        let header = ImageHeader::parse(&bytes).inspect_err(|e| {
            warn!("store: bad content image header: {}", e);
        })?;
        header.check_bounds(IMAGE_CAPACITY as usize)?;

        self.header = Some(header.clone());
        Ok(header)
    }

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StoreError> {
        self.flash.read(offset, buf).map_err(|e| {
            warn!("store: flash read at {:#x} failed: {:?}", offset, e);
            StoreError::Io
        })
    }
}

impl ContentStore for FlashContentStore<'_> {
    fn load_bucket(&mut self, hour: HourKey) -> Result<ContentBucket, StoreError> {
        let slot = self.header()?.slot(hour).ok_or(StoreError::NotFound)?;

        let len = slot.len as usize;
        let mut record = Vec::new();
        record
            .try_reserve_exact(len)
            .map_err(|_| StoreError::Io)?;
        record.resize(len, 0);
        self.read(IMAGE_OFFSET + slot.offset, &mut record)?;

        Ok(decode_bucket(hour, &record)?)
    }
}
