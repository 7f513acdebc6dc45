//! Content bucket formats for Chronoverse
//!
//! - Per-hour JSON bucket files as authored (`bible_verses_hour05.json`)
//! - Compact postcard records for each bucket
//! - The packed content image flashed next to the firmware: a fixed
//!   header with one slot per hour, followed by the bucket records
//! - A [`ContentStore`](chronoverse_core::traits::ContentStore) over an
//!   in-memory image

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod error;
pub mod image;
pub mod json;
pub mod naming;
pub mod record;
pub mod store;

pub use error::ContentError;
pub use image::{ContentImage, ImageBuilder, ImageHeader, Slot, HEADER_LEN};
pub use json::parse_bucket_json;
pub use naming::{bucket_resource_name, parse_resource_name, DEFAULT_PREFIX};
pub use record::{decode_bucket, encode_bucket};
pub use store::ImageContentStore;
