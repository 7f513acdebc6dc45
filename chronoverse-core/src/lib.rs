//! Board-agnostic refresh engine for the Chronoverse e-paper clock
//!
//! This crate contains everything that decides *when* the device talks to
//! its collaborators, without depending on any hardware:
//!
//! - Collaborator traits (clock, network link, time source, content store,
//!   display surface)
//! - Content cache and resolver (minute-keyed entries, one hour resident)
//! - Clock synchronizer (one sync attempt per observed hour)
//! - Refresh scheduler (minute cadence with elapsed-time compensation)
//! - Bounded retry with backoff
//! - SNTP packet codec
//! - Device configuration types and the TOML subset parser

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod ntp;
pub mod payload;
pub mod resolver;
pub mod retry;
pub mod scheduler;
pub mod sync;
pub mod time;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ErrorKind;
