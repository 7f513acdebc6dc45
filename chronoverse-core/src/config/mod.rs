//! Device configuration
//!
//! Types describing the device configuration and a parser for the small
//! TOML subset `device.toml` is written in.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
