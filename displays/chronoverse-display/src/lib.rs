//! Display surface for the Chronoverse e-paper clock
//!
//! This crate provides:
//! - `FontTier` selection by body length and the screen `layout`
//! - `FrameBuffer`, a black/red two-plane buffer implementing
//!   `embedded-graphics` `DrawTarget`
//! - `Panel`, the trait a tri-color panel driver implements
//! - `EpaperSurface`, which renders a payload and commits it to a `Panel`
//!
//! # Architecture
//!
//! Rendering is pure and happens entirely in the frame buffer. Only
//! `Panel::show` touches hardware, once per presentation.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod color;
pub mod frame;
pub mod layout;
pub mod panel;
pub mod surface;

// Re-export key types
pub use color::TriColor;
pub use frame::{FrameBuffer, PANEL_HEIGHT, PANEL_WIDTH};
pub use layout::{layout, wrap_text, FontTier, Layout, TextItem};
pub use panel::Panel;
pub use surface::EpaperSurface;
