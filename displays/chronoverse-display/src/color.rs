//! Tri-color e-paper pixel

use embedded_graphics::pixelcolor::PixelColor;

/// The three inks of a black/white/red panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriColor {
    #[default]
    White,
    Black,
    Red,
}

impl PixelColor for TriColor {
    type Raw = ();
}
