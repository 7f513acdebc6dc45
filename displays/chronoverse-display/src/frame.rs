//! Two-plane frame buffer
//!
//! The buffer is drawn in landscape orientation but stored in the panel's
//! native portrait scan order: one row per gate line, one bit per source
//! line, MSB first. A set bit means ink on that plane.

use alloc::vec::Vec;

use chronoverse_core::traits::SurfaceError;
use embedded_graphics::prelude::*;

use crate::color::TriColor;

/// Landscape width of the panel in pixels
pub const PANEL_WIDTH: u32 = 296;

/// Landscape height of the panel in pixels
pub const PANEL_HEIGHT: u32 = 128;

/// Black and red ink planes for one screen
pub struct FrameBuffer {
    size: Size,
    stride: usize,
    black: Vec<u8>,
    red: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate both planes for a landscape screen of `size`
    ///
    /// Allocation is fallible; running out of heap here is reported as
    /// [`SurfaceError::Allocation`] instead of aborting.
    pub fn try_new(size: Size) -> Result<Self, SurfaceError> {
        let stride = size.height.div_ceil(8) as usize;
        let len = stride * size.width as usize;
        Ok(Self {
            size,
            stride,
            black: try_plane(len)?,
            red: try_plane(len)?,
        })
    }

    /// Buffer for the 296×128 panel
    pub fn for_panel() -> Result<Self, SurfaceError> {
        Self::try_new(Size::new(PANEL_WIDTH, PANEL_HEIGHT))
    }

    /// Reset every pixel to white
    pub fn clear_white(&mut self) {
        self.black.fill(0);
        self.red.fill(0);
    }

    /// Black ink plane in native scan order
    pub fn black(&self) -> &[u8] {
        &self.black
    }

    /// Red ink plane in native scan order
    pub fn red(&self) -> &[u8] {
        &self.red
    }

    /// Bytes per native row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Color at a landscape coordinate, `None` when out of bounds
    pub fn pixel(&self, point: Point) -> Option<TriColor> {
        let (byte, mask) = self.locate(point)?;
        Some(if self.red[byte] & mask != 0 {
            TriColor::Red
        } else if self.black[byte] & mask != 0 {
            TriColor::Black
        } else {
            TriColor::White
        })
    }

    fn set_pixel(&mut self, point: Point, color: TriColor) {
        let Some((byte, mask)) = self.locate(point) else {
            return;
        };
        let (black, red) = match color {
            TriColor::White => (false, false),
            TriColor::Black => (true, false),
            TriColor::Red => (false, true),
        };
        set_bit(&mut self.black[byte], mask, black);
        set_bit(&mut self.red[byte], mask, red);
    }

    /// Map a landscape point to (byte index, bit mask) in a plane
    fn locate(&self, point: Point) -> Option<(usize, u8)> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        // Quarter turn: landscape x runs along gate lines, y runs
        // backwards along source lines
        let column = (self.size.height - 1 - y) as usize;
        let row = x as usize;
        Some((row * self.stride + column / 8, 0x80 >> (column % 8)))
    }
}

fn try_plane(len: usize) -> Result<Vec<u8>, SurfaceError> {
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(len)
        .map_err(|_| SurfaceError::Allocation)?;
    plane.resize(len, 0);
    Ok(plane)
}

fn set_bit(byte: &mut u8, mask: u8, on: bool) {
    if on {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = TriColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_plane_size() {
        let frame = FrameBuffer::for_panel().unwrap();
        assert_eq!(frame.stride(), 16);
        assert_eq!(frame.black().len(), 16 * 296);
        assert_eq!(frame.red().len(), 16 * 296);
        assert!(frame.black().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_origin_maps_to_last_source_bit() {
        let mut frame = FrameBuffer::for_panel().unwrap();
        Pixel(Point::new(0, 0), TriColor::Black)
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.black()[15], 0x01);
        assert_eq!(frame.pixel(Point::new(0, 0)), Some(TriColor::Black));

        Pixel(Point::new(1, 127), TriColor::Red)
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.red()[16], 0x80);
    }

    #[test]
    fn test_colors_are_exclusive() {
        let mut frame = FrameBuffer::for_panel().unwrap();
        let p = Point::new(10, 20);
        Pixel(p, TriColor::Red).draw(&mut frame).unwrap();
        Pixel(p, TriColor::Black).draw(&mut frame).unwrap();
        assert_eq!(frame.pixel(p), Some(TriColor::Black));
        assert!(frame.red().iter().all(|&b| b == 0));

        Pixel(p, TriColor::White).draw(&mut frame).unwrap();
        assert_eq!(frame.pixel(p), Some(TriColor::White));
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut frame = FrameBuffer::for_panel().unwrap();
        Pixel(Point::new(-1, 0), TriColor::Black)
            .draw(&mut frame)
            .unwrap();
        Pixel(Point::new(296, 0), TriColor::Black)
            .draw(&mut frame)
            .unwrap();
        Pixel(Point::new(0, 128), TriColor::Black)
            .draw(&mut frame)
            .unwrap();
        assert!(frame.black().iter().all(|&b| b == 0));
        assert_eq!(frame.pixel(Point::new(0, 128)), None);
    }

    #[test]
    fn test_clear_white() {
        let mut frame = FrameBuffer::for_panel().unwrap();
        frame.clear(TriColor::Red).unwrap();
        assert!(frame.red().iter().all(|&b| b == 0xFF));
        frame.clear_white();
        assert!(frame.red().iter().all(|&b| b == 0));
    }
}
