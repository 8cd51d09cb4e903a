//! Bitmap frame buffer shared by the compositor and the image path.
//!
//! Frames are BGRA8 with premultiplied alpha, `width * height * 4` bytes,
//! which is the layout the bitmap effect hands to the hardware. Buffers are
//! fixed-capacity and reused across frames: the update callback runs on a
//! real-time cadence and must never allocate.

use heapless::Vec;

use crate::color::Rgb;

/// Largest supported drawing surface width, in pixels.
pub const MAX_FRAME_WIDTH: u16 = 64;
/// Largest supported drawing surface height, in pixels.
pub const MAX_FRAME_HEIGHT: u16 = 64;
/// Backing capacity for one frame.
pub const MAX_FRAME_BYTES: usize = MAX_FRAME_WIDTH as usize * MAX_FRAME_HEIGHT as usize * 4;

/// Dimensions of a device's suggested drawing surface.
///
/// Reported by the hardware at discovery and fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapBounds {
    pub width: u16,
    pub height: u16,
}

impl BitmapBounds {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    const fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Error returned when a device reports a surface larger than the crate
/// can back. The device is excluded from the session, not the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTooLarge(pub BitmapBounds);

/// A reusable BGRA8 premultiplied pixel buffer.
#[derive(Debug, Clone)]
pub struct PixelFrame {
    bounds: BitmapBounds,
    data: Vec<u8, MAX_FRAME_BYTES>,
}

impl PixelFrame {
    /// Allocate a zeroed (transparent black) frame for `bounds`.
    pub fn new(bounds: BitmapBounds) -> Result<Self, FrameTooLarge> {
        if bounds.width > MAX_FRAME_WIDTH || bounds.height > MAX_FRAME_HEIGHT {
            return Err(FrameTooLarge(bounds));
        }
        let mut data = Vec::new();
        // Capacity checked above, resize cannot fail.
        let _ = data.resize(bounds.byte_len(), 0);
        Ok(Self { bounds, data })
    }

    pub const fn bounds(&self) -> BitmapBounds {
        self.bounds
    }

    pub const fn width(&self) -> u16 {
        self.bounds.width
    }

    pub const fn height(&self) -> u16 {
        self.bounds.height
    }

    /// Raw BGRA bytes, row-major, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Fill the whole frame with one opaque color.
    pub fn clear(&mut self, color: Rgb) {
        for px in self.data.chunks_exact_mut(4) {
            write_bgra(px, color);
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the frame bounds.
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb) {
        let x_end = x.saturating_add(w).min(self.bounds.width);
        let y_end = y.saturating_add(h).min(self.bounds.height);
        let stride = self.bounds.width as usize * 4;
        for row in y..y_end {
            let row_start = row as usize * stride;
            for col in x..x_end {
                let at = row_start + col as usize * 4;
                write_bgra(&mut self.data[at..at + 4], color);
            }
        }
    }

    /// Read back one pixel as an `Rgb`. Out-of-bounds coordinates yield
    /// `None` rather than panicking on the callback path.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb> {
        if x >= self.bounds.width || y >= self.bounds.height {
            return None;
        }
        let at = (y as usize * self.bounds.width as usize + x as usize) * 4;
        let px = &self.data[at..at + 4];
        Some(Rgb::new(px[2], px[1], px[0]))
    }
}

/// Write one opaque pixel. With alpha at 255 the premultiplied channels
/// equal the straight channels, so no multiply is needed.
#[inline]
fn write_bgra(px: &mut [u8], color: Rgb) {
    px[0] = color.b;
    px[1] = color.g;
    px[2] = color.r;
    px[3] = 0xFF;
}
