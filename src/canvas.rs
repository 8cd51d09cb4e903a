//! Generated-bitmap compositor.
//!
//! Draws a red square travelling over a blue background into an off-screen
//! frame sized to the device's suggested bitmap bounds. One instance lives
//! inside each device record running the effect; the frame buffer is reused
//! on every callback.

use crate::color::{self, Rgb};
use crate::frame::{BitmapBounds, FrameTooLarge, PixelFrame};

/// Side length of the moving square, in logical pixels. Larger than most
/// lamp array surfaces, so the square is clipped and bleeds off the edge
/// while travelling.
const SQUARE_SIZE: u16 = 100;
/// Cursor advance per frame, both axes.
const STEP: u16 = 5;
/// Initial vertical cursor position.
const START_Y: u16 = 25;

const BACKGROUND: Rgb = color::BLUE;
const ACCENT: Rgb = color::RED;

/// Per-device state of the generated-bitmap effect.
#[derive(Debug, Clone)]
pub struct SquareCanvas {
    frame: PixelFrame,
    x: u16,
    y: u16,
}

impl SquareCanvas {
    /// Create a canvas for the device's suggested surface size.
    ///
    /// Fails when the surface exceeds the frame capacity; the session
    /// controller excludes that device and carries on with the rest.
    pub fn new(bounds: BitmapBounds) -> Result<Self, FrameTooLarge> {
        Ok(Self {
            frame: PixelFrame::new(bounds)?,
            x: 0,
            y: START_Y.min(bounds.height),
        })
    }

    /// Current cursor position.
    pub const fn cursor(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    /// Compose the next frame and advance the cursor.
    ///
    /// The cursor wraps to zero once it exceeds its axis bound, checked
    /// immediately after the advance, so it never leaves the surface for a
    /// full frame. The vertical check runs before the horizontal one.
    pub fn render_next(&mut self) -> &PixelFrame {
        self.frame.clear(BACKGROUND);
        self.frame.fill_rect(self.x, self.y, SQUARE_SIZE, SQUARE_SIZE, ACCENT);

        self.x += STEP;
        self.y += STEP;
        if self.y > self.frame.height() {
            self.y = 0;
        }
        if self.x > self.frame.width() {
            self.x = 0;
        }

        &self.frame
    }

    /// The most recently composed frame, without advancing.
    pub const fn frame(&self) -> &PixelFrame {
        &self.frame
    }
}
