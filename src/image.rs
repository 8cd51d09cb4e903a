//! Image collaborator seams.
//!
//! Decoding an image file and presenting one on screen are external
//! concerns; this crate only defines the traits it calls through. Decoding
//! is slow, so the session controller always runs it *before* entering the
//! registry critical section, never on the callback path.

use crate::error::ImageError;
use crate::frame::PixelFrame;

/// Decodes an asset uri into a BGRA8 premultiplied pixel buffer.
pub trait ImageSource {
    /// Decode the asset at `uri` into `frame`, replacing its contents.
    /// The frame arrives sized to the device's suggested bitmap bounds and
    /// the decoder is expected to scale into it.
    fn decode(&mut self, uri: &str, frame: &mut PixelFrame) -> Result<(), ImageError>;
}

/// Presentation-side display of the image being mirrored to the devices.
/// Purely cosmetic; effect playback does not depend on it.
pub trait ImagePresenter {
    /// Show the asset at `uri` on screen.
    fn show(&mut self, uri: &str);
    /// Clear whatever static image is currently displayed.
    fn clear(&mut self);
}

/// No-op presenter for headless hosts and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl ImagePresenter for NullPresenter {
    fn show(&mut self, _uri: &str) {}

    fn clear(&mut self) {}
}
