//! Error types.
//!
//! Failure policy, crate-wide: anything scoped to one device (geometry,
//! buffer capacity, asset decode) excludes that device and never aborts
//! processing of the others; vendor transport failures are reported to the
//! caller and leave playback state untouched.

use crate::frame::FrameTooLarge;
use crate::playlist::PlaylistFull;

/// Why one device could not be given its effect during the build phase.
///
/// The session controller logs the failure, leaves the device with no
/// active effect and continues with the remaining devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The device's suggested drawing surface exceeds the frame capacity.
    FrameTooLarge(FrameTooLarge),
    /// The effect needs more descriptors than a playlist can hold.
    PlaylistFull,
    /// The image source could not produce a pixel buffer.
    Image(ImageError),
}

impl From<FrameTooLarge> for BuildError {
    fn from(err: FrameTooLarge) -> Self {
        Self::FrameTooLarge(err)
    }
}

impl From<PlaylistFull> for BuildError {
    fn from(_: PlaylistFull) -> Self {
        Self::PlaylistFull
    }
}

impl From<ImageError> for BuildError {
    fn from(err: ImageError) -> Self {
        Self::Image(err)
    }
}

/// Image source failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    /// No asset at the given uri.
    NotFound,
    /// The asset exists but cannot be decoded to BGRA8.
    Unsupported,
    /// The decoded image does not fit a [`crate::frame::PixelFrame`].
    TooLarge,
}

/// Vendor message channel failure, reported to the caller as a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The device did not answer in time.
    Timeout,
    /// The device rejected the message id or payload.
    Rejected,
    /// The device went away mid-exchange.
    Disconnected,
}

/// Failure of a vendor message command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorError {
    /// No device is registered to talk to.
    NoDevices,
    /// The transport reported an error.
    Transport(TransportError),
}

impl From<TransportError> for VendorError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}
