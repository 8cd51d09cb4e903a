//! Per-device record: identity, geometry, brightness and effect state.

use heapless::String;

use crate::canvas::SquareCanvas;
use crate::frame::{BitmapBounds, PixelFrame};
use crate::playlist::{Playlist, PlaylistToken};
use crate::snake::SnakeState;

/// Maximum length of a device id string.
pub const MAX_ID_LEN: usize = 64;
/// Maximum length of a device display name.
pub const MAX_NAME_LEN: usize = 48;

/// Opaque stable device identifier, assigned at discovery.
pub type DeviceId = String<MAX_ID_LEN>;
/// Human-readable device name, cosmetic only.
pub type DeviceName = String<MAX_NAME_LEN>;

/// Discovery-time description of a lamp array.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub name: DeviceName,
    /// Number of individually addressable lamps; fixed while connected.
    pub lamp_count: u16,
    /// Hardware-suggested drawing surface for bitmap effects.
    pub suggested_bitmap: BitmapBounds,
}

/// Device brightness as a 0-100 slider level.
///
/// The fraction handed to hardware is always `level / 100.0` computed in
/// floating point; levels above 100 clamp. This is the one conversion used
/// everywhere brightness is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness(u8);

impl Brightness {
    pub const FULL: Self = Self(100);

    pub const fn from_level(level: u8) -> Self {
        Self(if level > 100 { 100 } else { level })
    }

    pub const fn level(self) -> u8 {
        self.0
    }

    /// Fraction in `[0.0, 1.0]`.
    pub fn fraction(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::FULL
    }
}

/// Which effect currently owns the device's update callbacks, together with
/// that effect's mutable animation state.
#[derive(Debug, Clone, Default)]
pub enum ActiveEffect {
    /// No effect session targets this device.
    #[default]
    None,
    /// Snake trail; holds the head cursor and trail color.
    Snake(SnakeState),
    /// Generated moving-square bitmap; holds the drawing canvas.
    Canvas(SquareCanvas),
    /// Static decoded image served on every bitmap callback.
    Image(PixelFrame),
    /// Playlist-only effects (blink fade, color ramps) advanced entirely by
    /// the hardware subsystem; no callback state.
    Scripted,
}

impl ActiveEffect {
    /// Stable name for diagnostics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Snake(_) => "snake",
            Self::Canvas(_) => "canvas",
            Self::Image(_) => "image",
            Self::Scripted => "scripted",
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One registered lamp array.
///
/// Animation state is owned exclusively by this record and only ever touched
/// under the registry critical section, so there is a single flat locking
/// story across discovery, session commands and hardware callbacks.
#[derive(Debug)]
pub struct LampArrayDevice {
    pub id: DeviceId,
    pub display_name: DeviceName,
    pub lamp_count: u16,
    pub suggested_bitmap: BitmapBounds,
    pub brightness: Brightness,
    pub active: ActiveEffect,
    pub playlist: Playlist,
}

impl LampArrayDevice {
    pub fn new(info: DeviceInfo, brightness: Brightness, playlist_token: PlaylistToken) -> Self {
        Self {
            id: info.id,
            display_name: info.name,
            lamp_count: info.lamp_count,
            suggested_bitmap: info.suggested_bitmap,
            brightness,
            active: ActiveEffect::None,
            playlist: Playlist::new(playlist_token),
        }
    }

    /// Reset effect-scoped state for a new session, keeping identity,
    /// geometry and brightness.
    pub fn reset_effect_state(&mut self, playlist_token: PlaylistToken) {
        self.active = ActiveEffect::None;
        self.playlist = Playlist::new(playlist_token);
    }
}
