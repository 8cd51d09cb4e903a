//! Effect descriptors and per-device playlists.
//!
//! A descriptor is the declarative half of an effect: what kind it is, which
//! lamps it targets, and its timing. The hardware effect subsystem consumes
//! descriptors and drives the callback-based kinds through
//! [`crate::dispatch`]. Descriptors never hold animation state; that lives
//! in the owning device record.

use embassy_time::Duration;
use heapless::Vec;

use crate::color::Rgb;

/// Maximum descriptors in one playlist. The fade effect appends one blink
/// descriptor per lamp, so this also caps the lamp count that effect
/// supports; larger devices fail their build step and are excluded.
pub const MAX_PLAYLIST_EFFECTS: usize = 64;

/// Effect duration meaning "run until explicitly stopped".
pub const INFINITE_DURATION: Duration = Duration::from_ticks(u64::MAX);

/// Update cadence of the bitmap-based effects.
pub const BITMAP_UPDATE_INTERVAL: Duration = Duration::from_millis(33);
/// Update cadence of the snake effect.
pub const SNAKE_UPDATE_INTERVAL: Duration = Duration::from_millis(35);

/// Identifies one callback-driven effect instance for the session's
/// lifetime. Allocated at build time, resolved back to the owning device by
/// the dispatcher, forgotten at cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectToken(u32);

impl EffectToken {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Identifies one playlist generation for batch start/stop commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistToken(u32);

impl PlaylistToken {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Monotonic allocator for effect and playlist tokens. Owned by the session
/// controller; tokens are never reused within a process.
#[derive(Debug, Default)]
pub struct TokenAllocator {
    next: u32,
}

impl TokenAllocator {
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    pub fn effect(&mut self) -> EffectToken {
        let token = EffectToken(self.next);
        self.next += 1;
        token
    }

    pub fn playlist(&mut self) -> PlaylistToken {
        let token = PlaylistToken(self.next);
        self.next += 1;
        token
    }
}

/// Which lamps an effect drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampTargets {
    /// Every lamp on the device.
    All,
    /// A single lamp index.
    One(u16),
}

/// What happens when a finite effect completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionBehavior {
    /// Lamps revert to their pre-effect state.
    ClearState,
    /// Lamps hold the effect's final colors until something replaces them.
    KeepState,
}

/// Whether an effect (or playlist) repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepetitionMode {
    Once,
    Forever,
}

/// How the playlist's effects begin relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// All effects start together.
    Simultaneous,
    /// Effects run one after another.
    Sequential,
}

/// Declarative effect specification handed to the hardware subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectKind {
    /// Hardware requests a pixel-buffer frame via the dispatcher every
    /// `update_interval`.
    BitmapCallback { update_interval: Duration },
    /// Hardware requests per-lamp colors via the dispatcher every
    /// `update_interval`.
    CustomCallback { update_interval: Duration },
    /// Hardware-driven attack/sustain/decay blink on the target lamps.
    Blink {
        color: Rgb,
        attack: Duration,
        sustain: Duration,
        decay: Duration,
        repetition_delay: Duration,
        repetition: RepetitionMode,
    },
    /// Hardware-driven ramp to `color` over `ramp_duration`.
    ColorRamp {
        color: Rgb,
        ramp_duration: Duration,
        completion: CompletionBehavior,
    },
}

impl EffectKind {
    /// Whether this kind is resolved through the callback dispatcher.
    pub const fn is_callback(&self) -> bool {
        matches!(self, Self::BitmapCallback { .. } | Self::CustomCallback { .. })
    }

    /// Stable name for diagnostics and shape comparisons.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BitmapCallback { .. } => "bitmap_callback",
            Self::CustomCallback { .. } => "custom_callback",
            Self::Blink { .. } => "blink",
            Self::ColorRamp { .. } => "color_ramp",
        }
    }
}

/// One scheduled effect on one device.
#[derive(Debug, Clone)]
pub struct EffectDescriptor {
    pub token: EffectToken,
    pub kind: EffectKind,
    pub targets: LampTargets,
    /// [`INFINITE_DURATION`] means "until stopped".
    pub duration: Duration,
    pub z_index: u8,
}

impl EffectDescriptor {
    /// An infinite callback-driven effect over all lamps, the shape shared
    /// by the bitmap and snake programs.
    pub const fn infinite_callback(token: EffectToken, kind: EffectKind) -> Self {
        Self {
            token,
            kind,
            targets: LampTargets::All,
            duration: INFINITE_DURATION,
            z_index: 0,
        }
    }
}

/// Error returned when a playlist has no room for another descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistFull;

/// Ordered effects scheduled together on one device.
#[derive(Debug, Clone)]
pub struct Playlist {
    token: PlaylistToken,
    effects: Vec<EffectDescriptor, MAX_PLAYLIST_EFFECTS>,
    pub start_mode: StartMode,
    pub repetition: RepetitionMode,
}

impl Playlist {
    /// A fresh playlist in the default configuration every device gets at
    /// registration and after each cleanup.
    pub fn new(token: PlaylistToken) -> Self {
        Self {
            token,
            effects: Vec::new(),
            start_mode: StartMode::Simultaneous,
            repetition: RepetitionMode::Once,
        }
    }

    pub const fn token(&self) -> PlaylistToken {
        self.token
    }

    pub fn append(&mut self, descriptor: EffectDescriptor) -> Result<(), PlaylistFull> {
        self.effects.push(descriptor).map_err(|_| PlaylistFull)
    }

    pub fn effects(&self) -> &[EffectDescriptor] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}
