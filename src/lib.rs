#![no_std]

//! Multi-device RGB lamp array effect engine.
//!
//! Maintains a registry of hot-pluggable lamp array devices and drives
//! per-device lighting effects whose frames are computed on demand when the
//! hardware requests them. Platform concerns (device enumeration, the
//! effect playback subsystem, image decoding, on-screen presentation,
//! vendor transports) are trait seams; everything behind them is portable
//! `no_std` code with fixed capacities and no allocation on the frame path.

pub mod canvas;
pub mod color;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod frame;
pub mod image;
pub mod playlist;
pub mod registry;
pub mod rng;
pub mod session;
pub mod snake;
pub mod vendor;
pub mod watcher;

pub use canvas::SquareCanvas;
pub use color::Rgb;
pub use device::{ActiveEffect, Brightness, DeviceId, DeviceInfo, DeviceName, LampArrayDevice};
pub use dispatch::{BitmapSink, CallbackDispatcher, LampColorSink};
pub use error::{BuildError, ImageError, TransportError, VendorError};
pub use events::{DiscoveryEvent, DiscoveryQueue, SummaryQueue, SummaryUpdate};
pub use frame::{BitmapBounds, PixelFrame};
pub use image::{ImagePresenter, ImageSource, NullPresenter};
pub use playlist::{
    CompletionBehavior, EffectDescriptor, EffectKind, EffectToken, INFINITE_DURATION, LampTargets,
    Playlist, PlaylistToken, RepetitionMode, StartMode,
};
pub use registry::DeviceRegistry;
pub use rng::FrameRng;
pub use session::{EffectScheduler, SessionController};
pub use snake::{SNAKE_TRAIL_LENGTH, SnakeState};
pub use vendor::VendorTransport;
pub use watcher::DiscoveryWatcher;

pub use embassy_time::Duration;
