//! Effect session orchestration.
//!
//! A session is "whatever effect is currently running across all registered
//! devices". Starting a new effect always runs three phases:
//!
//! 1. *cleanup*: stop and discard every device's current playlist, reset
//!    effect-local state, clear the displayed image;
//! 2. *build*: populate a fresh playlist per device; one device failing
//!    (bad geometry, full playlist, asset decode) is logged and excluded
//!    without touching the others;
//! 3. *commit*: issue a single batched start for every playlist that was
//!    built. Batched start is a best-effort simultaneity request to the
//!    hardware, not a guaranteed atomic start.

use embassy_time::Duration;
use heapless::Vec;

use crate::canvas::SquareCanvas;
use crate::color::{self, Rgb};
use crate::device::{ActiveEffect, Brightness, DeviceId, LampArrayDevice};
use crate::error::{BuildError, ImageError, VendorError};
use crate::frame::{BitmapBounds, PixelFrame};
use crate::image::{ImagePresenter, ImageSource};
use crate::playlist::{
    BITMAP_UPDATE_INTERVAL, CompletionBehavior, EffectDescriptor, EffectKind, INFINITE_DURATION,
    LampTargets, PlaylistToken, RepetitionMode, SNAKE_UPDATE_INTERVAL, StartMode, TokenAllocator,
};
use crate::registry::{DeviceRegistry, MAX_DEVICES, RegistryInner};
use crate::rng::FrameRng;
use crate::snake::SnakeState;
use crate::vendor::{PING_MESSAGE_ID, PING_PAYLOAD, VendorTransport};

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Hardware effect subsystem seam: batched playlist playback commands.
pub trait EffectScheduler {
    /// Request that all listed playlists start together.
    fn start_all(&mut self, playlists: &[PlaylistToken]);
    /// Request that all listed playlists stop.
    fn stop_all(&mut self, playlists: &[PlaylistToken]);
}

/// A batch of playlist tokens for one start/stop command.
type PlaylistBatch = Vec<PlaylistToken, MAX_DEVICES>;

/// Orchestrates effect sessions over the registry.
pub struct SessionController<'a, S: EffectScheduler, P: ImagePresenter> {
    registry: &'a DeviceRegistry,
    scheduler: S,
    presenter: P,
    brightness: Brightness,
    running: bool,
}

impl<'a, S: EffectScheduler, P: ImagePresenter> SessionController<'a, S, P> {
    pub fn new(registry: &'a DeviceRegistry, scheduler: S, presenter: P) -> Self {
        Self {
            registry,
            scheduler,
            presenter,
            brightness: Brightness::FULL,
            running: false,
        }
    }

    /// Whether a session is currently marked running.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The global brightness level applied to newly added devices.
    pub const fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Apply a new brightness slider level to every device.
    ///
    /// Single-field update; animation state and playlists are untouched.
    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = Brightness::from_level(level);
        self.registry.set_brightness_all(self.brightness);
    }

    /// Stop and discard the current session.
    ///
    /// Safe to call with an empty registry (silent no-op) or when nothing
    /// is running (stopping a stopped playlist is harmless).
    pub fn cleanup(&mut self) {
        let stopped: Option<PlaylistBatch> = self.registry.with_inner_mut(|inner| {
            if inner.devices.is_empty() {
                return None;
            }
            let mut batch = PlaylistBatch::new();
            for device in inner.devices.values_mut() {
                let _ = batch.push(device.playlist.token());
                let fresh = inner.allocator.playlist();
                device.reset_effect_state(fresh);
            }
            // Drop the whole callback-token generation; late callbacks for
            // the old session will resolve to nothing.
            inner.tokens = heapless::FnvIndexMap::new();
            Some(batch)
        });

        if let Some(batch) = stopped {
            self.scheduler.stop_all(&batch);
            self.presenter.clear();
            self.running = false;
        }
    }

    /// Replace the running session: cleanup, then build a playlist per
    /// device with `build`, then commit with one batched start.
    ///
    /// A device whose build step fails keeps no active effect and its
    /// playlist is not started; every other device still gets its effect.
    pub fn start_effect<F>(&mut self, mut build: F)
    where
        F: FnMut(&mut LampArrayDevice, &mut TokenAllocator) -> Result<(), BuildError>,
    {
        self.cleanup();

        let batch: PlaylistBatch = self.registry.with_inner_mut(|inner| {
            let RegistryInner {
                devices,
                tokens,
                allocator,
            } = inner;

            let mut batch = PlaylistBatch::new();
            for device in devices.values_mut() {
                match build(device, &mut *allocator) {
                    Ok(()) => {
                        for descriptor in device.playlist.effects() {
                            if descriptor.kind.is_callback() {
                                let _ = tokens.insert(descriptor.token.raw(), device.id.clone());
                            }
                        }
                        if !device.playlist.is_empty() {
                            let _ = batch.push(device.playlist.token());
                        }
                    }
                    Err(_err) => {
                        #[cfg(feature = "esp32-log")]
                        println!(
                            "[session] build failed for {}: {:?}, device skipped",
                            device.id.as_str(),
                            _err
                        );
                        let fresh = allocator.playlist();
                        device.reset_effect_state(fresh);
                    }
                }
            }
            batch
        });

        self.scheduler.start_all(&batch);
        self.running = true;
    }

    /// Mirror a decoded image file to every device.
    ///
    /// Decoding runs here, before the registry lock is taken; the callback
    /// path later serves the ready-made frames without any I/O.
    pub fn show_image<I: ImageSource>(&mut self, uri: &str, source: &mut I) {
        type Surfaces = Vec<(DeviceId, BitmapBounds), MAX_DEVICES>;
        type Decoded = Vec<(DeviceId, Option<Result<PixelFrame, BuildError>>), MAX_DEVICES>;

        // Snapshot the surfaces under the lock, then decode on the snapshot
        // with no lock held; discovery and update callbacks keep flowing
        // while the decoder works.
        let mut surfaces: Surfaces = Vec::new();
        self.registry.for_each(|device| {
            let _ = surfaces.push((device.id.clone(), device.suggested_bitmap));
        });

        let mut decoded: Decoded = Vec::new();
        for (id, bounds) in surfaces {
            let result = PixelFrame::new(bounds)
                .map_err(BuildError::from)
                .and_then(|mut frame| {
                    source.decode(uri, &mut frame)?;
                    Ok(frame)
                });
            let _ = decoded.push((id, Some(result)));
        }

        self.start_effect(|device, tokens| {
            let frame = decoded
                .iter_mut()
                .find(|(id, _)| *id == device.id)
                .and_then(|(_, slot)| slot.take())
                .unwrap_or(Err(BuildError::Image(ImageError::NotFound)))?;

            let token = tokens.effect();
            device.playlist.append(EffectDescriptor::infinite_callback(
                token,
                EffectKind::BitmapCallback {
                    update_interval: BITMAP_UPDATE_INTERVAL,
                },
            ))?;
            device.active = ActiveEffect::Image(frame);
            Ok(())
        });

        self.presenter.show(uri);
    }

    /// Start the generated moving-square bitmap effect on every device.
    pub fn start_generated_bitmap(&mut self) {
        self.start_effect(|device, tokens| {
            let canvas = SquareCanvas::new(device.suggested_bitmap)?;
            let token = tokens.effect();
            device.playlist.append(EffectDescriptor::infinite_callback(
                token,
                EffectKind::BitmapCallback {
                    update_interval: BITMAP_UPDATE_INTERVAL,
                },
            ))?;
            device.active = ActiveEffect::Canvas(canvas);
            Ok(())
        });
    }

    /// Start the snake trail effect on every device.
    pub fn start_snake(&mut self) {
        self.start_effect(|device, tokens| {
            device.playlist.repetition = RepetitionMode::Forever;
            let token = tokens.effect();
            device.playlist.append(EffectDescriptor::infinite_callback(
                token,
                EffectKind::CustomCallback {
                    update_interval: SNAKE_UPDATE_INTERVAL,
                },
            ))?;
            device.active = ActiveEffect::Snake(SnakeState::new(color::HOT_PINK));
            Ok(())
        });
    }

    /// Start the fade-in/out effect: every lamp blinks forever in its own
    /// random color. Devices with more lamps than a playlist can describe
    /// fail their build step and are excluded.
    pub fn start_fade_in_out(&mut self, rng: &mut FrameRng) {
        self.start_effect(|device, tokens| {
            for lamp in 0..device.lamp_count {
                device.playlist.append(EffectDescriptor {
                    token: tokens.effect(),
                    kind: EffectKind::Blink {
                        color: rng.next_color(),
                        attack: Duration::from_millis(300),
                        sustain: Duration::from_millis(500),
                        decay: Duration::from_millis(800),
                        repetition_delay: Duration::from_millis(100),
                        repetition: RepetitionMode::Forever,
                    },
                    targets: LampTargets::One(lamp),
                    duration: INFINITE_DURATION,
                    z_index: 0,
                })?;
            }
            device.active = ActiveEffect::Scripted;
            Ok(())
        });
    }

    /// Start the primary color cycle: red, yellow, green and blue ramps run
    /// one after another and loop forever; each ramp holds its end color.
    pub fn start_color_cycle(&mut self) {
        const RAMP_DURATION: Duration = Duration::from_millis(500);
        const CYCLE: [Rgb; 4] = [color::RED, color::YELLOW, color::GREEN, color::BLUE];

        self.start_effect(|device, tokens| {
            device.playlist.repetition = RepetitionMode::Forever;
            device.playlist.start_mode = StartMode::Sequential;
            for step in CYCLE {
                device.playlist.append(EffectDescriptor {
                    token: tokens.effect(),
                    kind: EffectKind::ColorRamp {
                        color: step,
                        ramp_duration: RAMP_DURATION,
                        completion: CompletionBehavior::KeepState,
                    },
                    targets: LampTargets::All,
                    duration: RAMP_DURATION,
                    z_index: 0,
                })?;
            }
            device.active = ActiveEffect::Scripted;
            Ok(())
        });
    }

    /// Stop everything if running, otherwise start everything again.
    pub fn toggle_all(&mut self) {
        let batch: PlaylistBatch = self.registry.with_inner_mut(|inner| {
            let mut batch = PlaylistBatch::new();
            for device in inner.devices.values() {
                let _ = batch.push(device.playlist.token());
            }
            batch
        });

        if self.running {
            self.scheduler.stop_all(&batch);
            self.running = false;
        } else {
            self.scheduler.start_all(&batch);
            self.running = true;
        }
    }

    /// Exchange the demo vendor ping with the first registered device.
    ///
    /// Cleans up any running session first, then reports the outcome;
    /// failures never alter effect state.
    pub fn send_vendor_ping<T: VendorTransport>(
        &mut self,
        transport: &mut T,
        reply: &mut [u8],
    ) -> Result<usize, VendorError> {
        self.cleanup();
        let result = crate::vendor::exchange_with_first(
            self.registry,
            transport,
            PING_MESSAGE_ID,
            &PING_PAYLOAD,
            reply,
        );
        #[cfg(feature = "esp32-log")]
        if let Err(err) = &result {
            println!("[session] vendor exchange failed: {:?}", err);
        }
        result
    }
}
