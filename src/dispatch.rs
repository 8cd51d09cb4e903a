//! Update callback dispatcher.
//!
//! The hardware effect subsystem invokes these entry points at each
//! effect's configured update interval. The dispatcher resolves the effect
//! token back to its owning device under the registry critical section,
//! computes the next frame from the device's own animation state and writes
//! it to the hardware-facing sink.
//!
//! The work done here is bounded and allocation-free: the lock is shared
//! with the discovery path and the callback arrives on a real-time cadence.
//! A token that no longer resolves (effect stopped, device unplugged
//! mid-session) produces no frame and reports `false`; the sink simply
//! keeps its previous contents, which is harmless.

use crate::color::Rgb;
use crate::device::ActiveEffect;
use crate::frame::PixelFrame;
use crate::playlist::EffectToken;
use crate::registry::{DeviceRegistry, RegistryInner};

/// Hardware-facing sink for per-lamp color frames, mirroring the lamp
/// array's update-request arguments.
pub trait LampColorSink {
    /// Set every lamp on the device to one color.
    fn set_color(&mut self, color: Rgb);
    /// Set `indices[i]` to `colors[i]` for each position.
    fn set_colors_for_indices(&mut self, colors: &[Rgb], indices: &[u16]);
}

/// Hardware-facing sink for bitmap frames.
pub trait BitmapSink {
    /// Hand the next BGRA frame to the hardware.
    fn update_bitmap(&mut self, frame: &PixelFrame);
}

/// Resolves callback tokens and produces frames.
pub struct CallbackDispatcher<'a> {
    registry: &'a DeviceRegistry,
}

impl<'a> CallbackDispatcher<'a> {
    pub const fn new(registry: &'a DeviceRegistry) -> Self {
        Self { registry }
    }

    /// Per-lamp color callback (the snake effect).
    ///
    /// Returns `true` when a frame was produced.
    pub fn update_requested(&self, token: EffectToken, sink: &mut dyn LampColorSink) -> bool {
        self.registry.with_inner_mut(|inner| {
            let Some((lamp_count, active)) = resolve(inner, token) else {
                return false;
            };
            match active {
                ActiveEffect::Snake(state) => {
                    state.render_frame(lamp_count, sink);
                    true
                }
                _ => false,
            }
        })
    }

    /// Bitmap frame callback (generated square or static image).
    ///
    /// Returns `true` when a frame was produced.
    pub fn bitmap_requested(&self, token: EffectToken, sink: &mut dyn BitmapSink) -> bool {
        self.registry.with_inner_mut(|inner| {
            let Some((_, active)) = resolve(inner, token) else {
                return false;
            };
            match active {
                ActiveEffect::Canvas(canvas) => {
                    sink.update_bitmap(canvas.render_next());
                    true
                }
                ActiveEffect::Image(frame) => {
                    sink.update_bitmap(frame);
                    true
                }
                _ => false,
            }
        })
    }
}

/// Token -> owning device's geometry and mutable effect state.
fn resolve(inner: &mut RegistryInner, token: EffectToken) -> Option<(u16, &mut ActiveEffect)> {
    let RegistryInner {
        devices, tokens, ..
    } = inner;
    let id = tokens.get(&token.raw())?;
    let device = devices.get_mut(id)?;
    Some((device.lamp_count, &mut device.active))
}
