//! Snake trail effect math and per-device state.
//!
//! A fading trail chases an invisible head around the closed loop of lamp
//! indices. The math is pure and bounded: positions and colors are written
//! into fixed stack arrays, never allocated, because it runs inside the
//! hardware update callback while the registry lock is held.

use crate::color::{self, Rgb, scale_color};
use crate::dispatch::LampColorSink;

/// Number of lamps in the trail.
pub const SNAKE_TRAIL_LENGTH: usize = 15;

/// Compute the trail lamp indices behind `head`.
///
/// Walks backward from `head - 1` to `0`, continues from `lamp_count - 1`
/// back down, and keeps the first [`SNAKE_TRAIL_LENGTH`] indices. Position 0
/// is immediately behind the head, the last position is the tail.
///
/// Requires `lamp_count > SNAKE_TRAIL_LENGTH`; shorter devices take the
/// solid-color fallback and never reach this math.
pub fn positions_behind_head(head: u16, lamp_count: u16, out: &mut [u16; SNAKE_TRAIL_LENGTH]) {
    // Widened so the sum cannot overflow near the u16 lamp-count limit.
    let lamps = u32::from(lamp_count);
    for (i, slot) in out.iter_mut().enumerate() {
        let back = i as u32 + 1;
        *slot = ((u32::from(head) + lamps - back) % lamps) as u16;
    }
}

/// Compute the faded trail colors for `base`.
///
/// Position `i` is scaled by `(N - i) / N`: full intensity right behind the
/// head, `1/N` at the tail. Lamp alpha is always fully opaque.
pub fn scaled_trail_colors(base: Rgb, out: &mut [Rgb; SNAKE_TRAIL_LENGTH]) {
    for (i, slot) in out.iter_mut().enumerate() {
        let factor = (SNAKE_TRAIL_LENGTH - i) as f32 / SNAKE_TRAIL_LENGTH as f32;
        *slot = scale_color(base, factor);
    }
}

/// Per-device snake state, owned by the device record.
#[derive(Debug, Clone)]
pub struct SnakeState {
    /// Current head index, always in `[0, lamp_count)`.
    head: u16,
    color: Rgb,
}

impl SnakeState {
    pub const fn new(color: Rgb) -> Self {
        Self { head: 0, color }
    }

    pub const fn head(&self) -> u16 {
        self.head
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Produce one frame of the effect into `sink` and advance the head.
    ///
    /// Every lamp outside the trail is reset to black first; devices tick at
    /// slightly different rates and stale colors would otherwise ghost.
    /// Devices without enough lamps for a trail get a uniform solid color.
    pub fn render_frame(&mut self, lamp_count: u16, sink: &mut dyn LampColorSink) {
        if lamp_count as usize <= SNAKE_TRAIL_LENGTH {
            sink.set_color(self.color);
            return;
        }

        let mut positions = [0u16; SNAKE_TRAIL_LENGTH];
        let mut colors = [color::BLACK; SNAKE_TRAIL_LENGTH];
        positions_behind_head(self.head, lamp_count, &mut positions);
        scaled_trail_colors(self.color, &mut colors);

        sink.set_color(color::BLACK);
        sink.set_colors_for_indices(&colors, &positions);

        self.head += 1;
        if self.head == lamp_count {
            self.head = 0;
        }
    }
}
