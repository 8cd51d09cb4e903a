//! Small deterministic random generator for effect colors.
//!
//! The fade-in/out effect assigns every lamp a random color at build time.
//! The generator is injected by the caller so that tests can seed it and
//! replay the exact color assignment; production callers seed it from
//! whatever entropy the platform has.

use crate::color::Rgb;

/// Xorshift32 generator. Not cryptographic, just cheap and portable.
#[derive(Debug, Clone)]
pub struct FrameRng {
    state: u32,
}

impl FrameRng {
    /// Create a generator from a seed. A zero seed is remapped since
    /// xorshift has a fixed point at zero.
    pub const fn seeded(seed: u32) -> Self {
        let state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { state }
    }

    /// Next raw 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value in `[0, 255]`.
    pub fn next_u8(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }

    /// Next fully opaque color with independently random channels.
    pub fn next_color(&mut self) -> Rgb {
        Rgb::new(self.next_u8(), self.next_u8(), self.next_u8())
    }
}
