//! Lamp color type and channel math.
//!
//! Colors are plain `RGB8` values from `smart-leds`; the hardware byte
//! layouts (BGRA frames) are handled in [`crate::frame`]. Lamp alpha is
//! always fully opaque, so no alpha channel is carried here.

use smart_leds::RGB8;

pub type Rgb = RGB8;

/// All lamps off.
pub const BLACK: Rgb = Rgb::new(0, 0, 0);
/// Background color of the generated-bitmap effect.
pub const BLUE: Rgb = Rgb::new(0, 0, 255);
/// Accent color of the generated-bitmap effect.
pub const RED: Rgb = Rgb::new(255, 0, 0);
/// Second color-cycle step.
pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
/// Third color-cycle step.
pub const GREEN: Rgb = Rgb::new(0, 128, 0);
/// Default snake trail color.
pub const HOT_PINK: Rgb = Rgb::new(255, 105, 180);

/// Scale every channel of `color` by `factor` in `[0.0, 1.0]`.
///
/// Channel values truncate toward zero, so a factor of `1/N` on a dim
/// channel can reach zero exactly. Factors outside the range are clamped.
pub fn scale_color(color: Rgb, factor: f32) -> Rgb {
    let factor = factor.clamp(0.0, 1.0);
    Rgb::new(
        (f32::from(color.r) * factor) as u8,
        (f32::from(color.g) * factor) as u8,
        (f32::from(color.b) * factor) as u8,
    )
}
