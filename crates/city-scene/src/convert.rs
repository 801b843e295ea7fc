//! Conversions between core world types and engine render types.
//!
//! The core works in `f64` world units and plain color structs; the
//! precision drop to `f32` happens here, at the presentation boundary,
//! and nowhere else.

use bevy::prelude::*;

use city_events::Rgb;

/// Core world position to render-space vector.
pub fn to_render(v: city_events::Vec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

/// Core color to engine color.
pub fn to_color(c: Rgb) -> Color {
    Color::srgb(c.r, c.g, c.b)
}
