//! Deterministic record colors.
//!
//! Each category has a fixed palette; a record's base color is
//! `palette[index % len]`, independent of where the record was placed. On
//! top of the base color every record gets a small hue offset derived from
//! its stable id, so two adjacent records sharing a palette slot still read
//! as distinct buildings.

use city_events::{RecordCategory, Rgb};

use crate::rng;

/// Maximum hue offset in degrees, centered on zero.
const HUE_JITTER_DEG: f32 = 24.0;

const PRIMARY_PALETTE: [Rgb; 5] = [
    Rgb { r: 0.16, g: 0.42, b: 0.62 },
    Rgb { r: 0.13, g: 0.52, b: 0.57 },
    Rgb { r: 0.20, g: 0.36, b: 0.70 },
    Rgb { r: 0.10, g: 0.46, b: 0.48 },
    Rgb { r: 0.24, g: 0.50, b: 0.78 },
];

const SECONDARY_PALETTE: [Rgb; 4] = [
    Rgb { r: 0.44, g: 0.30, b: 0.64 },
    Rgb { r: 0.54, g: 0.34, b: 0.56 },
    Rgb { r: 0.38, g: 0.26, b: 0.72 },
    Rgb { r: 0.60, g: 0.40, b: 0.68 },
];

const PROJECT_PALETTE: [Rgb; 5] = [
    Rgb { r: 0.82, g: 0.52, b: 0.18 },
    Rgb { r: 0.78, g: 0.42, b: 0.14 },
    Rgb { r: 0.88, g: 0.62, b: 0.24 },
    Rgb { r: 0.74, g: 0.48, b: 0.28 },
    Rgb { r: 0.84, g: 0.56, b: 0.34 },
];

const INTEREST_PALETTE: [Rgb; 4] = [
    Rgb { r: 0.30, g: 0.56, b: 0.30 },
    Rgb { r: 0.24, g: 0.50, b: 0.36 },
    Rgb { r: 0.38, g: 0.62, b: 0.28 },
    Rgb { r: 0.32, g: 0.58, b: 0.42 },
];

/// The fixed palette for a category.
pub fn palette(category: RecordCategory) -> &'static [Rgb] {
    match category {
        RecordCategory::PrimaryTimeline => &PRIMARY_PALETTE,
        RecordCategory::SecondaryTimeline => &SECONDARY_PALETTE,
        RecordCategory::Project => &PROJECT_PALETTE,
        RecordCategory::Interest => &INTEREST_PALETTE,
    }
}

/// Deterministic display color for one record.
///
/// `id_seed` should already combine the record's stable id with the scene's
/// root seed; the same seed always yields the same color.
pub fn color_for(category: RecordCategory, index: usize, id_seed: i64) -> Rgb {
    let colors = palette(category);
    let base = colors[index % colors.len()];
    let jitter = ((rng::unit(id_seed) as f32) - 0.5) * HUE_JITTER_DEG;
    shift_hue(base, jitter)
}

/// Rotate a color's hue by `degrees`, preserving saturation and lightness.
fn shift_hue(color: Rgb, degrees: f32) -> Rgb {
    let (h, s, l) = rgb_to_hsl(color);
    let shifted = (h + degrees).rem_euclid(360.0);
    hsl_to_rgb(shifted, s, l)
}

fn rgb_to_hsl(color: Rgb) -> (f32, f32, f32) {
    let max = color.r.max(color.g).max(color.b);
    let min = color.r.min(color.g).min(color.b);
    let l = (max + min) * 0.5;
    let delta = max - min;

    if delta.abs() < f32::EPSILON {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if (max - color.r).abs() < f32::EPSILON {
        (color.g - color.b) / delta + if color.g < color.b { 6.0 } else { 0.0 }
    } else if (max - color.g).abs() < f32::EPSILON {
        (color.b - color.r) / delta + 2.0
    } else {
        (color.r - color.g) / delta + 4.0
    };

    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    if s.abs() < f32::EPSILON {
        return Rgb::new(l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hk = h / 360.0;

    Rgb::new(
        hue_component(p, q, hk + 1.0 / 3.0),
        hue_component(p, q, hk),
        hue_component(p, q, hk - 1.0 / 3.0),
    )
}

fn hue_component(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
