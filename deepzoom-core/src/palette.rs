//! Cyclic hue palette for escape counts.
//!
//! Maps a (possibly smoothed) iteration count onto the hue wheel:
//! `h = ((value + offset) / length) mod 1`, full saturation, 50% lightness.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Iterations per full trip around the hue wheel.
    pub length: f64,
    /// Rotation of the wheel, in iterations.
    pub offset: f64,
}

impl Palette {
    pub const DEFAULT: Palette = Palette {
        length: 250.0,
        offset: 15.0,
    };

    pub const SUNSET: Palette = Palette {
        length: 250.0,
        offset: 130.0,
    };

    pub const UNSHIFTED: Palette = Palette {
        length: 250.0,
        offset: 0.0,
    };

    pub fn by_name(name: &str) -> Option<Palette> {
        match name {
            "default" => Some(Self::DEFAULT),
            "sunset" => Some(Self::SUNSET),
            "unshifted" => Some(Self::UNSHIFTED),
            _ => None,
        }
    }

    /// Color for an escape value. Zero (inside the set), negative and
    /// non-finite values are black.
    pub fn color_of(&self, value: f64) -> [u8; 3] {
        if !value.is_finite() || value <= 0.0 || self.length <= 0.0 {
            return [0, 0, 0];
        }
        let hue = ((value + self.offset) / self.length).rem_euclid(1.0);
        let [r, g, b] = hsl_to_rgb(hue, 1.0, 0.5);
        [to_byte(r), to_byte(g), to_byte(b)]
    }

    /// Opaque RGBA color for an escape value.
    pub fn rgba_of(&self, value: f64) -> [u8; 4] {
        let [r, g, b] = self.color_of(value);
        [r, g, b, 255]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[inline]
fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// HSL to RGB, all components in [0, 1].
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
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
