//! Color representations and conversions.
//!
//! Colors travel through the crate as `#rrggbb` strings (that is how they are
//! stored in `frame.toml` and shown to users) and are converted to [`Rgb`]
//! right before painting. The HSL helpers back the color-picker grid.
//!
//! | Function | Direction |
//! |---|---|
//! | [`hex_to_rgb`] | `"#336699"` → `Rgb` |
//! | [`rgb_to_hex`] | `Rgb` → `"#336699"` (lowercase) |
//! | [`rgb_to_hsl`] | `Rgb` → `Hsl` (integer degrees / percent) |
//! | [`hsl_to_rgb`], [`hsl_to_hex`] | `Hsl` → `Rgb` / hex |
//! | [`palette_grid`] | gray ramp + hue × saturation × lightness grid |

use std::fmt;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color, falling back to `fallback` when it is malformed.
    pub fn from_hex_or(hex: &str, fallback: Rgb) -> Self {
        hex_to_rgb(hex).unwrap_or(fallback)
    }

    /// RGBA bytes with full opacity.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rgb_to_hex(*self))
    }
}

/// Hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// Parse `#rrggbb` (the `#` is optional, case-insensitive).
///
/// Short `#rgb` forms and anything else are rejected.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Whether `hex` is a well-formed `#rrggbb` color.
pub fn is_valid_hex(hex: &str) -> bool {
    hex.starts_with('#') && hex_to_rgb(hex).is_some()
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    Hsl {
        h: ((h * 360.0).round() as u16) % 360,
        s: (s * 100.0).round() as u8,
        l: (l * 100.0).round() as u8,
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h as f64;
    let l = hsl.l.min(100) as f64 / 100.0;
    let a = hsl.s.min(100) as f64 * l.min(1.0 - l) / 100.0;

    let channel = |n: f64| -> u8 {
        let k = (n + h / 30.0) % 12.0;
        let value = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * value).round().clamp(0.0, 255.0) as u8
    };

    Rgb::new(channel(0.0), channel(8.0), channel(4.0))
}

pub fn hsl_to_hex(hsl: Hsl) -> String {
    rgb_to_hex(hsl_to_rgb(hsl))
}

const GRID_HUES: [u16; 12] = [0, 30, 60, 90, 120, 150, 180, 210, 240, 270, 300, 330];
const GRID_SATURATIONS: [u8; 3] = [100, 75, 50];
const GRID_LIGHTNESS: [u8; 6] = [90, 75, 60, 45, 30, 15];

/// The swatch grid offered by the color picker.
///
/// Row 0 is an 11-step gray ramp from black to white. The remaining rows
/// walk saturation (outer) and lightness (inner), one column per hue.
pub fn palette_grid() -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(1 + GRID_SATURATIONS.len() * GRID_LIGHTNESS.len());

    rows.push(
        (0..=10u32)
            .map(|i| {
                let v = (255.0 * i as f64 / 10.0).round() as u8;
                rgb_to_hex(Rgb::new(v, v, v))
            })
            .collect(),
    );

    for &s in &GRID_SATURATIONS {
        for &l in &GRID_LIGHTNESS {
            rows.push(
                GRID_HUES
                    .iter()
                    .map(|&h| hsl_to_hex(Hsl { h, s, l }))
                    .collect(),
            );
        }
    }

    rows
}
