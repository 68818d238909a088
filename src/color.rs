//! Color parsing, HSL conversion and background-derived shadow tint.
//!
//! Channels are stored as normalized floats (`0.0..=1.0`), the layout the host
//! uses for effect colors. Hex strings are accepted with or without a leading
//! `#` since stored shadow colors historically omitted it.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use serde::{Deserialize, Serialize};

use crate::ErrorCode;
use crate::geometry::clamp;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),
}

impl ErrorCode for ColorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidHex(_) => "E_INVALID_COLOR",
        }
    }
}

/// Normalized RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl Rgba {
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const TRANSPARENT: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    #[must_use]
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels with full opacity.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0, 1.0)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] for any other shape or non-hex digits.
    pub fn from_hex(raw: &str) -> Result<Self, ColorError> {
        parse_hex_rgba(raw).ok_or_else(|| ColorError::InvalidHex(raw.to_owned()))
    }

    /// Same color with a different alpha.
    #[must_use]
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Canonical lowercase `#rrggbb`, ignoring alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// CSS `rgba(r, g, b, a)` with 8-bit channels.
    #[must_use]
    pub fn to_css(self) -> String {
        let (r, g, b) = self.to_rgb8();
        let a = (clamp(self.a, 0.0, 1.0) * 100.0).round() / 100.0;
        format!("rgba({r}, {g}, {b}, {a})")
    }

    #[must_use]
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        (channel_to_u8(self.r), channel_to_u8(self.g), channel_to_u8(self.b))
    }

    /// Convert to HSL. The hue is `None` for achromatic colors.
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let lightness = (max + min) / 2.0;
        let delta = max - min;

        if delta <= f64::EPSILON {
            return Hsl { hue: None, saturation: 0.0, lightness };
        }

        let saturation = if lightness > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let sector = if (max - self.r).abs() <= f64::EPSILON {
            (self.g - self.b) / delta
        } else if (max - self.g).abs() <= f64::EPSILON {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };
        let hue = (sector * 60.0).rem_euclid(360.0);

        Hsl { hue: Some(hue), saturation, lightness }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(value: f64) -> u8 {
    (clamp(value, 0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex_rgba(raw: &str) -> Option<Rgba> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !hex.is_ascii() {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16);
    let (r, g, b, a) = match hex.len() {
        3 => (
            byte(&hex[0..1].repeat(2)),
            byte(&hex[1..2].repeat(2)),
            byte(&hex[2..3].repeat(2)),
            Ok(255),
        ),
        6 => (byte(&hex[0..2]), byte(&hex[2..4]), byte(&hex[4..6]), Ok(255)),
        8 => (byte(&hex[0..2]), byte(&hex[2..4]), byte(&hex[4..6]), byte(&hex[6..8])),
        _ => return None,
    };
    match (r, g, b, a) {
        (Ok(r), Ok(g), Ok(b), Ok(a)) => Some(Rgba::from_rgb8(r, g, b).with_alpha(f64::from(a) / 255.0)),
        _ => None,
    }
}

/// Hue-saturation-lightness color. `hue` is in degrees; `None` when achromatic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: Option<f64>,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    /// Convert back to an opaque [`Rgba`]. A missing hue is treated as 0°.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        let l = self.lightness;
        let s = self.saturation;
        if s <= 0.0 {
            return Rgba::new(l, l, l, 1.0);
        }
        let h = self.hue.unwrap_or(0.0).rem_euclid(360.0) / 360.0;
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgba::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
            1.0,
        )
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
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

/// Derive a shadow tint from the background beneath the target.
///
/// Chromatic backgrounds keep hue and saturation with lightness reduced by
/// `lightness_delta`, floored at `min_lightness`. Achromatic backgrounds give pure black.
/// No background gives transparent black; layer alpha is applied later either way.
#[must_use]
pub fn derive_tint(background: Option<Rgba>, lightness_delta: f64, min_lightness: f64) -> Rgba {
    let Some(background) = background else {
        return Rgba::TRANSPARENT;
    };
    let hsl = background.to_hsl();
    let tinted = match hsl.hue {
        None => Hsl { hue: None, saturation: 0.0, lightness: 0.0 },
        Some(hue) => Hsl {
            hue: Some(hue),
            saturation: hsl.saturation,
            lightness: clamp(hsl.lightness - lightness_delta, min_lightness, 1.0),
        },
    };
    tinted.to_rgba()
}
