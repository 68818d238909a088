//! Multi-layer shadow synthesis.
//!
//! DESIGN
//! ======
//! A single blurred shadow looks flat. Instead the shadow is approximated by a
//! stack of N layers, index 0 nearest and sharpest, index N-1 farthest and
//! softest. Each layer uses the fraction `t = i / N` run through three
//! different curves:
//!
//! - alpha: ease-in-out cubic, falling from `brightness` toward 0
//! - offset: ease-in quadratic (times a factor), so far layers spread out
//! - blur: ease-out quadratic, so the core stays dense with a long soft tail
//!
//! Offset and blur are scaled by `longest_side / reference_size`: the preview
//! target is a fixed 100 px square while the real node can be any size, and
//! both must show the same shadow.

#[cfg(test)]
#[path = "shadow_test.rs"]
mod shadow_test;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::config::ShadowConfig;
use crate::geometry::{Point, Size, clamp};

/// Drop shadow (outside the node) or inner shadow (inset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadowKind {
    #[default]
    #[serde(rename = "DROP_SHADOW")]
    Drop,
    #[serde(rename = "INNER_SHADOW")]
    Inner,
}

impl ShadowKind {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Drop => Self::Inner,
            Self::Inner => Self::Drop,
        }
    }
}

/// One discrete layer of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowLayer {
    /// Integer pixel offset.
    pub offset: Point,
    /// Integer pixel blur radius, never negative.
    pub radius: f64,
    /// Tint RGB with the layer's alpha.
    pub color: Rgba,
}

/// Inputs to [`cast_shadow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    pub layer_count: usize,
    /// Degrees; the direction the shadow is cast toward.
    pub azimuth: f64,
    /// Light-to-target distance in preview pixels.
    pub distance: f64,
    /// `0.0..=1.0`
    pub elevation: f64,
    /// `0.0..=1.0`
    pub brightness: f64,
    pub tint: Rgba,
    /// Size of the element the shadow is applied to.
    pub size: Size,
}

/// Synthesize the layer stack with default tuning.
#[must_use]
pub fn cast_shadow(params: &ShadowParams) -> Vec<ShadowLayer> {
    cast_shadow_with(params, &ShadowConfig::default())
}

/// Synthesize `params.layer_count` layers using the tuning in `config`.
///
/// Always returns exactly `layer_count` layers. Non-finite inputs are treated
/// as zero and elevation/brightness are clamped into `0.0..=1.0`.
#[must_use]
pub fn cast_shadow_with(params: &ShadowParams, config: &ShadowConfig) -> Vec<ShadowLayer> {
    let n = params.layer_count;
    let azimuth = finite_or_zero(params.azimuth).to_radians();
    let distance = finite_or_zero(params.distance).max(0.0);
    let elevation = clamp(finite_or_zero(params.elevation), 0.0, 1.0);
    let brightness = clamp(finite_or_zero(params.brightness), 0.0, 1.0);

    let longest_side = finite_or_zero(params.size.longest_side()).max(0.0);
    let scale_factor = if config.reference_size > 0.0 {
        longest_side / config.reference_size
    } else {
        1.0
    };
    let scaled_distance = distance * scale_factor;
    let blur_distance_factor = (scaled_distance / 100.0).max(config.min_blur_factor);

    (0..n)
        .map(|i| {
            let t = fraction(i, n);

            let eased_opacity = ease(simple_easing::cubic_in_out, t);
            let alpha = round_to(brightness - brightness * eased_opacity, 2);

            let eased_offset = ease(simple_easing::quad_in, t) * config.offset_ease_factor;
            let magnitude = scaled_distance * elevation * eased_offset;
            let offset = Point::new(round_px(azimuth.cos() * magnitude), round_px(azimuth.sin() * magnitude));

            let eased_radius = ease(simple_easing::quad_out, t);
            let radius = round_px(config.base_blur * blur_distance_factor * eased_radius * (elevation * 2.0)).max(0.0);

            ShadowLayer { offset, radius, color: params.tint.with_alpha(alpha) }
        })
        .collect()
}

/// Render layers as a CSS `box-shadow` value for the preview.
#[must_use]
pub fn css_box_shadow(layers: &[ShadowLayer], kind: ShadowKind) -> String {
    let inset = match kind {
        ShadowKind::Drop => "",
        ShadowKind::Inner => "inset ",
    };
    layers
        .iter()
        .map(|layer| {
            format!(
                "{inset}{}px {}px {}px {}",
                layer.offset.x,
                layer.offset.y,
                layer.radius,
                layer.color.to_css()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Blend mode of a host shadow effect. Only normal blending is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMode {
    #[default]
    Normal,
}

/// A shadow layer in the host's native effect layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowEffect {
    #[serde(rename = "type")]
    pub kind: ShadowKind,
    pub color: Rgba,
    pub offset: Point,
    pub radius: f64,
    pub spread: f64,
    pub visible: bool,
    pub blend_mode: BlendMode,
}

/// Convert layers to host shadow effects, preserving order.
#[must_use]
pub fn to_effects(layers: &[ShadowLayer], kind: ShadowKind) -> Vec<ShadowEffect> {
    layers
        .iter()
        .map(|layer| ShadowEffect {
            kind,
            color: layer.color,
            offset: layer.offset,
            radius: layer.radius,
            spread: 0.0,
            visible: true,
            blend_mode: BlendMode::Normal,
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn fraction(i: usize, n: usize) -> f64 {
    if n == 0 { 0.0 } else { i as f64 / n as f64 }
}

#[allow(clippy::cast_possible_truncation)]
fn ease(curve: fn(f32) -> f32, t: f64) -> f64 {
    f64::from(curve(t as f32))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Round to whole pixels, folding `-0.0` into `0.0`.
fn round_px(value: f64) -> f64 {
    value.round() + 0.0
}
