//! Tunable presentation parameters.
//!
//! DESIGN
//! ======
//! Ease curves, base blur, snap threshold and timings were tuned by eye; the
//! only load-bearing contracts are the monotonicity properties of the layer
//! stack. Everything tunable lives here so hosts can adjust it without
//! touching the synthesis code. Defaults come from [`crate::consts`];
//! `PENUMBRA_*` environment variables override individual values.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;
use std::time::Duration;

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowConfig {
    /// Layers per shadow stack. Always at least 1.
    pub layer_count: usize,
    pub base_blur: f64,
    /// Edge length the preview shadow is computed against.
    pub reference_size: f64,
    pub offset_ease_factor: f64,
    pub min_blur_factor: f64,
    pub tint_lightness_delta: f64,
    pub tint_min_lightness: f64,
    pub snap_threshold_px: f64,
    pub resize_padding_px: f64,
    pub light_size: f64,
    pub min_brightness: f64,
    pub min_elevation: f64,
    pub brightness_drag_max: f64,
    pub brightness_drag_step: f64,
    pub elevation_drag_range: f64,
    pub elevation_drag_step: f64,
    pub throttle_interval: Duration,
    pub host_update_delay: Duration,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            layer_count: SHADOW_LAYER_COUNT,
            base_blur: SHADOW_BASE_BLUR,
            reference_size: PREVIEW_TARGET_SIZE,
            offset_ease_factor: SHADOW_OFFSET_EASE_FACTOR,
            min_blur_factor: SHADOW_MIN_BLUR_FACTOR,
            tint_lightness_delta: TINT_LIGHTNESS_DELTA,
            tint_min_lightness: TINT_MIN_LIGHTNESS,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            resize_padding_px: RESIZE_PADDING_PX,
            light_size: LIGHT_SIZE,
            min_brightness: LIGHT_MIN_BRIGHTNESS,
            min_elevation: TARGET_MIN_ELEVATION,
            brightness_drag_max: BRIGHTNESS_DRAG_MAX,
            brightness_drag_step: BRIGHTNESS_DRAG_STEP,
            elevation_drag_range: TARGET_ELEVATION_DRAG_RANGE,
            elevation_drag_step: TARGET_ELEVATION_DRAG_STEP,
            throttle_interval: Duration::from_millis(THROTTLE_SCENE_UPDATES_MS),
            host_update_delay: Duration::from_millis(HOST_UPDATE_DELAY_MS),
        }
    }
}

impl ShadowConfig {
    /// Build config from process environment variables.
    ///
    /// Optional:
    /// - `PENUMBRA_LAYER_COUNT`: default 6, minimum 1
    /// - `PENUMBRA_BASE_BLUR`: default 50
    /// - `PENUMBRA_SNAP_THRESHOLD_PX`: default 6
    /// - `PENUMBRA_RESIZE_PADDING_PX`: default 8
    /// - `PENUMBRA_THROTTLE_MS`: default 60
    /// - `PENUMBRA_HOST_UPDATE_DELAY_MS`: default 60
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup. Unparseable values keep the default.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let layer_count = parse_or(&lookup, "PENUMBRA_LAYER_COUNT", defaults.layer_count).max(1);
        let throttle_ms = parse_or(&lookup, "PENUMBRA_THROTTLE_MS", THROTTLE_SCENE_UPDATES_MS);
        let delay_ms = parse_or(&lookup, "PENUMBRA_HOST_UPDATE_DELAY_MS", HOST_UPDATE_DELAY_MS);

        let config = Self {
            layer_count,
            base_blur: parse_or(&lookup, "PENUMBRA_BASE_BLUR", defaults.base_blur),
            snap_threshold_px: parse_or(&lookup, "PENUMBRA_SNAP_THRESHOLD_PX", defaults.snap_threshold_px),
            resize_padding_px: parse_or(&lookup, "PENUMBRA_RESIZE_PADDING_PX", defaults.resize_padding_px),
            throttle_interval: Duration::from_millis(throttle_ms),
            host_update_delay: Duration::from_millis(delay_ms),
            ..defaults
        };
        tracing::debug!(
            layer_count = config.layer_count,
            base_blur = config.base_blur,
            throttle_ms,
            delay_ms,
            "shadow config loaded"
        );
        config
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or(default),
        None => default,
    }
}
