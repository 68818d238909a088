//! Shared numeric constants for the shadow engine.

// ── Preview ─────────────────────────────────────────────────────

/// Edge length of the preview target widget in CSS pixels.
///
/// Shadow geometry computed against the preview is scaled by
/// `longest_side / PREVIEW_TARGET_SIZE` before it is applied to a real node.
pub const PREVIEW_TARGET_SIZE: f64 = 100.0;

/// Smallest edge the preview target is drawn with.
pub const PREVIEW_TARGET_MIN_SIZE: f64 = 32.0;

/// Corner radius used when the selection has none (or it scales to zero).
pub const PREVIEW_TARGET_FALLBACK_RADIUS: f64 = 6.0;

/// Pixel distance within which the light snaps to the target axes.
pub const SNAP_THRESHOLD_PX: f64 = 6.0;

/// Inward padding applied when a viewport shrink pushes the light out of bounds.
pub const RESIZE_PADDING_PX: f64 = 8.0;

// ── Light ───────────────────────────────────────────────────────

/// Edge length of the draggable light widget.
pub const LIGHT_SIZE: f64 = 24.0;

pub const LIGHT_INITIAL_BRIGHTNESS: f64 = 0.5;

/// Brightness never drops to zero, so shadows never fully vanish.
pub const LIGHT_MIN_BRIGHTNESS: f64 = 0.05;

/// Vertical drag travel (negative = upward) from minimum to full brightness.
pub const BRIGHTNESS_DRAG_MAX: f64 = -20.0;

/// Coarse brightness step while the modifier is held.
pub const BRIGHTNESS_DRAG_STEP: f64 = 2.0;

// ── Target ──────────────────────────────────────────────────────

pub const TARGET_INITIAL_ELEVATION: f64 = 0.5;

/// Elevation floor so shadows never fully flatten.
pub const TARGET_MIN_ELEVATION: f64 = 0.025;

/// Range in px it takes to drag from elevation 0 to 1 (in either direction).
pub const TARGET_ELEVATION_DRAG_RANGE: f64 = 50.0;

/// Coarse elevation step while the modifier is held.
pub const TARGET_ELEVATION_DRAG_STEP: f64 = 10.0;

// ── Shadow ──────────────────────────────────────────────────────

/// Number of discrete layers approximating the penumbra.
pub const SHADOW_LAYER_COUNT: usize = 6;

pub const SHADOW_BASE_BLUR: f64 = 50.0;

/// Multiplier on the ease-in offset curve.
pub const SHADOW_OFFSET_EASE_FACTOR: f64 = 5.0;

/// Lowest blur-distance factor, so blur survives at distance zero.
pub const SHADOW_MIN_BLUR_FACTOR: f64 = 0.1;

/// Lightness removed from the background when deriving a tint.
pub const TINT_LIGHTNESS_DELTA: f64 = 0.8;

pub const TINT_MIN_LIGHTNESS: f64 = 0.1;

/// Background assumed when none is detected or the preference is disabled.
pub const BACKGROUND_DEFAULT_RGB: (u8, u8, u8) = (0xe5, 0xe5, 0xe5);

// ── Timing ──────────────────────────────────────────────────────

/// Minimum interval between light-position emissions during a drag.
pub const THROTTLE_SCENE_UPDATES_MS: u64 = 60;

/// Trailing delay before a burst of scene changes is sent to the host.
pub const HOST_UPDATE_DELAY_MS: u64 = 60;

// ── Window ──────────────────────────────────────────────────────

pub const WINDOW_INITIAL_WIDTH: f64 = 375.0;
pub const WINDOW_INITIAL_HEIGHT: f64 = 375.0;
pub const WINDOW_MIN_WIDTH: f64 = 340.0;
pub const WINDOW_MIN_HEIGHT: f64 = 340.0;
pub const WINDOW_MAX_WIDTH: f64 = 3600.0;
pub const WINDOW_MAX_HEIGHT: f64 = 600.0;

// ── Persistence ─────────────────────────────────────────────────

/// Key under which shadow data is stored on a design node.
pub const PLUGIN_DATA_KEY: &str = "penumbra_shadow";

/// Current stored-data format version. Version 1 lacked `lightPosition`.
pub const PERSISTED_FORMAT_VERSION: u32 = 2;
