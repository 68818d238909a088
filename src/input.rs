//! Input model: modifier keys, drag phases, and the three preview drag gestures.
//!
//! Each gesture (light position, brightness handle, elevation handle) is an
//! independent `Idle → Dragging → Idle` machine driven by the pointer offsets
//! the host widget reports. Offsets are absolute within the gesture's bounds,
//! not deltas. The functions here clamp, step and snap those offsets and turn
//! them into logical values; smoothing and animation stay in the widget layer
//! and are never read back.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::config::ShadowConfig;
use crate::consts::{LIGHT_INITIAL_BRIGHTNESS, TARGET_INITIAL_ELEVATION};
use crate::geometry::{Point, Size, clamp, denormalize, normalize, stepped};
use crate::snap::{Alignment, Snapped, resolve_snap};

/// Keyboard modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held. Disables snapping and enables coarse stepping.
    pub shift: bool,
}

/// State of a single drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

impl DragPhase {
    /// Transition on a pointer sample. `down` is whether the pointer is pressed.
    #[must_use]
    pub fn next(self, down: bool) -> Self {
        if down { Self::Dragging } else { Self::Idle }
    }

    #[must_use]
    pub fn is_dragging(self) -> bool {
        self == Self::Dragging
    }
}

/// One pointer sample from a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    /// Absolute gesture offset in preview pixels.
    pub offset: Point,
    /// Pointer is still pressed. The release sample has `down = false`.
    pub down: bool,
    pub modifiers: Modifiers,
}

impl DragEvent {
    #[must_use]
    pub fn new(offset: Point, down: bool) -> Self {
        Self { offset, down, modifiers: Modifiers::default() }
    }

    #[must_use]
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }
}

/// The draggable light. `position` is the widget's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Point,
    pub size: f64,
    /// `min_brightness..=1.0`
    pub brightness: f64,
    /// Guide-line hint from the last position drag; never persisted.
    pub alignment: Alignment,
    pub position_phase: DragPhase,
    pub brightness_phase: DragPhase,
}

impl LightSource {
    /// Light at its initial spot: horizontally centered, a quarter down the viewport.
    #[must_use]
    pub fn initial(viewport: Size, size: f64) -> Self {
        Self {
            position: initial_light_position(viewport, size),
            size,
            brightness: LIGHT_INITIAL_BRIGHTNESS,
            alignment: Alignment::None,
            position_phase: DragPhase::Idle,
            brightness_phase: DragPhase::Idle,
        }
    }

    /// Handle offset matching the current brightness, for starting a new drag.
    #[must_use]
    pub fn brightness_drag_origin(&self, config: &ShadowConfig) -> f64 {
        denormalize(self.brightness, 0.0, config.brightness_drag_max)
    }
}

#[must_use]
pub fn initial_light_position(viewport: Size, size: f64) -> Point {
    Point::new(viewport.width / 2.0 - size / 2.0, viewport.height / 4.0 - size / 2.0)
}

/// The target element. Always centered in the viewport; only elevation is dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Point,
    /// `min_elevation..=1.0`
    pub elevation: f64,
    pub elevation_phase: DragPhase,
}

impl Target {
    #[must_use]
    pub fn centered_in(viewport: Size) -> Self {
        Self {
            position: viewport.center(),
            elevation: TARGET_INITIAL_ELEVATION,
            elevation_phase: DragPhase::Idle,
        }
    }

    /// Point comparable with the light's top-left position.
    #[must_use]
    pub fn anchor(&self, light_size: f64) -> Point {
        Point::new(self.position.x - light_size / 2.0, self.position.y - light_size / 2.0)
    }

    /// Handle offset matching the current elevation, for starting a new drag.
    #[must_use]
    pub fn elevation_drag_origin(&self, config: &ShadowConfig) -> f64 {
        let range = config.elevation_drag_range;
        denormalize(self.elevation, range, -range)
    }
}

// =============================================================================
// GESTURES
// =============================================================================

/// Apply a light-position drag sample.
///
/// The offset is clamped to `[0, viewport - light_size]`, then snapped toward
/// the target axes unless shift is held.
pub fn drag_light(light: &mut LightSource, event: DragEvent, viewport: Size, config: &ShadowConfig) -> Snapped {
    let max_x = (viewport.width - light.size).max(0.0);
    let max_y = (viewport.height - light.size).max(0.0);
    let bounded = Point::new(clamp(event.offset.x, 0.0, max_x), clamp(event.offset.y, 0.0, max_y));

    let snap_x = viewport.width / 2.0 - light.size / 2.0;
    let snap_y = viewport.height / 2.0 - light.size / 2.0;
    let snapped = resolve_snap(bounded, snap_x, snap_y, config.snap_threshold_px, event.modifiers.shift);

    light.position = snapped.position;
    light.alignment = snapped.alignment;
    light.position_phase = light.position_phase.next(event.down);
    snapped
}

/// Apply a brightness-handle drag sample. Dragging upward brightens.
///
/// Returns the new brightness, in `min_brightness..=1.0`.
pub fn drag_brightness(light: &mut LightSource, event: DragEvent, config: &ShadowConfig) -> f64 {
    let top = config.brightness_drag_max;
    let offset = clamp(event.offset.y, top, 0.0);
    let value = if event.modifiers.shift {
        clamp(stepped(offset, config.brightness_drag_step), top, 0.0)
    } else {
        offset
    };
    let brightness = (normalize(value, 0.0, top) + config.min_brightness).min(1.0);

    light.brightness = brightness;
    light.brightness_phase = light.brightness_phase.next(event.down);
    brightness
}

/// Apply an elevation-handle drag sample. Dragging upward raises the light.
///
/// Returns the new elevation, in `min_elevation..=1.0`.
pub fn drag_elevation(target: &mut Target, event: DragEvent, config: &ShadowConfig) -> f64 {
    let range = config.elevation_drag_range;
    let offset = clamp(event.offset.y, -range, range);
    let value = if event.modifiers.shift {
        clamp(stepped(offset, config.elevation_drag_step), -range, range)
    } else {
        offset
    };
    let elevation = (normalize(value, range, -range) + config.min_elevation).min(1.0);

    target.elevation = elevation;
    target.elevation_phase = target.elevation_phase.next(event.down);
    elevation
}

/// Pull the light back inside a resized viewport.
///
/// Each axis that overflows is clamped to `viewport - light_size - padding`;
/// axes still in bounds are left alone. Returns whether the light moved.
pub fn reconcile_resize(light: &mut LightSource, viewport: Size, config: &ShadowConfig) -> bool {
    if viewport.is_degenerate() {
        return false;
    }
    let max_x = viewport.width - light.size;
    let max_y = viewport.height - light.size;
    let padding = config.resize_padding_px;

    let mut moved = false;
    if light.position.x > max_x {
        light.position.x = (max_x - padding).max(0.0);
        moved = true;
    }
    if light.position.y > max_y {
        light.position.y = (max_y - padding).max(0.0);
        moved = true;
    }
    if moved {
        tracing::debug!(x = light.position.x, y = light.position.y, "light clamped into resized viewport");
    }
    moved
}
