//! Geometry primitives shared by the preview pipeline and shadow synthesis.
//!
//! All coordinates are preview-space CSS pixels with y growing downward.
//! Angles are in degrees unless a name says otherwise.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A 2D point or offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the point treated as a vector from the origin.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Width/height pair for viewports and design nodes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn longest_side(self) -> f64 {
        self.width.max(self.height)
    }

    /// Whether either edge is zero, negative, or not finite.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Result of [`resize_retaining_aspect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resized {
    pub width: f64,
    pub height: f64,
    /// Scale applied to both edges; reuse it for corner radius and shadow geometry.
    pub ratio: f64,
}

/// Angle of the vector `b → a` in degrees, wrapped into `[0, 360)`.
///
/// `angle_between(p, p)` is 0.
#[must_use]
pub fn angle_between(a: Point, b: Point) -> f64 {
    let deg = (a.y - b.y).atan2(a.x - b.x).to_degrees();
    let wrapped = if deg < 0.0 { deg + 360.0 } else { deg };
    // -ε + 360 rounds to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[must_use]
pub fn distance_between(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Map `value` linearly from `[lo, hi]` to `[0, 1]`. No clamping.
///
/// `hi < lo` is allowed and inverts the direction. `lo == hi` yields 0.
#[must_use]
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span == 0.0 {
        return 0.0;
    }
    (value - lo) / span
}

/// Inverse of [`normalize`].
#[must_use]
pub fn denormalize(t: f64, lo: f64, hi: f64) -> f64 {
    lo + t * (hi - lo)
}

/// Clamp that tolerates `lo > hi` by returning `lo`, unlike [`f64::clamp`].
#[must_use]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.min(hi).max(lo)
}

/// Round `value` up to the next multiple of `step`. Non-positive steps return `value`.
#[must_use]
pub fn stepped(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step).ceil() * step
}

/// Scale `(width, height)` to fit within `(max_width, max_height)` keeping aspect ratio.
///
/// Degenerate inputs produce a zero-sized result with ratio 0; callers fall back
/// to their own defaults.
#[must_use]
pub fn resize_retaining_aspect(width: f64, height: f64, max_width: f64, max_height: f64) -> Resized {
    if Size::new(width, height).is_degenerate() {
        return Resized { width: 0.0, height: 0.0, ratio: 0.0 };
    }
    let ratio = (max_width / width).min(max_height / height);
    Resized { width: width * ratio, height: height * ratio, ratio }
}

/// Offset of length `distance` pointing along `azimuth` degrees.
#[must_use]
pub fn polar_offset(azimuth: f64, distance: f64) -> Point {
    let theta = azimuth.to_radians();
    Point::new(theta.cos() * distance, theta.sin() * distance)
}

/// Largest light distance at `azimuth` inside the ellipse inscribed in `bounds`,
/// less half the light size. Used to validate typed distances.
#[must_use]
pub fn max_distance(azimuth: f64, bounds: Size, light_size: f64) -> f64 {
    let a = bounds.width / 2.0;
    let b = bounds.height / 2.0;
    if a <= 0.0 || b <= 0.0 {
        return 0.0;
    }
    let theta = azimuth.to_radians();
    let radius = (a * b) / ((b * theta.cos()).powi(2) + (a * theta.sin()).powi(2)).sqrt();
    (radius - light_size / 2.0).max(0.0)
}

/// Furthest distance a light confined to `[0, bounds - light_size]` can reach
/// from the centered target anchor along `azimuth`.
#[must_use]
pub fn reachable_distance(azimuth: f64, bounds: Size, light_size: f64) -> f64 {
    let half_x = ((bounds.width - light_size) / 2.0).max(0.0);
    let half_y = ((bounds.height - light_size) / 2.0).max(0.0);
    let theta = azimuth.to_radians();
    let reach_x = axis_reach(half_x, theta.cos());
    let reach_y = axis_reach(half_y, theta.sin());
    reach_x.min(reach_y)
}

fn axis_reach(half: f64, component: f64) -> f64 {
    if component.abs() < 1e-9 {
        f64::INFINITY
    } else {
        half / component.abs()
    }
}

/// Shift that puts a background dot grid's center dot under the viewport center.
///
/// Returned as the remainder within one grid cell to keep the motion small on resize.
#[must_use]
pub fn grid_center_shift(viewport: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return 0.0;
    }
    let center_dot = (viewport / grid_size / 2.0) * grid_size;
    let shift = viewport - center_dot - grid_size / 2.0;
    (shift % grid_size).round()
}
