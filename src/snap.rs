//! Axis snapping for the dragged light.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::geometry::Point;

/// Which axis the light is currently snapped to. Drives guide-line drawing only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    /// Snapped on both axes.
    Center,
    /// `x` snapped to the vertical center line.
    Horizontal,
    /// `y` snapped to the horizontal center line.
    Vertical,
}

/// Position after snapping, with the alignment that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub position: Point,
    pub alignment: Alignment,
}

/// Snap `point` onto `(center_x, center_y)` per axis when within `threshold` pixels.
///
/// A center snap wins over either single-axis snap. `bypass` (modifier held)
/// disables snapping entirely.
#[must_use]
pub fn resolve_snap(point: Point, center_x: f64, center_y: f64, threshold: f64, bypass: bool) -> Snapped {
    if bypass {
        return Snapped { position: point, alignment: Alignment::None };
    }

    let near_x = (point.x - center_x).abs() < threshold;
    let near_y = (point.y - center_y).abs() < threshold;

    match (near_x, near_y) {
        (true, true) => Snapped {
            position: Point::new(center_x, center_y),
            alignment: Alignment::Center,
        },
        (true, false) => Snapped {
            position: Point::new(center_x, point.y),
            alignment: Alignment::Horizontal,
        },
        (false, true) => Snapped {
            position: Point::new(point.x, center_y),
            alignment: Alignment::Vertical,
        },
        (false, false) => Snapped { position: point, alignment: Alignment::None },
    }
}
