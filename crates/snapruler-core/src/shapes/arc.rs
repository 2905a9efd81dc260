//! Circular arc shape.

use super::ShapeTrait;
use crate::geometry;
use kurbo::{Arc as KurboArc, BezPath, Point, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// A circular arc. Angles are in degrees, 0 = +X, counter-clockwise positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    /// Center point.
    pub center: Point,
    /// Radius.
    pub radius: f64,
    /// Start angle in degrees, `[0, 360)`.
    pub start_angle_deg: f64,
    /// Sweep in degrees, counter-clockwise positive.
    pub sweep_angle_deg: f64,
}

impl Arc {
    pub fn new(center: Point, radius: f64, start_angle_deg: f64, sweep_angle_deg: f64) -> Self {
        Self {
            center,
            radius,
            start_angle_deg,
            sweep_angle_deg,
        }
    }

    /// End angle in degrees, wrapped into `[0, 360)`.
    pub fn end_angle_deg(&self) -> f64 {
        let start = self.start_angle_deg % 360.0;
        let sweep = self.sweep_angle_deg % 360.0;
        let sweep = if sweep < 0.0 { sweep + 360.0 } else { sweep };
        (start + sweep) % 360.0
    }

    /// Check whether an angle (degrees, `[0, 360)`) lies inside the swept range.
    pub fn contains_angle(&self, angle_deg: f64) -> bool {
        let start = self.start_angle_deg % 360.0;
        let end = self.end_angle_deg();
        if start <= end {
            (start..=end).contains(&angle_deg)
        } else {
            angle_deg >= start || angle_deg <= end
        }
    }

    pub fn as_kurbo(&self) -> KurboArc {
        KurboArc {
            center: self.center,
            radii: Vec2::new(self.radius, self.radius),
            start_angle: self.start_angle_deg.to_radians(),
            sweep_angle: self.sweep_angle_deg.to_radians(),
            x_rotation: 0.0,
        }
    }
}

impl ShapeTrait for Arc {
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if (geometry::distance(point, self.center) - self.radius).abs() >= tolerance {
            return false;
        }
        self.contains_angle(geometry::angle_degrees(self.center, point))
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(super::PATH_TOLERANCE)
    }
}
