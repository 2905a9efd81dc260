//! Circle shape.

use super::ShapeTrait;
use crate::geometry;
use kurbo::{BezPath, Circle as KurboCircle, Point, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A full circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center point.
    pub center: Point,
    /// Radius.
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Circle centered on `center` passing through `point`.
    pub fn through(center: Point, point: Point) -> Self {
        Self::new(center, geometry::distance(center, point))
    }

    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center, self.radius)
    }
}

impl ShapeTrait for Circle {
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (geometry::distance(point, self.center) - self.radius).abs() < tolerance
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(super::PATH_TOLERANCE)
    }
}
