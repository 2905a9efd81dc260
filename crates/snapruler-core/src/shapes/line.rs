//! Line segment shape.

use super::ShapeTrait;
use crate::geometry;
use kurbo::{BezPath, Line as KurboLine, Point, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A straight segment, produced by freehand strokes and instrument lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

impl LineSegment {
    /// Create a new segment.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Get the length of the segment.
    pub fn length(&self) -> f64 {
        geometry::distance(self.start, self.end)
    }

    /// Get the midpoint of the segment.
    pub fn midpoint(&self) -> Point {
        geometry::midpoint(self.start, self.end)
    }

    /// Get as a kurbo Line.
    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.start, self.end)
    }
}

impl ShapeTrait for LineSegment {
    /// Hits are measured against the infinite line through both endpoints,
    /// so points past either end still register when they sit on its extension.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        geometry::point_to_line_distance(point, self.start, self.end) < tolerance
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(super::PATH_TOLERANCE)
    }
}
