//! Shape definitions for the drafting surface.

mod arc;
mod circle;
mod line;

pub use arc::Arc;
pub use circle::Circle;
pub use line::LineSegment;

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// Flattening tolerance used when converting curved shapes to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Common behaviour of every shape variant.
pub trait ShapeTrait {
    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;
}

/// A committed (or previewed) shape. Shapes carry no identity of their own;
/// they are addressed by their position in the session's shape sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Line(LineSegment),
    Circle(Circle),
    Arc(Arc),
}

impl Shape {
    /// Short name of the variant, used in log output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Line(_) => "line",
            Shape::Circle(_) => "circle",
            Shape::Arc(_) => "arc",
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Line(s) => s.hit_test(point, tolerance),
            Shape::Circle(s) => s.hit_test(point, tolerance),
            Shape::Arc(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Line(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Arc(s) => s.to_path(),
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, Shape::Arc(_))
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, Shape::Circle(_))
    }
}

impl From<LineSegment> for Shape {
    fn from(line: LineSegment) -> Self {
        Shape::Line(line)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Arc> for Shape {
    fn from(arc: Arc) -> Self {
        Shape::Arc(arc)
    }
}
