//! Stateless 2D math shared by snapping, hit-testing and the session.

use kurbo::{Point, Vec2};

/// Determinant magnitude below which two lines are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Midpoint of the segment a→b.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Bring an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Angle of the vector a→b in degrees, counter-clockwise from +X, in `[0, 360)`.
pub fn angle_degrees(a: Point, b: Point) -> f64 {
    let angle = (b.y - a.y).atan2(b.x - a.x).to_degrees();
    if angle < 0.0 { normalize_degrees(angle + 360.0) } else { angle }
}

/// Signed shortest circular distance from `b` to `a`, in `[-180, 180)`.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

/// Snap `angle` to the closest entry of `allowed` (by circular distance).
///
/// Returns the chosen candidate and `true` when it lies within `tolerance_deg`,
/// otherwise the untouched `angle` and `false`. On ties the earliest candidate wins.
pub fn snap_angle_deg(angle: f64, allowed: &[f64], tolerance_deg: f64) -> (f64, bool) {
    let Some(&first) = allowed.first() else {
        return (angle, false);
    };

    let mut best = first;
    let mut best_diff = angular_difference(angle, first).abs();
    for &candidate in &allowed[1..] {
        let diff = angular_difference(angle, candidate).abs();
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }

    if best_diff <= tolerance_deg {
        (best, true)
    } else {
        (angle, false)
    }
}

/// Intersection of the infinite lines p1→p2 and p3→p4.
///
/// Returns `None` for parallel or coincident lines.
pub fn line_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let (x1, y1) = (p1.x, p1.y);
    let (x2, y2) = (p2.x, p2.y);
    let (x3, y3) = (p3.x, p3.y);
    let (x4, y4) = (p4.x, p4.y);

    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let a = x1 * y2 - y1 * x2;
    let b = x3 * y4 - y3 * x4;
    let px = (a * (x3 - x4) - (x1 - x2) * b) / denom;
    let py = (a * (y3 - y4) - (y1 - y2) * b) / denom;
    Some(Point::new(px, py))
}

/// Perpendicular distance from `point` to the infinite line through `a` and `b`.
///
/// The projection is not clamped to the segment. A zero-length line degrades
/// to the distance from `a`.
pub fn point_to_line_distance(point: Point, a: Point, b: Point) -> f64 {
    let ab = Vec2::new(b.x - a.x, b.y - a.y);
    let ap = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = ab.hypot2();
    if len_sq < f64::EPSILON {
        return ap.hypot();
    }
    let t = ap.dot(ab) / len_sq;
    let proj = Point::new(a.x + t * ab.x, a.y + t * ab.y);
    distance(point, proj)
}

/// Point at `length` from `origin` in the direction `angle_deg`.
pub fn polar_offset(origin: Point, angle_deg: f64, length: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(origin.x + rad.cos() * length, origin.y + rad.sin() * length)
}
