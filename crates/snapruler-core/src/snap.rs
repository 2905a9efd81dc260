//! Angle snapping for rotated instruments and instrument-constrained lines.
//!
//! Two independent policies live here. Free-rotation snapping is a soft,
//! tolerance-gated assist. Drawing against a set-square is a hard constraint:
//! the endpoint always lands on one of the square's edge angles.

use crate::geometry;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Reference angles a freely rotated tool snaps to.
pub const ROTATION_SNAP_ANGLES: [f64; 9] = [0.0, 30.0, 45.0, 60.0, 90.0, 120.0, 135.0, 150.0, 180.0];

/// Default tolerance for rotation snapping, in degrees.
pub const ROTATION_SNAP_TOLERANCE: f64 = 5.0;

/// Edge angles of the 45° set-square.
pub const SET_SQUARE_45_ANGLES: [f64; 7] = [0.0, 45.0, 90.0, 135.0, 180.0, -45.0, -90.0];

/// Edge angles of the 30°/60° set-square.
pub const SET_SQUARE_30_60_ANGLES: [f64; 8] = [0.0, 30.0, 60.0, 90.0, 120.0, 150.0, -30.0, -60.0];

/// Result of snapping a free rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSnap {
    /// Rotation to apply: the reference angle when snapped, the raw one otherwise.
    pub angle_deg: f64,
    /// Whether a reference angle was within tolerance.
    pub snapped: bool,
}

/// Snap a tool rotation to the nearest reference angle within `tolerance_deg`.
pub fn snap_rotation(rotation_deg: f64, tolerance_deg: f64) -> RotationSnap {
    let (angle_deg, snapped) = geometry::snap_angle_deg(rotation_deg, &ROTATION_SNAP_ANGLES, tolerance_deg);
    RotationSnap { angle_deg, snapped }
}

/// Candidate edge angles for a set-square variant.
pub fn set_square_angles(variant45: bool) -> &'static [f64] {
    if variant45 {
        &SET_SQUARE_45_ANGLES
    } else {
        &SET_SQUARE_30_60_ANGLES
    }
}

/// Result of snapping a line drawn against an instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSnap {
    /// The snapped endpoint.
    pub point: Point,
    /// The edge angle the line was forced onto, in degrees.
    pub angle_deg: f64,
    /// The raw drag angle from `atan2`, in `(-180, 180]`.
    pub raw_angle_deg: f64,
    /// Distance from start point (preserved from the raw drag).
    pub length: f64,
}

/// Force the segment start→end onto the nearest candidate angle, keeping its length.
///
/// The raw angle is compared to each candidate by plain absolute difference,
/// without wrapping. There is no tolerance: the result is always snapped.
pub fn snap_line_to_angles(start: Point, end: Point, candidates: &[f64]) -> LineSnap {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let raw_angle_deg = dy.atan2(dx).to_degrees();
    let length = dx.hypot(dy);

    let mut angle_deg = candidates.first().copied().unwrap_or(raw_angle_deg);
    let mut best_diff = (angle_deg - raw_angle_deg).abs();
    for &candidate in candidates.iter().skip(1) {
        let diff = (candidate - raw_angle_deg).abs();
        if diff < best_diff {
            angle_deg = candidate;
            best_diff = diff;
        }
    }

    LineSnap {
        point: geometry::polar_offset(start, angle_deg, length),
        angle_deg,
        raw_angle_deg,
        length,
    }
}

/// Snap a line drawn against a set-square of the given variant.
pub fn snap_to_set_square(start: Point, end: Point, variant45: bool) -> LineSnap {
    snap_line_to_angles(start, end, set_square_angles(variant45))
}

/// Snap HUD state shown while a rotation is latched to a reference angle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapIndicator {
    /// Whether a snap is currently latched.
    pub active: bool,
    /// Where to draw the indicator (the rotated tool's position).
    pub anchor: Option<Point>,
    /// The latched angle in degrees.
    pub angle_deg: Option<f64>,
}

impl SnapIndicator {
    pub fn latched(anchor: Point, angle_deg: f64) -> Self {
        Self {
            active: true,
            anchor: Some(anchor),
            angle_deg: Some(angle_deg),
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }
}
