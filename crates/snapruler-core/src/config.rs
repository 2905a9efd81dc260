//! Session configuration.

use crate::error::{Result, SnapRulerError};
use crate::hit_test::{ROTATE_HANDLE_HIT_RADIUS, SHAPE_HIT_TOLERANCE, TOOL_HIT_RADIUS};
use crate::history::MAX_UNDO_HISTORY;
use crate::snap::ROTATION_SNAP_TOLERANCE;
use crate::tools::{DEFAULT_CANVAS_SIZE, DEFAULT_TOOL_LENGTH, ToolTransform};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for a drawing session. Missing JSON fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Canvas width; tools start centered on the canvas.
    pub canvas_width: f64,
    /// Canvas height.
    pub canvas_height: f64,
    /// Initial length of every tool.
    pub tool_length: f64,
    /// Radius around a tool's position that selects it on tap.
    pub tool_hit_radius: f64,
    /// Distance from a shape's outline that still selects it on tap.
    pub shape_hit_tolerance: f64,
    /// Radius of the rotation handle's hit area.
    pub rotate_handle_radius: f64,
    /// How close (degrees) a rotation must be to a reference angle to latch.
    pub rotation_snap_tolerance: f64,
    /// Maximum number of undo states.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_SIZE.width,
            canvas_height: DEFAULT_CANVAS_SIZE.height,
            tool_length: DEFAULT_TOOL_LENGTH,
            tool_hit_radius: TOOL_HIT_RADIUS,
            shape_hit_tolerance: SHAPE_HIT_TOLERANCE,
            rotate_handle_radius: ROTATE_HANDLE_HIT_RADIUS,
            rotation_snap_tolerance: ROTATION_SNAP_TOLERANCE,
            history_limit: MAX_UNDO_HISTORY,
        }
    }
}

impl SessionConfig {
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    /// Transform every tool starts with.
    pub fn initial_tool_transform(&self) -> ToolTransform {
        ToolTransform::centered(self.canvas_size(), self.tool_length)
    }

    /// Reject values that would make the session meaningless.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("tool_length", self.tool_length),
            ("tool_hit_radius", self.tool_hit_radius),
            ("shape_hit_tolerance", self.shape_hit_tolerance),
            ("rotate_handle_radius", self.rotate_handle_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SnapRulerError::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.rotation_snap_tolerance.is_finite() && self.rotation_snap_tolerance >= 0.0) {
            return Err(SnapRulerError::InvalidConfig(format!(
                "rotation_snap_tolerance must be non-negative, got {}",
                self.rotation_snap_tolerance
            )));
        }
        if self.history_limit == 0 {
            return Err(SnapRulerError::InvalidConfig("history_limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded session config from {:?}", path);
        Ok(config)
    }
}
