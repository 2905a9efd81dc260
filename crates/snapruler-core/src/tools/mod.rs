//! Drafting instruments: ruler, set-square and protractor.

use crate::geometry;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for tools.
pub type ToolId = Uuid;

/// Default instrument length in world units.
pub const DEFAULT_TOOL_LENGTH: f64 = 400.0;
/// Default canvas size; tools start at its center.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(1000.0, 1000.0);
/// Thickness of the ruler body, used to place the rotation handle.
pub const TOOL_HEIGHT: f64 = 40.0;
/// Gap between the tool body and its rotation handle.
pub const ROTATE_HANDLE_GAP: f64 = 28.0;

/// Available instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Ruler,
    SetSquare,
    Protractor,
}

/// Placement of a tool on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolTransform {
    /// Center of the tool in world coordinates.
    pub position: Point,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Length of the ruler edge / set-square leg / protractor diameter.
    pub length: f64,
}

impl Default for ToolTransform {
    fn default() -> Self {
        Self::centered(DEFAULT_CANVAS_SIZE, DEFAULT_TOOL_LENGTH)
    }
}

impl ToolTransform {
    /// Transform placed at the center of a canvas, unrotated.
    pub fn centered(canvas: Size, length: f64) -> Self {
        Self {
            position: Point::new(canvas.width / 2.0, canvas.height / 2.0),
            rotation_deg: 0.0,
            length,
        }
    }

    pub fn with_position(self, position: Point) -> Self {
        Self { position, ..self }
    }

    pub fn with_rotation(self, rotation_deg: f64) -> Self {
        Self { rotation_deg, ..self }
    }

    /// Unit vector along the tool's edge.
    pub fn direction(&self) -> Vec2 {
        let rad = self.rotation_deg.to_radians();
        Vec2::new(rad.cos(), rad.sin())
    }

    /// Unit vector perpendicular to the tool's edge.
    pub fn perpendicular(&self) -> Vec2 {
        let dir = self.direction();
        Vec2::new(-dir.y, dir.x)
    }

    /// World position of the rotation handle.
    pub fn rotate_handle(&self) -> Point {
        self.position + self.perpendicular() * (TOOL_HEIGHT / 2.0 + ROTATE_HANDLE_GAP)
    }

    /// Check if a point (in world coordinates) hits the rotation handle.
    pub fn hits_rotate_handle(&self, point: Point, radius: f64) -> bool {
        geometry::distance(self.rotate_handle(), point) <= radius
    }
}

/// A drafting instrument. Tools are compared by `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    Ruler {
        id: ToolId,
        transform: ToolTransform,
    },
    SetSquare {
        id: ToolId,
        /// `true` for the 45° square, `false` for the 30°/60° one.
        variant45: bool,
        transform: ToolTransform,
    },
    Protractor {
        id: ToolId,
        transform: ToolTransform,
    },
}

impl PartialEq for Tool {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Tool {}

impl Tool {
    pub fn ruler(transform: ToolTransform) -> Self {
        Tool::Ruler {
            id: Uuid::new_v4(),
            transform,
        }
    }

    pub fn set_square(variant45: bool, transform: ToolTransform) -> Self {
        Tool::SetSquare {
            id: Uuid::new_v4(),
            variant45,
            transform,
        }
    }

    pub fn protractor(transform: ToolTransform) -> Self {
        Tool::Protractor {
            id: Uuid::new_v4(),
            transform,
        }
    }

    /// The instrument set every session starts with.
    pub fn default_set(transform: ToolTransform) -> Vec<Tool> {
        vec![
            Tool::ruler(transform),
            Tool::set_square(true, transform),
            Tool::protractor(transform),
        ]
    }

    pub fn id(&self) -> ToolId {
        match self {
            Tool::Ruler { id, .. } | Tool::SetSquare { id, .. } | Tool::Protractor { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Ruler { .. } => ToolKind::Ruler,
            Tool::SetSquare { .. } => ToolKind::SetSquare,
            Tool::Protractor { .. } => ToolKind::Protractor,
        }
    }

    pub fn transform(&self) -> &ToolTransform {
        match self {
            Tool::Ruler { transform, .. }
            | Tool::SetSquare { transform, .. }
            | Tool::Protractor { transform, .. } => transform,
        }
    }

    pub(crate) fn set_transform(&mut self, new_transform: ToolTransform) {
        match self {
            Tool::Ruler { transform, .. }
            | Tool::SetSquare { transform, .. }
            | Tool::Protractor { transform, .. } => *transform = new_transform,
        }
    }

    /// Copy of this tool with a different transform, keeping the id.
    pub fn with_transform(&self, transform: ToolTransform) -> Self {
        let mut tool = self.clone();
        tool.set_transform(transform);
        tool
    }

    /// The set-square variant, if this is a set-square.
    pub fn set_square_variant45(&self) -> Option<bool> {
        match self {
            Tool::SetSquare { variant45, .. } => Some(*variant45),
            Tool::Ruler { .. } | Tool::Protractor { .. } => None,
        }
    }
}
