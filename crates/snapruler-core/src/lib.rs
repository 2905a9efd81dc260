//! SnapRuler Core Library
//!
//! Geometry, instruments, snapping and the drawing session behind a
//! ruler/set-square/protractor drafting canvas. Platform-agnostic and
//! renderer-agnostic: callers feed gestures in and read snapshots out.

pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod interaction;
pub mod session;
pub mod shapes;
pub mod snap;
pub mod tools;

pub use camera::Camera;
pub use config::SessionConfig;
pub use error::{Result, SnapRulerError};
pub use history::{History, MAX_UNDO_HISTORY};
pub use interaction::{CountingFeedback, DragState, FeedbackSink, GestureController, GestureEvent, NoFeedback};
pub use session::{Selection, Session, SessionEvent, SessionSnapshot};
pub use shapes::{Arc, Circle, LineSegment, Shape, ShapeTrait};
pub use snap::{LineSnap, RotationSnap, SnapIndicator, snap_rotation, snap_to_set_square};
pub use tools::{Tool, ToolId, ToolKind, ToolTransform};
