//! Gesture scripts and their replay against a session.
//!
//! A script is JSON:
//! ```json
//! { "camera": { "zoom": 2.0 },
//!   "steps": [
//!     { "type": "select_tool", "kind": "ruler" },
//!     { "type": "set_draw_mode", "enabled": true },
//!     { "type": "drag_start", "x": 100, "y": 100 },
//!     { "type": "drag_move", "x": 300, "y": 120 },
//!     { "type": "drag_end" }
//!   ] }
//! ```
//!
//! Point coordinates are in screen space. The view can be changed mid-script
//! with `pan`, `zoom`, `fit_canvas` and `reset_view`.

use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use snapruler_core::{
    Camera, CountingFeedback, GestureController, GestureEvent, Session, SessionConfig, SnapRulerError, ToolKind,
};
use std::path::Path;

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Tap { x: f64, y: f64 },
    DragStart { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    /// Ends the drag; a point, when both coordinates are given, is the final position.
    DragEnd {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    DragCancel,
    /// Pan the view by a screen-space delta.
    Pan { dx: f64, dy: f64 },
    /// Zoom the view by `factor` around the screen point `(x, y)`.
    Zoom { x: f64, y: f64, factor: f64 },
    /// Fit the whole canvas into a viewport of the given size.
    FitCanvas { width: f64, height: f64 },
    ResetView,
    /// Select the first tool of a kind.
    SelectTool { kind: ToolKind },
    SetDrawMode { enabled: bool },
    ToggleDrawMode,
    /// Clear every selection and leave draw mode.
    Deselect,
    Undo,
    Redo,
}

impl Step {
    /// The gesture this step carries, in screen coordinates.
    fn gesture(&self) -> Option<GestureEvent> {
        match *self {
            Step::Tap { x, y } => Some(GestureEvent::Tap(Point::new(x, y))),
            Step::DragStart { x, y } => Some(GestureEvent::DragStart(Point::new(x, y))),
            Step::DragMove { x, y } => Some(GestureEvent::DragMove(Point::new(x, y))),
            Step::DragEnd { x, y } => Some(GestureEvent::DragEnd(x.zip(y).map(|(x, y)| Point::new(x, y)))),
            Step::DragCancel => Some(GestureEvent::DragCancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// View used to map step coordinates into the world. Identity when absent.
    #[serde(default)]
    pub camera: Option<Camera>,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, SnapRulerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapRulerError> {
        let path = path.as_ref();
        let script = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::debug!("Loaded {} steps from {:?}", script.steps.len(), path);
        Ok(script)
    }
}

/// Outcome of a replay.
#[derive(Debug)]
pub struct Replay {
    pub session: Session,
    /// How many times a rotation latched onto a reference angle.
    pub snap_locks: usize,
}

/// Run every step against a fresh session.
pub fn replay(script: &Script, config: SessionConfig) -> Replay {
    let mut session = Session::with_config(config);
    let mut controller = GestureController::with_feedback(CountingFeedback::default());
    let mut camera = script.camera.clone().unwrap_or_default();
    controller.set_view_zoom(camera.zoom);

    for (index, step) in script.steps.iter().enumerate() {
        log::trace!("Step {}: {:?}", index, step);
        if let Some(event) = step.gesture() {
            controller.handle(&mut session, event.to_world(&camera));
            continue;
        }
        match step {
            Step::SelectTool { kind } => {
                if session.select_tool_kind(*kind).is_none() {
                    log::warn!("Step {}: no {:?} in the tool set", index, kind);
                }
            }
            Step::SetDrawMode { enabled } => session.set_draw_mode(*enabled),
            Step::ToggleDrawMode => session.toggle_draw_mode(),
            Step::Deselect => session.deselect_all(),
            Step::Undo => {
                session.undo();
            }
            Step::Redo => {
                session.redo();
            }
            Step::Pan { dx, dy } => camera.pan(Vec2::new(*dx, *dy)),
            Step::Zoom { x, y, factor } => camera.zoom_at(Point::new(*x, *y), *factor),
            Step::FitCanvas { width, height } => {
                camera.fit_canvas(session.config().canvas_size(), Size::new(*width, *height));
            }
            Step::ResetView => camera.reset(),
            Step::Tap { .. }
            | Step::DragStart { .. }
            | Step::DragMove { .. }
            | Step::DragEnd { .. }
            | Step::DragCancel => {}
        }
        controller.set_view_zoom(camera.zoom);
    }

    if controller.is_dragging() {
        log::warn!("Script ended mid-drag; cancelling");
        controller.drag_cancel(&mut session);
    }

    Replay {
        snap_locks: controller.feedback().snap_locks,
        session,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapruler_core::{Selection, Shape};
    use std::io::Write;

    const RULER_SCRIPT: &str = r#"{
        "steps": [
            { "type": "select_tool", "kind": "ruler" },
            { "type": "set_draw_mode", "enabled": true },
            { "type": "drag_start", "x": 100, "y": 100 },
            { "type": "drag_move", "x": 200, "y": 100 },
            { "type": "drag_move", "x": 300, "y": 120 },
            { "type": "drag_end" }
        ]
    }"#;

    #[test]
    fn test_parse_steps() {
        let script = Script::from_json(RULER_SCRIPT).unwrap();
        assert!(script.camera.is_none());
        assert_eq!(script.steps.len(), 6);
        assert_eq!(script.steps[0], Step::SelectTool { kind: ToolKind::Ruler });
        assert_eq!(script.steps[5], Step::DragEnd { x: None, y: None });
    }

    #[test]
    fn test_unknown_step_rejected() {
        let result = Script::from_json(r#"{ "steps": [{ "type": "explode" }] }"#);
        assert!(matches!(result, Err(SnapRulerError::Json(_))));
    }

    #[test]
    fn test_replay_ruler_line() {
        let script = Script::from_json(RULER_SCRIPT).unwrap();
        let result = replay(&script, SessionConfig::default());
        let shapes = result.session.shapes();
        assert_eq!(shapes.len(), 1);
        let Shape::Line(line) = &shapes[0] else {
            panic!("expected line");
        };
        assert_eq!(line.start, Point::new(100.0, 100.0));
        assert_eq!(line.end, Point::new(300.0, 120.0));
    }

    #[test]
    fn test_replay_with_camera_and_undo() {
        let json = r#"{
            "camera": { "zoom": 2.0 },
            "steps": [
                { "type": "drag_start", "x": 0, "y": 0 },
                { "type": "drag_move", "x": 20, "y": 40 },
                { "type": "drag_end" },
                { "type": "undo" },
                { "type": "redo" },
                { "type": "tap", "x": 1000, "y": 1000 }
            ]
        }"#;
        let script = Script::from_json(json).unwrap();
        let result = replay(&script, SessionConfig::default());
        let session = result.session;
        let Shape::Line(line) = &session.shapes()[0] else {
            panic!("expected line");
        };
        assert_eq!(line.end, Point::new(10.0, 20.0));
        // (1000, 1000) on screen is the tools' position in the world
        assert!(matches!(session.selection(), Selection::Tool(_)));
        assert_eq!(result.snap_locks, 0);
    }

    #[test]
    fn test_replay_unfinished_drag_is_cancelled() {
        let json = r#"{ "steps": [
            { "type": "select_tool", "kind": "protractor" },
            { "type": "toggle_draw_mode" },
            { "type": "drag_start", "x": 600, "y": 500 },
            { "type": "drag_move", "x": 500, "y": 600 }
        ] }"#;
        let result = replay(&Script::from_json(json).unwrap(), SessionConfig::default());
        assert!(result.session.shapes().is_empty());
        assert!(!result.session.has_preview());
    }

    #[test]
    fn test_load_script_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RULER_SCRIPT.as_bytes()).unwrap();
        let script = Script::load(file.path()).unwrap();
        assert_eq!(script.steps.len(), 6);

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Script::load(dir.path().join("nope.json")), Err(SnapRulerError::Io(_))));
    }

    #[test]
    fn test_replay_view_steps() {
        let json = r#"{ "steps": [
            { "type": "zoom", "x": 0, "y": 0, "factor": 2.0 },
            { "type": "pan", "dx": 100, "dy": 0 },
            { "type": "drag_start", "x": 100, "y": 0 },
            { "type": "drag_end", "x": 120, "y": 40 },
            { "type": "reset_view" },
            { "type": "drag_start", "x": 300, "y": 300 },
            { "type": "drag_end", "x": 310, "y": 300 }
        ] }"#;
        let result = replay(&Script::from_json(json).unwrap(), SessionConfig::default());
        let shapes = result.session.shapes();
        assert_eq!(shapes.len(), 2);
        let Shape::Line(zoomed) = &shapes[0] else {
            panic!("expected line");
        };
        assert_eq!(zoomed.start, Point::new(0.0, 0.0));
        assert_eq!(zoomed.end, Point::new(10.0, 20.0));
        let Shape::Line(plain) = &shapes[1] else {
            panic!("expected line");
        };
        assert_eq!(plain.end, Point::new(310.0, 300.0));
    }

    #[test]
    fn test_replay_fit_canvas_maps_taps() {
        let json = r#"{ "steps": [
            { "type": "fit_canvas", "width": 500, "height": 500 },
            { "type": "tap", "x": 250, "y": 250 }
        ] }"#;
        let result = replay(&Script::from_json(json).unwrap(), SessionConfig::default());
        // The canvas center (where the tools sit) is the viewport center
        assert!(matches!(result.session.selection(), Selection::Tool(_)));
    }
}
