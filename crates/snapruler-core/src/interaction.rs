//! Gesture handling: turns taps and drags into session commands.

use crate::camera::Camera;
use crate::geometry;
use crate::hit_test;
use crate::session::{Selection, Session};
use crate::shapes::LineSegment;
use crate::snap;
use crate::tools::{Tool, ToolId, ToolKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A single input event in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "point", rename_all = "snake_case")]
pub enum GestureEvent {
    Tap(Point),
    DragStart(Point),
    DragMove(Point),
    /// Finish the drag. A point, when reported, is applied as a final move.
    DragEnd(Option<Point>),
    /// Abandon the drag. Committed shapes are untouched.
    DragCancel,
}

impl GestureEvent {
    /// Map a screen-space event into world space.
    pub fn to_world(self, camera: &Camera) -> Self {
        match self {
            GestureEvent::Tap(p) => GestureEvent::Tap(camera.screen_to_world(p)),
            GestureEvent::DragStart(p) => GestureEvent::DragStart(camera.screen_to_world(p)),
            GestureEvent::DragMove(p) => GestureEvent::DragMove(camera.screen_to_world(p)),
            GestureEvent::DragEnd(p) => GestureEvent::DragEnd(p.map(|p| camera.screen_to_world(p))),
            GestureEvent::DragCancel => self,
        }
    }
}

/// Receives the tactile "snap locked" signal.
pub trait FeedbackSink {
    /// Called once each time a rotation latches onto a reference angle.
    fn snap_locked(&mut self);
}

/// Feedback sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl FeedbackSink for NoFeedback {
    fn snap_locked(&mut self) {}
}

/// Feedback sink that counts signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingFeedback {
    pub snap_locks: usize,
}

impl FeedbackSink for CountingFeedback {
    fn snap_locked(&mut self) {
        self.snap_locks += 1;
    }
}

/// State of the drag in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Turning a tool around its position by its rotation handle.
    Rotating {
        tool_id: ToolId,
        /// Angle from the tool position to the grab point.
        anchor_deg: f64,
        /// Tool rotation when the drag began.
        initial_rotation_deg: f64,
    },
    /// Dragging a tool in move mode.
    Moving { tool_id: ToolId },
    /// Drawing a line along the ruler.
    RulerLine { start: Point, current: Point },
    /// Drawing a line constrained to a set-square's edge angles.
    SetSquareLine { variant45: bool, start: Point, current: Point },
    /// Sweeping an arc around the protractor.
    ProtractorArc {
        center: Point,
        radius: f64,
        start_angle_deg: f64,
        sweep_deg: f64,
    },
    /// Freehand stroke.
    Freehand { points: Vec<Point> },
}

/// Drives a [`Session`] from a gesture stream.
///
/// Holds only transient per-drag state. Everything persistent lives in the session.
#[derive(Debug, Clone)]
pub struct GestureController<F: FeedbackSink = NoFeedback> {
    state: DragState,
    feedback: F,
    /// Zoom of the view the gestures come from. The rotation handle's grab
    /// radius is a screen-space size, so it shrinks in world units as this grows.
    view_zoom: f64,
}

impl<F: FeedbackSink + Default> Default for GestureController<F> {
    fn default() -> Self {
        Self::with_feedback(F::default())
    }
}

impl GestureController<NoFeedback> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FeedbackSink> GestureController<F> {
    pub fn with_feedback(feedback: F) -> Self {
        Self {
            state: DragState::Idle,
            feedback,
            view_zoom: 1.0,
        }
    }

    /// Track the current view zoom. Non-positive or non-finite values are ignored.
    pub fn set_view_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.view_zoom = zoom;
        }
    }

    pub fn view_zoom(&self) -> f64 {
        self.view_zoom
    }

    /// Rotation handle grab radius in world units.
    fn handle_radius(&self, session: &Session) -> f64 {
        session.config().rotate_handle_radius / self.view_zoom
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Points of the freehand stroke in progress.
    pub fn stroke_points(&self) -> &[Point] {
        match &self.state {
            DragState::Freehand { points } => points,
            _ => &[],
        }
    }

    /// The line the renderer should draw along an instrument while dragging.
    /// Set-square lines are shown already snapped.
    pub fn guide_line(&self) -> Option<LineSegment> {
        match self.state {
            DragState::RulerLine { start, current } => Some(LineSegment::new(start, current)),
            DragState::SetSquareLine {
                variant45,
                start,
                current,
            } => Some(LineSegment::new(
                start,
                snap::snap_to_set_square(start, current, variant45).point,
            )),
            _ => None,
        }
    }

    /// Dispatch one event.
    pub fn handle(&mut self, session: &mut Session, event: GestureEvent) {
        match event {
            GestureEvent::Tap(p) => self.tap(session, p),
            GestureEvent::DragStart(p) => self.drag_start(session, p),
            GestureEvent::DragMove(p) => self.drag_move(session, p),
            GestureEvent::DragEnd(p) => self.drag_end(session, p),
            GestureEvent::DragCancel => self.drag_cancel(session),
        }
    }

    /// Select the shape under the point, or else the tool under it (or nothing).
    pub fn tap(&mut self, session: &mut Session, point: Point) {
        if let Some((index, _)) = session.find_shape_at(point) {
            session.set_selection(Selection::Shape(index));
            return;
        }
        let selection = match session.find_tool_at(point) {
            Some(tool) => Selection::Tool(tool.id()),
            None => Selection::None,
        };
        session.set_selection(selection);
    }

    pub fn drag_start(&mut self, session: &mut Session, point: Point) {
        if self.is_dragging() {
            log::debug!("Drag started while another was active; cancelling the old one");
            self.drag_cancel(session);
        }

        let Some(tool) = session.selected_tool().cloned() else {
            self.state = DragState::Freehand { points: vec![point] };
            return;
        };

        let transform = *tool.transform();
        if hit_test::hit_rotate_handle(&tool, point, self.handle_radius(session)) {
            log::debug!("Rotating {:?} {}", tool.kind(), tool.id());
            self.state = DragState::Rotating {
                tool_id: tool.id(),
                anchor_deg: geometry::angle_degrees(transform.position, point),
                initial_rotation_deg: transform.rotation_deg,
            };
            return;
        }

        if !session.draw_mode() {
            self.state = DragState::Moving { tool_id: tool.id() };
            return;
        }

        self.state = match tool {
            Tool::Ruler { .. } => DragState::RulerLine {
                start: point,
                current: point,
            },
            Tool::SetSquare { variant45, .. } => DragState::SetSquareLine {
                variant45,
                start: point,
                current: point,
            },
            Tool::Protractor { .. } => DragState::ProtractorArc {
                center: transform.position,
                radius: transform.length / 2.0,
                start_angle_deg: geometry::angle_degrees(transform.position, point),
                sweep_deg: 0.0,
            },
        };
    }

    pub fn drag_move(&mut self, session: &mut Session, point: Point) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Rotating {
                tool_id,
                anchor_deg,
                initial_rotation_deg,
            } => {
                let (tool_id, anchor_deg, initial_rotation_deg) = (*tool_id, *anchor_deg, *initial_rotation_deg);
                let Some(transform) = session.tool(tool_id).map(|t| *t.transform()) else {
                    self.state = DragState::Idle;
                    return;
                };
                let current = geometry::angle_degrees(transform.position, point);
                let raw = geometry::normalize_degrees(initial_rotation_deg + (current - anchor_deg));
                let snapped = snap::snap_rotation(raw, session.config().rotation_snap_tolerance);
                session.update_tool_transform(tool_id, transform.with_rotation(snapped.angle_deg));

                if snapped.snapped {
                    if session.latch_snap(transform.position, snapped.angle_deg) {
                        log::debug!("Rotation snapped to {}°", snapped.angle_deg);
                        self.feedback.snap_locked();
                    }
                } else {
                    session.clear_snap();
                }
            }
            DragState::Moving { tool_id } => {
                let tool_id = *tool_id;
                if let Some(transform) = session.tool(tool_id).map(|t| *t.transform()) {
                    session.update_tool_transform(tool_id, transform.with_position(point));
                }
            }
            DragState::RulerLine { current, .. } | DragState::SetSquareLine { current, .. } => {
                *current = point;
            }
            DragState::ProtractorArc {
                center,
                radius,
                start_angle_deg,
                sweep_deg,
            } => {
                let current = geometry::angle_degrees(*center, point);
                *sweep_deg = geometry::normalize_degrees(current - *start_angle_deg);
                session.add_arc_preview(*center, *radius, *start_angle_deg, *sweep_deg);
            }
            DragState::Freehand { points } => points.push(point),
        }
        log::trace!("Drag move {:?}", point);
    }

    pub fn drag_end(&mut self, session: &mut Session, last: Option<Point>) {
        if let Some(point) = last {
            self.drag_move(session, point);
        }
        match std::mem::take(&mut self.state) {
            DragState::Idle | DragState::Moving { .. } => {}
            DragState::Rotating { .. } => session.clear_snap(),
            DragState::RulerLine { start, current } => session.commit_ruler_line(start, current),
            DragState::SetSquareLine {
                variant45,
                start,
                current,
            } => {
                let snapped = snap::snap_to_set_square(start, current, variant45);
                session.commit_ruler_line(start, snapped.point);
            }
            DragState::ProtractorArc {
                center,
                radius,
                start_angle_deg,
                sweep_deg,
            } => session.commit_arc(center, radius, start_angle_deg, sweep_deg),
            DragState::Freehand { points } => {
                session.commit_stroke(&points);
            }
        }
    }

    /// Drop the drag in progress along with any preview it produced.
    pub fn drag_cancel(&mut self, session: &mut Session) {
        if let DragState::Rotating { .. } = self.state {
            session.clear_snap();
        }
        self.state = DragState::Idle;
        session.discard_preview();
    }
}

/// Find the first tool of `kind` and select it, switching to draw mode.
pub fn arm_tool(session: &mut Session, kind: ToolKind) -> Option<ToolId> {
    let id = session.select_tool_kind(kind)?;
    session.set_draw_mode(true);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Arc, Shape};
    use crate::tools::ToolTransform;

    const CENTER: Point = Point::new(500.0, 500.0);

    fn drag(controller: &mut GestureController<impl FeedbackSink>, session: &mut Session, points: &[Point]) {
        controller.drag_start(session, points[0]);
        for &p in &points[1..] {
            controller.drag_move(session, p);
        }
        controller.drag_end(session, None);
    }

    #[test]
    fn test_ruler_line_uses_last_drag_point() {
        let mut session = Session::new();
        arm_tool(&mut session, ToolKind::Ruler);
        let mut controller = GestureController::new();

        controller.drag_start(&mut session, Point::new(100.0, 100.0));
        controller.drag_move(&mut session, Point::new(150.0, 120.0));
        assert_eq!(
            controller.guide_line(),
            Some(LineSegment::new(Point::new(100.0, 100.0), Point::new(150.0, 120.0)))
        );
        controller.drag_move(&mut session, Point::new(200.0, 130.0));
        controller.drag_end(&mut session, None);

        assert_eq!(
            session.shapes(),
            &[Shape::Line(LineSegment::new(Point::new(100.0, 100.0), Point::new(200.0, 130.0)))]
        );
        assert!(controller.guide_line().is_none());
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_set_square_line_is_snapped() {
        let mut session = Session::new();
        arm_tool(&mut session, ToolKind::SetSquare);
        let mut controller = GestureController::new();

        drag(&mut controller, &mut session, &[Point::new(0.0, 0.0), Point::new(100.0, 10.0)]);

        let Shape::Line(line) = &session.shapes()[0] else {
            panic!("expected line");
        };
        assert_eq!(line.start, Point::new(0.0, 0.0));
        assert!(line.end.y.abs() < 1e-9);
        assert!((line.end.x - 100.498_756).abs() < 1e-3);
    }

    #[test]
    fn test_protractor_arc_single_preview() {
        let mut session = Session::new();
        arm_tool(&mut session, ToolKind::Protractor);
        let mut controller = GestureController::new();

        controller.drag_start(&mut session, Point::new(600.0, 500.0));
        controller.drag_move(&mut session, Point::new(500.0, 600.0));
        controller.drag_move(&mut session, Point::new(400.0, 500.0));
        assert_eq!(session.shapes().len(), 1);
        assert!(session.has_preview());
        assert!(!session.can_undo());

        controller.drag_end(&mut session, None);
        assert!(!session.has_preview());
        assert_eq!(session.shapes().len(), 1);
        let Shape::Arc(arc) = &session.shapes()[0] else {
            panic!("expected arc");
        };
        assert_eq!(arc.center, CENTER);
        assert_eq!(arc.radius, 200.0);
        assert!(arc.start_angle_deg.abs() < 1e-9);
        assert!((arc.sweep_angle_deg - 180.0).abs() < 1e-9);

        assert!(session.undo());
        assert!(session.shapes().is_empty());
    }

    #[test]
    fn test_protractor_sweep_wraps() {
        let mut session = Session::new();
        arm_tool(&mut session, ToolKind::Protractor);
        let mut controller = GestureController::new();

        // Start at 90°, move to 0°: sweep is 270, not -90
        drag(&mut controller, &mut session, &[Point::new(500.0, 600.0), Point::new(600.0, 500.0)]);
        let expected = Arc::new(CENTER, 200.0, 90.0, 270.0);
        let Shape::Arc(arc) = &session.shapes()[0] else {
            panic!("expected arc");
        };
        assert!((arc.start_angle_deg - expected.start_angle_deg).abs() < 1e-9);
        assert!((arc.sweep_angle_deg - expected.sweep_angle_deg).abs() < 1e-9);
    }

    #[test]
    fn test_freehand_stroke() {
        let mut session = Session::new();
        let mut controller = GestureController::new();
        let points = [Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 0.0)];

        controller.drag_start(&mut session, points[0]);
        controller.drag_move(&mut session, points[1]);
        controller.drag_move(&mut session, points[2]);
        assert_eq!(controller.stroke_points(), &points);
        controller.drag_end(&mut session, None);

        assert_eq!(session.shapes().len(), 2);
        assert_eq!(session.undo_depth(), 1);
    }

    #[test]
    fn test_freehand_single_point_commits_nothing() {
        let mut session = Session::new();
        let mut controller = GestureController::new();
        drag(&mut controller, &mut session, &[Point::new(1.0, 1.0)]);
        assert!(session.shapes().is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_rotation_snap_fires_feedback_once() {
        let mut session = Session::new();
        let ruler = session.select_tool_kind(ToolKind::Ruler).unwrap();
        let mut controller = GestureController::with_feedback(CountingFeedback::default());
        let handle = session.tool(ruler).unwrap().transform().rotate_handle();
        let radius = geometry::distance(CENTER, handle);

        // Handle sits at 90° from the tool position; rotation = angle - 90
        controller.drag_start(&mut session, handle);
        assert!(matches!(controller.state(), DragState::Rotating { .. }));

        controller.drag_move(&mut session, geometry::polar_offset(CENTER, 182.0, radius));
        assert_eq!(session.tool(ruler).unwrap().transform().rotation_deg, 90.0);
        assert!(session.snap_indicator().active);
        assert_eq!(controller.feedback().snap_locks, 1);

        controller.drag_move(&mut session, geometry::polar_offset(CENTER, 181.0, radius));
        assert_eq!(controller.feedback().snap_locks, 1);

        controller.drag_move(&mut session, geometry::polar_offset(CENTER, 172.0, radius));
        let rotation = session.tool(ruler).unwrap().transform().rotation_deg;
        assert!((rotation - 82.0).abs() < 1e-9);
        assert!(!session.snap_indicator().active);

        controller.drag_move(&mut session, geometry::polar_offset(CENTER, 178.0, radius));
        assert_eq!(controller.feedback().snap_locks, 2);

        controller.drag_end(&mut session, None);
        assert!(!session.snap_indicator().active);
        assert!(session.shapes().is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_move_mode_drags_tool() {
        let mut session = Session::new();
        let id = session.select_tool_kind(ToolKind::SetSquare).unwrap();
        let mut controller = GestureController::new();

        drag(&mut controller, &mut session, &[Point::new(480.0, 490.0), Point::new(300.0, 200.0)]);
        let transform = session.tool(id).unwrap().transform();
        assert_eq!(transform.position, Point::new(300.0, 200.0));
        assert!(session.shapes().is_empty());
    }

    #[test]
    fn test_cancel_rolls_back_transient_state() {
        let mut session = Session::new();
        session.commit_arc(Point::new(0.0, 0.0), 50.0, 0.0, 90.0);
        arm_tool(&mut session, ToolKind::Protractor);
        let mut controller = GestureController::new();

        controller.drag_start(&mut session, Point::new(600.0, 500.0));
        controller.drag_move(&mut session, Point::new(500.0, 600.0));
        assert_eq!(session.shapes().len(), 2);
        controller.drag_cancel(&mut session);

        assert_eq!(session.shapes(), &[Shape::Arc(Arc::new(Point::new(0.0, 0.0), 50.0, 0.0, 90.0))]);
        assert_eq!(session.undo_depth(), 1);
        assert!(!controller.is_dragging());

        // A drag end after cancel is a no-op
        controller.drag_end(&mut session, None);
        assert_eq!(session.shapes().len(), 1);
    }

    #[test]
    fn test_tap_selection_exclusive() {
        let mut session = Session::new();
        session.commit_ruler_line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let mut controller = GestureController::new();

        controller.handle(&mut session, GestureEvent::Tap(Point::new(500.0, 510.0)));
        assert_eq!(session.selected_tool().map(Tool::kind), Some(ToolKind::Ruler));

        controller.handle(&mut session, GestureEvent::Tap(Point::new(50.0, 5.0)));
        assert_eq!(session.selection(), Selection::Shape(0));
        assert!(session.selected_tool().is_none());

        controller.handle(&mut session, GestureEvent::Tap(Point::new(900.0, 100.0)));
        assert_eq!(session.selection(), Selection::None);
    }

    #[test]
    fn test_events_in_screen_space() {
        let camera = Camera {
            zoom: 2.0,
            ..Camera::default()
        };
        let event = GestureEvent::DragMove(Point::new(200.0, 100.0)).to_world(&camera);
        assert_eq!(event, GestureEvent::DragMove(Point::new(100.0, 50.0)));
        assert_eq!(GestureEvent::DragEnd(None).to_world(&camera), GestureEvent::DragEnd(None));
        assert_eq!(
            GestureEvent::DragEnd(Some(Point::new(40.0, 20.0))).to_world(&camera),
            GestureEvent::DragEnd(Some(Point::new(20.0, 10.0)))
        );
    }

    #[test]
    fn test_gesture_event_json() {
        let event: GestureEvent = serde_json::from_str(r#"{ "type": "tap", "point": { "x": 1.0, "y": 2.0 } }"#).unwrap();
        assert_eq!(event, GestureEvent::Tap(Point::new(1.0, 2.0)));
        let end: GestureEvent = serde_json::from_str(r#"{ "type": "drag_end", "point": null }"#).unwrap();
        assert_eq!(end, GestureEvent::DragEnd(None));
        let cancel: GestureEvent = serde_json::from_str(r#"{ "type": "drag_cancel" }"#).unwrap();
        assert_eq!(cancel, GestureEvent::DragCancel);
    }

    #[test]
    fn test_rotated_tool_moves_handle() {
        let mut session = Session::new();
        let id = session.select_tool_kind(ToolKind::Ruler).unwrap();
        session.update_tool_transform(id, ToolTransform::default().with_rotation(90.0));
        let mut controller = GestureController::new();

        // The unrotated handle position is now plain canvas; move mode applies
        controller.drag_start(&mut session, Point::new(500.0, 548.0));
        assert!(matches!(controller.state(), DragState::Moving { .. }));
        controller.drag_cancel(&mut session);

        let handle = session.tool(id).unwrap().transform().rotate_handle();
        controller.drag_start(&mut session, handle);
        assert!(matches!(controller.state(), DragState::Rotating { .. }));
    }

    #[test]
    fn test_drag_end_point_is_final_position() {
        let mut session = Session::new();
        arm_tool(&mut session, ToolKind::Ruler);
        let mut controller = GestureController::new();

        controller.handle(&mut session, GestureEvent::DragStart(Point::new(100.0, 100.0)));
        controller.handle(&mut session, GestureEvent::DragMove(Point::new(150.0, 100.0)));
        controller.handle(&mut session, GestureEvent::DragEnd(Some(Point::new(250.0, 140.0))));

        assert_eq!(
            session.shapes(),
            &[Shape::Line(LineSegment::new(Point::new(100.0, 100.0), Point::new(250.0, 140.0)))]
        );
    }

    #[test]
    fn test_handle_radius_follows_view_zoom() {
        let mut session = Session::new();
        let id = session.select_tool_kind(ToolKind::Ruler).unwrap();
        let handle = session.tool(id).unwrap().transform().rotate_handle();
        // 20 world units from the handle: inside 28 at zoom 1, outside 14 at zoom 2
        let grab = Point::new(handle.x + 20.0, handle.y);

        let mut controller = GestureController::new();
        controller.drag_start(&mut session, grab);
        assert!(matches!(controller.state(), DragState::Rotating { .. }));
        controller.drag_cancel(&mut session);

        controller.set_view_zoom(2.0);
        controller.drag_start(&mut session, grab);
        assert!(matches!(controller.state(), DragState::Moving { .. }));
        controller.drag_cancel(&mut session);

        controller.set_view_zoom(0.0);
        assert_eq!(controller.view_zoom(), 2.0);
    }
}
