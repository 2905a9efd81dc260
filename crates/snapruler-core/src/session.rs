//! Drawing session: the single owner of shapes, tools, selection and history.

use crate::config::SessionConfig;
use crate::hit_test;
use crate::history::History;
use crate::shapes::{Arc, Circle, LineSegment, Shape};
use crate::snap::SnapIndicator;
use crate::tools::{Tool, ToolId, ToolKind, ToolTransform};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What is currently selected. Tool and shape selection are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    /// A tool, by id.
    Tool(ToolId),
    /// A shape, by its index in the shape sequence.
    Shape(usize),
}

/// Change notifications, collected until polled.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The shape sequence changed (commit, preview, undo or redo).
    ShapesChanged,
    /// A tool's transform was replaced.
    ToolChanged(ToolId),
    /// The selection changed.
    SelectionChanged(Selection),
    /// Draw/move mode changed; `true` is draw mode.
    ModeChanged(bool),
    /// The snap indicator was latched (`true`) or cleared (`false`).
    SnapChanged(bool),
}

/// Read-only view of the observable state, for renderers and tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub shapes: Vec<Shape>,
    pub tools: Vec<Tool>,
    pub selection: Selection,
    pub draw_mode: bool,
    pub snap: SnapIndicator,
    pub can_undo: bool,
    pub can_redo: bool,
    pub version: u64,
}

/// The state of one drawing surface.
///
/// Every change to shapes or tools goes through this type. Each mutation bumps
/// [`Session::version`] and queues a [`SessionEvent`].
#[derive(Debug, Clone)]
pub struct Session {
    /// Shapes in drawing order (oldest first). The last entry may be a preview.
    shapes: Vec<Shape>,
    /// The fixed instrument set.
    tools: Vec<Tool>,
    /// Undo/redo snapshots of `shapes`.
    history: History<Vec<Shape>>,
    selection: Selection,
    draw_mode: bool,
    snap: SnapIndicator,
    /// Whether the last shape is an uncommitted preview.
    preview_pending: bool,
    config: SessionConfig,
    version: u64,
    events: Vec<SessionEvent>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create a session with one ruler, one 45° set-square and one protractor.
    pub fn with_config(config: SessionConfig) -> Self {
        let tools = Tool::default_set(config.initial_tool_transform());
        Self {
            shapes: Vec::new(),
            tools,
            history: History::with_limit(config.history_limit),
            selection: Selection::None,
            draw_mode: false,
            snap: SnapIndicator::default(),
            preview_pending: false,
            config,
            version: 0,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // --- Observable state ---

    /// Shapes in drawing order, including a pending preview.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Look up a tool by id.
    ///
    /// The tool set holds exactly three entries for the whole session, so a
    /// linear scan is used instead of an index.
    pub fn tool(&self, id: ToolId) -> Option<&Tool> {
        self.tools.iter().find(|t| t.id() == id)
    }

    /// The first tool of a given kind.
    pub fn tool_of_kind(&self, kind: ToolKind) -> Option<&Tool> {
        self.tools.iter().find(|t| t.kind() == kind)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_tool(&self) -> Option<&Tool> {
        match self.selection {
            Selection::Tool(id) => self.tool(id),
            Selection::None | Selection::Shape(_) => None,
        }
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        match self.selection {
            Selection::Shape(index) => self.shapes.get(index),
            Selection::None | Selection::Tool(_) => None,
        }
    }

    pub fn draw_mode(&self) -> bool {
        self.draw_mode
    }

    pub fn snap_indicator(&self) -> &SnapIndicator {
        &self.snap
    }

    /// Check if the last shape is an uncommitted preview.
    pub fn has_preview(&self) -> bool {
        self.preview_pending
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Monotonic counter bumped on every observable change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Take the change notifications queued since the last poll.
    pub fn poll_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Owned copy of everything a renderer reads.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            shapes: self.shapes.clone(),
            tools: self.tools.clone(),
            selection: self.selection,
            draw_mode: self.draw_mode,
            snap: self.snap,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            version: self.version,
        }
    }

    // --- Queries ---

    /// Tool under `point`, using the configured hit radius.
    pub fn find_tool_at(&self, point: Point) -> Option<&Tool> {
        hit_test::find_tool_at(&self.tools, point, self.config.tool_hit_radius)
    }

    /// Most recent shape under `point`, using the configured tolerance.
    pub fn find_shape_at(&self, point: Point) -> Option<(usize, &Shape)> {
        self.find_shape_at_with(point, self.config.shape_hit_tolerance)
    }

    /// Most recent shape under `point` with an explicit tolerance.
    pub fn find_shape_at_with(&self, point: Point, tolerance: f64) -> Option<(usize, &Shape)> {
        hit_test::find_shape_at(&self.shapes, point, tolerance)
    }

    // --- Commits ---

    /// Commit a freehand polyline as one segment per consecutive pair.
    /// Fewer than two points commit nothing.
    pub fn commit_stroke(&mut self, points: &[Point]) -> bool {
        if points.len() < 2 {
            return false;
        }
        self.push_history();
        self.shapes
            .extend(points.windows(2).map(|w| Shape::Line(LineSegment::new(w[0], w[1]))));
        log::debug!("Committed stroke of {} segments", points.len() - 1);
        self.shapes_changed();
        true
    }

    /// Commit a straight line drawn against the ruler or (pre-snapped) set-square.
    pub fn commit_ruler_line(&mut self, start: Point, end: Point) {
        self.push_history();
        self.shapes.push(Shape::Line(LineSegment::new(start, end)));
        log::debug!("Committed line {:?} -> {:?}", start, end);
        self.shapes_changed();
    }

    /// Commit an arc with explicit radius and angles.
    pub fn commit_arc(&mut self, center: Point, radius: f64, start_angle_deg: f64, sweep_angle_deg: f64) {
        self.push_history();
        self.shapes
            .push(Shape::Arc(Arc::new(center, radius, start_angle_deg, sweep_angle_deg)));
        log::debug!(
            "Committed arc at {:?} r={} start={} sweep={}",
            center,
            radius,
            start_angle_deg,
            sweep_angle_deg
        );
        self.shapes_changed();
    }

    /// Commit the shape described by a center and a dragged point.
    ///
    /// This entry point derives the radius from `point` and records a full
    /// circle; it is kept separate from [`Session::commit_arc`].
    pub fn commit_arc_from_point(&mut self, center: Point, point: Point) {
        self.push_history();
        let circle = Circle::through(center, point);
        log::debug!("Committed circle at {:?} r={}", center, circle.radius);
        self.shapes.push(Shape::Circle(circle));
        self.shapes_changed();
    }

    // --- Previews ---

    /// Show an arc as live drag feedback, replacing any pending preview.
    /// Previews are not recorded in history.
    pub fn add_arc_preview(&mut self, center: Point, radius: f64, start_angle_deg: f64, sweep_angle_deg: f64) {
        self.replace_preview(Shape::Arc(Arc::new(center, radius, start_angle_deg, sweep_angle_deg)));
    }

    /// Show a circle through `point` as live drag feedback, replacing any pending preview.
    pub fn add_circle_preview(&mut self, center: Point, point: Point) {
        self.replace_preview(Shape::Circle(Circle::through(center, point)));
    }

    /// Remove a pending preview, if any. Committed shapes are never touched.
    pub fn discard_preview(&mut self) -> bool {
        if self.drop_preview() {
            self.shapes_changed();
            true
        } else {
            false
        }
    }

    fn replace_preview(&mut self, preview: Shape) {
        self.drop_preview();
        log::trace!("Preview {}", preview.kind_name());
        self.shapes.push(preview);
        self.preview_pending = true;
        self.shapes_changed();
    }

    fn drop_preview(&mut self) -> bool {
        if !self.preview_pending {
            return false;
        }
        self.preview_pending = false;
        self.shapes.pop();
        self.fix_shape_selection();
        true
    }

    // --- History ---

    /// Undo the last commit. Returns false if there was nothing to undo,
    /// in which case a pending preview is left alone.
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        self.drop_preview();
        let current = std::mem::take(&mut self.shapes);
        match self.history.undo(current) {
            Ok(previous) => {
                self.shapes = previous;
                log::debug!("Undo -> {} shapes", self.shapes.len());
                self.fix_shape_selection();
                self.shapes_changed();
                true
            }
            Err(current) => {
                self.shapes = current;
                false
            }
        }
    }

    /// Redo the last undone commit. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        self.drop_preview();
        let current = std::mem::take(&mut self.shapes);
        match self.history.redo(current) {
            Ok(next) => {
                self.shapes = next;
                log::debug!("Redo -> {} shapes", self.shapes.len());
                self.fix_shape_selection();
                self.shapes_changed();
                true
            }
            Err(current) => {
                self.shapes = current;
                false
            }
        }
    }

    /// Record the pre-mutation shapes (call before every commit).
    ///
    /// A pending preview is dropped first so it never ends up in a snapshot.
    fn push_history(&mut self) {
        self.drop_preview();
        self.history.record(self.shapes.clone());
    }

    // --- Tools ---

    /// Replace the transform of the tool with `tool_id`. Not undoable.
    pub fn update_tool_transform(&mut self, tool_id: ToolId, transform: ToolTransform) -> bool {
        let Some(tool) = self.tools.iter_mut().find(|t| t.id() == tool_id) else {
            log::warn!("Ignoring transform update for unknown tool {}", tool_id);
            return false;
        };
        tool.set_transform(transform);
        log::trace!("Tool {} -> {:?}", tool_id, transform);
        self.changed(SessionEvent::ToolChanged(tool_id));
        true
    }

    // --- Selection and mode ---

    /// Select a tool by id, clearing any shape selection.
    pub fn select_tool(&mut self, tool_id: ToolId) -> bool {
        if self.tool(tool_id).is_none() {
            log::warn!("Ignoring selection of unknown tool {}", tool_id);
            return false;
        }
        self.set_selection(Selection::Tool(tool_id));
        true
    }

    /// Select the first tool of `kind`.
    pub fn select_tool_kind(&mut self, kind: ToolKind) -> Option<ToolId> {
        let id = self.tool_of_kind(kind)?.id();
        self.set_selection(Selection::Tool(id));
        Some(id)
    }

    /// Select a shape by index, clearing any tool selection.
    pub fn select_shape(&mut self, index: usize) -> bool {
        if index >= self.shapes.len() {
            return false;
        }
        self.set_selection(Selection::Shape(index));
        true
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(Selection::None);
    }

    /// Clear every selection and return to move mode.
    pub fn deselect_all(&mut self) {
        self.clear_selection();
        self.set_draw_mode(false);
    }

    pub fn set_selection(&mut self, selection: Selection) {
        if self.selection != selection {
            self.selection = selection;
            self.changed(SessionEvent::SelectionChanged(selection));
        }
    }

    pub fn set_draw_mode(&mut self, draw_mode: bool) {
        if self.draw_mode != draw_mode {
            self.draw_mode = draw_mode;
            log::debug!("{} mode", if draw_mode { "Draw" } else { "Move" });
            self.changed(SessionEvent::ModeChanged(draw_mode));
        }
    }

    pub fn toggle_draw_mode(&mut self) {
        self.set_draw_mode(!self.draw_mode);
    }

    // --- Snap indicator ---

    /// Latch the snap indicator at `anchor`. Returns true if it was previously inactive.
    pub fn latch_snap(&mut self, anchor: Point, angle_deg: f64) -> bool {
        let was_active = self.snap.active;
        let latched = SnapIndicator::latched(anchor, angle_deg);
        if self.snap != latched {
            self.snap = latched;
            self.changed(SessionEvent::SnapChanged(true));
        }
        !was_active
    }

    pub fn clear_snap(&mut self) {
        if self.snap != SnapIndicator::cleared() {
            self.snap = SnapIndicator::cleared();
            self.changed(SessionEvent::SnapChanged(false));
        }
    }

    // --- Internals ---

    fn fix_shape_selection(&mut self) {
        if let Selection::Shape(index) = self.selection {
            if index >= self.shapes.len() {
                self.set_selection(Selection::None);
            }
        }
    }

    fn shapes_changed(&mut self) {
        self.changed(SessionEvent::ShapesChanged);
    }

    fn changed(&mut self, event: SessionEvent) {
        self.version += 1;
        self.events.push(event);
    }
}
