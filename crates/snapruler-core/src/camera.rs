//! View transform between screen (gesture) coordinates and canvas world coordinates.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Pan/zoom state of the canvas view.
///
/// Tool hit radii and snap tolerances are world-space values and do not scale
/// with `zoom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Screen-space translation of the world origin.
    pub offset: Vec2,
    /// Screen pixels per world unit.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// World-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen-to-world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping `screen_point` over the same world point.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let anchor = self.screen_to_world(screen_point);
        self.zoom = new_zoom;
        self.offset += screen_point - self.world_to_screen(anchor);
        log::trace!("Zoom {:.3} offset {:?}", self.zoom, self.offset);
    }

    /// Back to identity.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Scale and center so the whole canvas fits in `viewport`.
    pub fn fit_canvas(&mut self, canvas: Size, viewport: Size) {
        if canvas.is_zero_area() {
            self.reset();
            return;
        }
        let scale = (viewport.width / canvas.width).min(viewport.height / canvas.height);
        self.zoom = scale.clamp(self.min_zoom, self.max_zoom);
        self.offset = Vec2::new(
            (viewport.width - canvas.width * self.zoom) / 2.0,
            (viewport.height - canvas.height * self.zoom) / 2.0,
        );
    }
}
