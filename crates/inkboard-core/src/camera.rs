//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level that corresponds to "100%".
pub const BASE_ZOOM: f64 = 1.0;

/// Factor applied by one zoom-in or zoom-out step.
pub const ZOOM_STEP: f64 = 1.1;

/// Camera manages the view transform for the whiteboard.
///
/// World coordinates are raster surface coordinates; overlay widgets are
/// stored in world coordinates and shown at their screen position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (BASE_ZOOM = 100%)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: BASE_ZOOM,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// World to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Screen rectangle covered by a world rectangle.
    pub fn world_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(self.world_to_screen(rect.origin()), self.world_to_screen(Point::new(rect.x1, rect.y1)))
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        self.offset += Vec2::new(screen_point.x - new_screen.x, screen_point.y - new_screen.y);
    }

    /// One step closer, anchored at the screen origin.
    pub fn zoom_in(&mut self) {
        self.zoom_at(Point::ZERO, ZOOM_STEP);
    }

    /// One step further out, anchored at the screen origin.
    pub fn zoom_out(&mut self) {
        self.zoom_at(Point::ZERO, 1.0 / ZOOM_STEP);
    }
}
