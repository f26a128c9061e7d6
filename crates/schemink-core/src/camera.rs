//! View transform for pan/zoom.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const MIN_ZOOM: f64 = 0.2;
/// Default upper zoom bound.
pub const MAX_ZOOM: f64 = 5.0;

/// Pan/zoom state mapping scene coordinates to screen coordinates.
///
/// `screen = scene * zoom + pan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Screen-space translation.
    pub pan: Vec2,
    /// Scale factor, always within `[min_zoom, max_zoom]`.
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Size of the visible area in screen pixels.
    pub viewport: Size,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            viewport: Size::new(1280.0, 800.0),
        }
    }
}

impl ViewTransform {
    /// Create a view with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view with custom zoom bounds.
    pub fn with_zoom_bounds(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Scene-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Screen-to-scene transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    pub fn screen_to_scene(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn scene_to_screen(&self, scene_point: Point) -> Point {
        self.transform() * scene_point
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        // max/min instead of clamp: inverted bounds settle on max_zoom
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// Multiply zoom by `1 + delta` keeping `screen_point` fixed over the
    /// same scene point.
    pub fn zoom_at(&mut self, screen_point: Point, delta: f64) {
        let new_zoom = self.clamp_zoom(self.zoom * (1.0 + delta));
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let scene_point = self.screen_to_scene(screen_point);
        self.zoom = new_zoom;

        // Shift pan so scene_point lands back under the cursor
        let new_screen = self.scene_to_screen(scene_point);
        self.pan += screen_point - new_screen;
    }

    /// Zoom about the viewport center.
    pub fn zoom_by(&mut self, delta: f64) {
        let center = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.zoom_at(center, delta);
    }

    /// Back to zoom 1 with no pan.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Fit `bounds` inside the viewport with `padding` on every side.
    pub fn fit_to_bounds(&mut self, bounds: Rect, padding: f64) {
        let padded = Size::new(
            (self.viewport.width - padding * 2.0).max(1.0),
            (self.viewport.height - padding * 2.0).max(1.0),
        );

        let scale_x = padded.width / bounds.width().max(1.0);
        let scale_y = padded.height / bounds.height().max(1.0);
        self.zoom = self.clamp_zoom(scale_x.min(scale_y));

        let bounds_center = bounds.center();
        let viewport_center = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.pan = Vec2::new(
            viewport_center.x - bounds_center.x * self.zoom,
            viewport_center.y - bounds_center.y * self.zoom,
        );
    }
}
