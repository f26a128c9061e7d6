//! In-progress multi-event gestures.

use crate::geometry;
use crate::scene::{ElementId, Endpoint};
use kurbo::{Point, Rect, Vec2};

/// A marquee being dragged out, in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Normalized rectangle spanned by the marquee.
    pub fn to_rect(&self) -> Rect {
        geometry::rect_from_corners(self.start, self.current)
    }
}

/// A wire anchored at one port, following the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWire {
    pub from: Endpoint,
    /// Live pointer position in scene coordinates.
    pub pointer: Point,
}

/// Element positions captured when a drag starts.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// Pointer position at drag start, scene coordinates.
    pub start: Point,
    /// Each dragged element with its position at drag start.
    pub origins: Vec<(ElementId, Point)>,
    /// Whether any element has actually moved (and history was recorded).
    pub moved: bool,
}

impl DragState {
    pub fn new(start: Point, origins: Vec<(ElementId, Point)>) -> Self {
        Self {
            start,
            origins,
            moved: false,
        }
    }

    /// Target positions for a pointer at `pointer`, snapped to the grid.
    pub fn targets(&self, pointer: Point, grid_size: f64) -> Vec<(ElementId, Point)> {
        let delta: Vec2 = pointer - self.start;
        self.origins
            .iter()
            .map(|(id, origin)| (id.clone(), geometry::snap_point(*origin + delta, grid_size)))
            .collect()
    }
}

/// The single gesture the controller is tracking.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragState),
    BoxSelecting(Marquee),
    StringingWire(PendingWire),
    Panning {
        /// Pointer position at pan start, screen coordinates.
        origin: Point,
        start_pan: Vec2,
        /// Wire in progress when the pan began, resumed afterwards.
        resume_wire: Option<PendingWire>,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Short state name for logs and status lines.
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging(_) => "dragging",
            Gesture::BoxSelecting(_) => "box-selecting",
            Gesture::StringingWire(_) => "stringing-wire",
            Gesture::Panning { .. } => "panning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marquee_normalizes() {
        let mut marquee = Marquee::new(Point::new(50.0, 50.0));
        marquee.current = Point::new(10.0, 80.0);
        assert_eq!(marquee.to_rect(), Rect::new(10.0, 50.0, 50.0, 80.0));
    }

    #[test]
    fn test_drag_targets_snap() {
        let drag = DragState::new(
            Point::new(5.0, 5.0),
            vec![
                ("a".to_string(), Point::new(0.0, 0.0)),
                ("b".to_string(), Point::new(100.0, 40.0)),
            ],
        );
        let targets = drag.targets(Point::new(18.0, 9.0), 10.0);
        assert_eq!(targets[0].1, Point::new(10.0, 0.0));
        assert_eq!(targets[1].1, Point::new(110.0, 40.0));
    }
}
