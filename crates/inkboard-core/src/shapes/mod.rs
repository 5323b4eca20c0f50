//! Shape outlines built from an anchor point and the current pointer.

use crate::tools::ToolKind;
use kurbo::{BezPath, Circle, Ellipse, Point, Rect, Shape};
use std::f64::consts::PI;

/// Length of each arrowhead stroke.
pub const ARROW_HEAD_LENGTH: f64 = 10.0;

/// Angle between the shaft and each arrowhead stroke.
pub const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// Flattening tolerance for curved outlines.
const TOLERANCE: f64 = 0.1;

/// Two-point shapes the preview renderer can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
    Ellipse,
    Arrow,
}

impl ShapeKind {
    /// Shape drawn by a tool, if the tool draws one.
    pub fn from_tool(tool: ToolKind) -> Option<Self> {
        match tool {
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            ToolKind::Arrow => Some(ShapeKind::Arrow),
            ToolKind::Pen | ToolKind::Eraser | ToolKind::Text => None,
        }
    }

    /// Outline from `anchor` to `current`.
    pub fn outline(self, anchor: Point, current: Point, arrow_head: f64) -> BezPath {
        match self {
            ShapeKind::Line => line_path(anchor, current),
            ShapeKind::Rectangle => rectangle_path(anchor, current),
            ShapeKind::Circle => circle_path(anchor, current),
            ShapeKind::Ellipse => ellipse_path(anchor, current),
            ShapeKind::Arrow => arrow_path(anchor, current, arrow_head),
        }
    }
}

/// A single segment.
pub fn line_path(anchor: Point, current: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(anchor);
    path.line_to(current);
    path
}

/// Axis-aligned box with opposite corners at the two points.
pub fn rectangle_path(anchor: Point, current: Point) -> BezPath {
    // from_points normalizes, so dragging up-left works
    Rect::from_points(anchor, current).to_path(TOLERANCE)
}

/// Circle centered on the anchor passing through the current point.
pub fn circle_path(anchor: Point, current: Point) -> BezPath {
    Circle::new(anchor, anchor.distance(current)).to_path(TOLERANCE)
}

/// Ellipse inscribed in the box between the two points.
pub fn ellipse_path(anchor: Point, current: Point) -> BezPath {
    Ellipse::from_rect(Rect::from_points(anchor, current)).to_path(TOLERANCE)
}

/// Endpoints of the two arrowhead strokes at `tip`.
pub fn arrow_head(tail: Point, tip: Point, head_length: f64) -> (Point, Point) {
    let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
    let left = Point::new(
        tip.x - head_length * (angle - ARROW_HEAD_ANGLE).cos(),
        tip.y - head_length * (angle - ARROW_HEAD_ANGLE).sin(),
    );
    let right = Point::new(
        tip.x - head_length * (angle + ARROW_HEAD_ANGLE).cos(),
        tip.y - head_length * (angle + ARROW_HEAD_ANGLE).sin(),
    );
    (left, right)
}

/// Shaft from anchor to current point plus a V-shaped head at the current point.
pub fn arrow_path(anchor: Point, current: Point, head_length: f64) -> BezPath {
    let (left, right) = arrow_head(anchor, current, head_length);
    let mut path = BezPath::new();
    path.move_to(anchor);
    path.line_to(current);
    path.line_to(left);
    path.move_to(current);
    path.line_to(right);
    path
}

/// Open polyline through `points`, in order.
pub fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for point in iter {
            path.line_to(*point);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_from_tool() {
        assert_eq!(ShapeKind::from_tool(ToolKind::Arrow), Some(ShapeKind::Arrow));
        assert_eq!(ShapeKind::from_tool(ToolKind::Pen), None);
        assert_eq!(ShapeKind::from_tool(ToolKind::Text), None);
    }

    #[test]
    fn test_rectangle_dragged_up_left() {
        let forward = rectangle_path(Point::new(10.0, 10.0), Point::new(100.0, 60.0)).bounding_box();
        let backward = rectangle_path(Point::new(100.0, 60.0), Point::new(10.0, 10.0)).bounding_box();
        assert_eq!(forward, backward);
        assert_eq!(forward, Rect::new(10.0, 10.0, 100.0, 60.0));
    }

    #[test]
    fn test_circle_radius_is_distance() {
        let bbox = circle_path(Point::new(50.0, 50.0), Point::new(53.0, 54.0)).bounding_box();
        assert_close(bbox.width(), 10.0);
        assert_close(bbox.height(), 10.0);
        assert_close(bbox.center().x, 50.0);
        assert_close(bbox.center().y, 50.0);
    }

    #[test]
    fn test_ellipse_fills_bounding_box() {
        let bbox = ellipse_path(Point::new(80.0, 10.0), Point::new(20.0, 50.0)).bounding_box();
        assert_close(bbox.x0, 20.0);
        assert_close(bbox.y0, 10.0);
        assert_close(bbox.x1, 80.0);
        assert_close(bbox.y1, 50.0);
    }

    #[test]
    fn test_arrow_head_points_back_along_shaft() {
        let (left, right) = arrow_head(Point::ZERO, Point::new(100.0, 0.0), ARROW_HEAD_LENGTH);
        let back = 100.0 - ARROW_HEAD_LENGTH * (PI / 6.0).cos();
        assert_close(left.x, back);
        assert_close(right.x, back);
        assert_close(left.y, 5.0);
        assert_close(right.y, -5.0);
        assert_close(left.distance(Point::new(100.0, 0.0)), ARROW_HEAD_LENGTH);
    }

    #[test]
    fn test_arrow_path_segments() {
        let path = arrow_path(Point::ZERO, Point::new(0.0, 50.0), ARROW_HEAD_LENGTH);
        // shaft + head stroke, then a separate head stroke
        assert_eq!(path.segments().count(), 3);
    }

    #[test]
    fn test_polyline() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert_eq!(polyline_path(&points).segments().count(), 2);
        assert_eq!(polyline_path(&[]).elements().len(), 0);
    }
}
