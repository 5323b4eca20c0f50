//! Pointer input delivered to the whiteboard.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in surface-local (or, before camera conversion, screen)
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// Pointer left the surface. Ends a drag like `Up`.
    Leave,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent::Down {
            position: Point::new(x, y),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        PointerEvent::Up {
            position: Point::new(x, y),
        }
    }

    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => Some(*position),
            PointerEvent::Leave => None,
        }
    }

    /// Same event with its position mapped through `f`.
    pub fn map_position(self, f: impl FnOnce(Point) -> Point) -> Self {
        match self {
            PointerEvent::Down { position } => PointerEvent::Down { position: f(position) },
            PointerEvent::Move { position } => PointerEvent::Move { position: f(position) },
            PointerEvent::Up { position } => PointerEvent::Up { position: f(position) },
            PointerEvent::Leave => PointerEvent::Leave,
        }
    }
}
