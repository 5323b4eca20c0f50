//! Pointer-driven preview and commit of strokes on the raster surface.
//!
//! A drag captures a [`Snapshot`] when it starts. Every move restores that
//! snapshot and redraws the gesture from scratch, so the number of move
//! events never changes what ends up on the surface. Releasing the pointer
//! leaves the last frame in place as the committed drawing.

use crate::input::PointerEvent;
use crate::shapes::{ARROW_HEAD_LENGTH, ShapeKind, polyline_path};
use crate::surface::{RasterSurface, Snapshot};
use crate::tools::{ToolKind, ToolSettings};
use kurbo::Point;

/// Interaction state.
#[derive(Debug, Clone, Default)]
pub enum DragState {
    /// Waiting for a pointer press.
    #[default]
    Idle,
    /// Pointer is held down.
    Dragging {
        /// Where the drag started.
        anchor: Point,
        /// Latest pointer position.
        current: Point,
        /// Tool the drag was started with.
        tool: ToolKind,
        /// Surface contents at drag start.
        snapshot: Snapshot,
    },
}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewOutcome {
    /// Nothing happened (idle move, locked surface, stray release).
    Ignored,
    /// A drag started.
    Started,
    /// The preview was redrawn.
    Updated,
    /// The drag ended and its last frame is now committed.
    Committed,
    /// The text tool was pressed here; a text box should be created.
    PlaceText(Point),
}

/// Renders non-accumulating shape previews and accumulating freehand strokes.
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    state: DragState,
    /// Points of the current pen/eraser stroke.
    live_path: Vec<Point>,
    arrow_head: f64,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::with_arrow_head(ARROW_HEAD_LENGTH)
    }

    /// Renderer drawing arrowheads of the given stroke length.
    pub fn with_arrow_head(arrow_head: f64) -> Self {
        Self {
            state: DragState::Idle,
            live_path: Vec::new(),
            arrow_head,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Points of the pen/eraser stroke in progress.
    pub fn live_path(&self) -> &[Point] {
        &self.live_path
    }

    /// Drop any drag in progress without touching the surface.
    ///
    /// Call this whenever the surface is replaced underneath the renderer,
    /// since the captured snapshot no longer matches it.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.live_path.clear();
    }

    /// Feed one pointer event.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        settings: &ToolSettings,
        surface: &mut RasterSurface,
    ) -> PreviewOutcome {
        match event {
            PointerEvent::Down { position } => self.begin(position, settings, surface),
            PointerEvent::Move { position } => self.update(position, settings, surface),
            PointerEvent::Up { .. } | PointerEvent::Leave => self.end(),
        }
    }

    fn begin(&mut self, point: Point, settings: &ToolSettings, surface: &RasterSurface) -> PreviewOutcome {
        if settings.locked {
            log::debug!("Surface locked, ignoring pointer press");
            return PreviewOutcome::Ignored;
        }

        if settings.tool == ToolKind::Text {
            self.reset();
            return PreviewOutcome::PlaceText(point);
        }

        self.live_path.clear();
        if settings.tool.is_freehand() {
            self.live_path.push(point);
        }

        self.state = DragState::Dragging {
            anchor: point,
            current: point,
            tool: settings.tool,
            snapshot: surface.snapshot(),
        };
        PreviewOutcome::Started
    }

    fn update(&mut self, point: Point, settings: &ToolSettings, surface: &mut RasterSurface) -> PreviewOutcome {
        if settings.locked {
            return PreviewOutcome::Ignored;
        }

        let DragState::Dragging {
            anchor,
            current,
            tool,
            snapshot,
        } = &mut self.state
        else {
            return PreviewOutcome::Ignored;
        };
        *current = point;

        surface.restore(snapshot);

        // Style is read per frame; only the tool is fixed for the gesture.
        let style = &settings.style;
        if tool.is_freehand() {
            self.live_path.push(point);
            surface.stroke(&polyline_path(&self.live_path), style, tool.compositing());
        } else if let Some(kind) = ShapeKind::from_tool(*tool) {
            let outline = kind.outline(*anchor, point, self.arrow_head);
            surface.stroke(&outline, style, tool.compositing());
        }

        PreviewOutcome::Updated
    }

    fn end(&mut self) -> PreviewOutcome {
        if !self.is_dragging() {
            return PreviewOutcome::Ignored;
        }
        self.reset();
        PreviewOutcome::Committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::shapes::rectangle_path;
    use crate::tools::{Compositing, StrokeStyle};

    fn settings(tool: ToolKind) -> ToolSettings {
        ToolSettings {
            tool,
            style: StrokeStyle {
                width: 3.0,
                color: Rgba::rgb(0, 0, 255),
            },
            locked: false,
        }
    }

    fn drag(
        renderer: &mut PreviewRenderer,
        settings: &ToolSettings,
        surface: &mut RasterSurface,
        points: &[(f64, f64)],
    ) {
        let (first, rest) = points.split_first().unwrap();
        renderer.handle(PointerEvent::down(first.0, first.1), settings, surface);
        for (x, y) in rest {
            renderer.handle(PointerEvent::moved(*x, *y), settings, surface);
        }
        let (x, y) = points.last().unwrap();
        renderer.handle(PointerEvent::up(*x, *y), settings, surface);
    }

    #[test]
    fn test_shape_preview_does_not_accumulate() {
        for tool in [ToolKind::Line, ToolKind::Rectangle, ToolKind::Circle, ToolKind::Ellipse, ToolKind::Arrow] {
            let settings = settings(tool);

            let mut many = RasterSurface::new(120, 120).unwrap();
            let mut renderer = PreviewRenderer::new();
            drag(
                &mut renderer,
                &settings,
                &mut many,
                &[(20.0, 20.0), (90.0, 30.0), (40.0, 100.0), (70.0, 15.0), (80.0, 80.0)],
            );

            let mut once = RasterSurface::new(120, 120).unwrap();
            let mut renderer = PreviewRenderer::new();
            drag(&mut renderer, &settings, &mut once, &[(20.0, 20.0), (80.0, 80.0)]);

            assert!(!once.is_blank(), "{:?} drew nothing", tool);
            assert_eq!(many.data(), once.data(), "{:?} accumulated preview frames", tool);
        }
    }

    #[test]
    fn test_preview_keeps_prior_content() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();
        let settings = settings(ToolKind::Line);

        drag(&mut renderer, &settings, &mut surface, &[(10.0, 10.0), (90.0, 10.0)]);
        let first_line = surface.pixel(50, 10);
        drag(&mut renderer, &settings, &mut surface, &[(10.0, 90.0), (50.0, 50.0), (90.0, 90.0)]);

        assert_eq!(surface.pixel(50, 10), first_line);
        assert_eq!(surface.pixel(50, 90), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_pen_stroke_is_concatenation_of_moves() {
        let points = [(10.0, 10.0), (40.0, 15.0), (60.0, 50.0), (20.0, 70.0)];
        let settings = settings(ToolKind::Pen);

        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();
        renderer.handle(PointerEvent::down(10.0, 10.0), &settings, &mut surface);
        for (x, y) in &points[1..] {
            renderer.handle(PointerEvent::moved(*x, *y), &settings, &mut surface);
        }
        let expected_path: Vec<Point> = points.iter().map(|(x, y)| Point::new(*x, *y)).collect();
        assert_eq!(renderer.live_path(), expected_path.as_slice());
        renderer.handle(PointerEvent::up(20.0, 70.0), &settings, &mut surface);

        let mut reference = RasterSurface::new(100, 100).unwrap();
        reference.stroke(&polyline_path(&expected_path), &settings.style, Compositing::SourceOver);
        assert_eq!(surface.data(), reference.data());
    }

    #[test]
    fn test_eraser_removes_existing_content() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();

        drag(&mut renderer, &settings(ToolKind::Line), &mut surface, &[(10.0, 50.0), (90.0, 50.0)]);
        assert_eq!(surface.pixel(50, 50), Some([0, 0, 255, 255]));

        let mut eraser = settings(ToolKind::Eraser);
        eraser.style.width = 20.0;
        drag(&mut renderer, &eraser, &mut surface, &[(50.0, 20.0), (50.0, 80.0)]);

        assert_eq!(surface.pixel(50, 50), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(15, 50), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_release_starts_fresh_path() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();
        let settings = settings(ToolKind::Pen);

        drag(&mut renderer, &settings, &mut surface, &[(10.0, 10.0), (30.0, 30.0)]);
        assert!(renderer.live_path().is_empty());
        assert!(!renderer.is_dragging());

        renderer.handle(PointerEvent::down(70.0, 70.0), &settings, &mut surface);
        assert_eq!(renderer.live_path(), &[Point::new(70.0, 70.0)]);
    }

    #[test]
    fn test_moves_after_release_do_nothing() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();
        let settings = settings(ToolKind::Rectangle);

        drag(&mut renderer, &settings, &mut surface, &[(10.0, 10.0), (60.0, 60.0)]);
        let committed = surface.data().to_vec();

        let outcome = renderer.handle(PointerEvent::moved(90.0, 90.0), &settings, &mut surface);
        assert_eq!(outcome, PreviewOutcome::Ignored);
        assert_eq!(surface.data(), committed.as_slice());
    }

    #[test]
    fn test_leave_ends_drag() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();
        let settings = settings(ToolKind::Rectangle);

        renderer.handle(PointerEvent::down(10.0, 10.0), &settings, &mut surface);
        renderer.handle(PointerEvent::moved(50.0, 50.0), &settings, &mut surface);
        match renderer.state() {
            DragState::Dragging { anchor, current, tool, .. } => {
                assert_eq!(*anchor, Point::new(10.0, 10.0));
                assert_eq!(*current, Point::new(50.0, 50.0));
                assert_eq!(*tool, ToolKind::Rectangle);
            }
            DragState::Idle => panic!("expected a drag in progress"),
        }
        assert_eq!(renderer.handle(PointerEvent::Leave, &settings, &mut surface), PreviewOutcome::Committed);
        assert!(matches!(renderer.state(), DragState::Idle));

        let mut reference = RasterSurface::new(100, 100).unwrap();
        reference.stroke(
            &rectangle_path(Point::new(10.0, 10.0), Point::new(50.0, 50.0)),
            &settings.style,
            Compositing::SourceOver,
        );
        assert_eq!(surface.data(), reference.data());
    }

    #[test]
    fn test_locked_surface_ignores_input() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();
        let mut settings = settings(ToolKind::Pen);
        settings.locked = true;

        assert_eq!(
            renderer.handle(PointerEvent::down(10.0, 10.0), &settings, &mut surface),
            PreviewOutcome::Ignored
        );
        renderer.handle(PointerEvent::moved(50.0, 50.0), &settings, &mut surface);
        renderer.handle(PointerEvent::up(50.0, 50.0), &settings, &mut surface);

        assert!(!renderer.is_dragging());
        assert!(surface.is_blank());
    }

    #[test]
    fn test_lock_during_drag_freezes_surface() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();
        let mut settings = settings(ToolKind::Line);

        renderer.handle(PointerEvent::down(10.0, 10.0), &settings, &mut surface);
        renderer.handle(PointerEvent::moved(50.0, 50.0), &settings, &mut surface);
        let frame = surface.data().to_vec();

        settings.locked = true;
        renderer.handle(PointerEvent::moved(90.0, 10.0), &settings, &mut surface);
        assert_eq!(surface.data(), frame.as_slice());
        assert_eq!(renderer.handle(PointerEvent::up(90.0, 10.0), &settings, &mut surface), PreviewOutcome::Committed);
    }

    #[test]
    fn test_text_tool_places_text() {
        let mut surface = RasterSurface::new(100, 100).unwrap();
        let mut renderer = PreviewRenderer::new();

        let outcome = renderer.handle(PointerEvent::down(25.0, 35.0), &settings(ToolKind::Text), &mut surface);
        assert_eq!(outcome, PreviewOutcome::PlaceText(Point::new(25.0, 35.0)));
        assert!(!renderer.is_dragging());
        assert!(surface.is_blank());
    }

    #[test]
    fn test_click_without_move_draws_nothing() {
        let mut surface = RasterSurface::new(50, 50).unwrap();
        let mut renderer = PreviewRenderer::new();
        let settings = settings(ToolKind::Rectangle);

        renderer.handle(PointerEvent::down(10.0, 10.0), &settings, &mut surface);
        renderer.handle(PointerEvent::up(10.0, 10.0), &settings, &mut surface);
        assert!(surface.is_blank());
    }
}
