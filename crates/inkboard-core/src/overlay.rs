//! Sticky notes and text boxes floating above the raster surface.
//!
//! Overlays never draw into the surface, so the eraser cannot touch them.
//! They are only flattened into a page on export.

use crate::camera::Camera;
use crate::color::Rgba;
use crate::confirm::{Confirm, DELETE_STICKY_NOTE_PROMPT, DELETE_TEXT_BOX_PROMPT};
use crate::layout::{FONT_SIZE, TextLine, TextMeasure, wrap_text};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overlay widget identifier.
pub type OverlayId = Uuid;

/// Where new overlays appear.
pub const DEFAULT_POSITION: Point = Point::new(100.0, 100.0);

/// Initial sticky note size.
pub const STICKY_NOTE_SIZE: Size = Size::new(150.0, 150.0);

/// Initial text box size.
pub const TEXT_BOX_SIZE: Size = Size::new(200.0, 100.0);

/// Inner padding of a text box.
pub const TEXT_BOX_PADDING: f64 = 5.0;

/// Width of the resize strip on a text box's right edge. Drags starting there
/// resize instead of move.
pub const RESIZE_HANDLE_WIDTH: f64 = 20.0;

/// Kind of overlay widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    StickyNote,
    TextBox,
}

impl OverlayKind {
    /// CSS class used for the widget in exported pages.
    pub fn css_class(self) -> &'static str {
        match self {
            OverlayKind::StickyNote => "sticky-note",
            OverlayKind::TextBox => "text-tool",
        }
    }

    fn delete_prompt(self) -> &'static str {
        match self {
            OverlayKind::StickyNote => DELETE_STICKY_NOTE_PROMPT,
            OverlayKind::TextBox => DELETE_TEXT_BOX_PROMPT,
        }
    }
}

/// A positioned, editable note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayWidget {
    pub id: OverlayId,
    pub kind: OverlayKind,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub size: Size,
    pub text: String,
    /// Text color, follows the stroke color while editing.
    pub color: Rgba,
    /// Whether the text is currently editable.
    pub editing: bool,
}

impl OverlayWidget {
    fn new(kind: OverlayKind, position: Point, size: Size, color: Rgba) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            size,
            text: String::new(),
            color,
            editing: true,
        }
    }

    /// Bounds in world coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Bounds on screen under `camera`.
    pub fn screen_rect(&self, camera: &Camera) -> Rect {
        camera.world_rect_to_screen(self.rect())
    }

    /// Whether `point` (world coordinates) lies in the text box resize strip.
    pub fn in_resize_handle(&self, point: Point) -> bool {
        self.kind == OverlayKind::TextBox && point.x - self.position.x > self.size.width - RESIZE_HANDLE_WIDTH
    }

    /// Text wrapped to the widget's inner width, in world coordinates.
    pub fn wrapped_lines(&self, measure: &impl TextMeasure) -> Vec<TextLine> {
        let origin = Point::new(
            self.position.x + TEXT_BOX_PADDING,
            self.position.y + TEXT_BOX_PADDING + FONT_SIZE,
        );
        let inner_width = (self.size.width - 2.0 * TEXT_BOX_PADDING).max(0.0);
        wrap_text(&self.text, origin, inner_width, measure)
    }
}

/// Widget being dragged and where it was grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OverlayDrag {
    id: OverlayId,
    grab_offset: Vec2,
}

/// All overlay widgets, in creation order.
#[derive(Debug, Clone, Default)]
pub struct OverlayLayer {
    widgets: Vec<OverlayWidget>,
    drag: Option<OverlayDrag>,
}

impl OverlayLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widgets(&self) -> &[OverlayWidget] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayWidget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    fn get_mut(&mut self, id: OverlayId) -> Option<&mut OverlayWidget> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    pub fn of_kind(&self, kind: OverlayKind) -> impl Iterator<Item = &OverlayWidget> {
        self.widgets.iter().filter(move |w| w.kind == kind)
    }

    /// Add an empty sticky note at the default position.
    pub fn add_sticky_note(&mut self, color: Rgba) -> OverlayId {
        let note = OverlayWidget::new(OverlayKind::StickyNote, DEFAULT_POSITION, STICKY_NOTE_SIZE, color);
        let id = note.id;
        self.widgets.push(note);
        log::debug!("Added sticky note {}", id);
        id
    }

    /// Add an empty text box with its corner at `position`.
    pub fn add_text_box(&mut self, position: Point, color: Rgba) -> OverlayId {
        let text_box = OverlayWidget::new(OverlayKind::TextBox, position, TEXT_BOX_SIZE, color);
        let id = text_box.id;
        self.widgets.push(text_box);
        log::debug!("Added text box {} at ({}, {})", id, position.x, position.y);
        id
    }

    /// Replace a widget's text, recoloring it with the current stroke color.
    pub fn set_text(&mut self, id: OverlayId, text: &str, color: Rgba) -> bool {
        let Some(widget) = self.get_mut(id) else {
            return false;
        };
        if !widget.editing {
            return false;
        }
        widget.text = text.to_string();
        widget.color = color;
        true
    }

    /// Make a widget's text editable again.
    pub fn begin_editing(&mut self, id: OverlayId) -> bool {
        self.get_mut(id).map(|w| w.editing = true).is_some()
    }

    /// Stop editing a widget's text.
    pub fn finish_editing(&mut self, id: OverlayId) -> bool {
        self.get_mut(id).map(|w| w.editing = false).is_some()
    }

    /// Resize a widget. Sizes below one unit are clamped.
    pub fn resize(&mut self, id: OverlayId, size: Size) -> bool {
        self.get_mut(id)
            .map(|w| w.size = Size::new(size.width.max(1.0), size.height.max(1.0)))
            .is_some()
    }

    /// Start moving a widget grabbed at `pointer` (world coordinates).
    pub fn begin_drag(&mut self, id: OverlayId, pointer: Point) -> bool {
        let Some(widget) = self.get(id) else {
            return false;
        };
        if widget.in_resize_handle(pointer) {
            return false;
        }
        let grab_offset = pointer - widget.position;
        self.drag = Some(OverlayDrag { id, grab_offset });
        true
    }

    /// Move the dragged widget so the grab point follows `pointer`.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        match self.get_mut(drag.id) {
            Some(widget) => {
                widget.position = pointer - drag.grab_offset;
                true
            }
            None => {
                self.drag = None;
                false
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Delete a widget after confirmation. Declining changes nothing.
    pub fn remove(&mut self, id: OverlayId, confirm: &mut impl Confirm) -> bool {
        let Some(index) = self.widgets.iter().position(|w| w.id == id) else {
            return false;
        };
        if !confirm.confirm(self.widgets[index].kind.delete_prompt()) {
            return false;
        }
        self.widgets.remove(index);
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        true
    }

    /// Remove every widget.
    pub fn clear(&mut self) {
        self.widgets.clear();
        self.drag = None;
    }
}
