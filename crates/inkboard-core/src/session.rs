//! One whiteboard session: every piece of interactive state in one place.
//!
//! [`Whiteboard`] wires pointer input through the camera into the preview
//! renderer, saves and loads the raster surface through the drawing store,
//! and owns the overlay layer, theme, and toolbar settings. Failures from the
//! lower layers are logged here and reported as "nothing happened".

use crate::camera::Camera;
use crate::color::Rgba;
use crate::config::WhiteboardConfig;
use crate::confirm::{CLEAR_CANVAS_PROMPT, Confirm, DELETE_DRAWING_PROMPT};
use crate::drawings::{DrawingAction, DrawingEntry, DrawingId, DrawingStore, EditingContext, SaveReport};
use crate::export::PageExport;
use crate::input::PointerEvent;
use crate::layout::FixedAdvance;
use crate::overlay::{OverlayId, OverlayLayer};
use crate::preview::{PreviewOutcome, PreviewRenderer};
use crate::storage::Storage;
use crate::surface::{RasterSurface, SurfaceResult};
use crate::theme::Theme;
use crate::tools::{ToolKind, ToolSettings};
use kurbo::{Point, Rect, Size, Vec2};
use std::path::{Path, PathBuf};

pub struct Whiteboard<S: Storage> {
    config: WhiteboardConfig,
    settings: ToolSettings,
    surface: RasterSurface,
    renderer: PreviewRenderer,
    store: DrawingStore<S>,
    editing: EditingContext,
    overlays: OverlayLayer,
    camera: Camera,
    theme: Theme,
    measure: FixedAdvance,
}

impl<S: Storage> Whiteboard<S> {
    /// Start a session on a blank surface, restoring saved drawings and theme.
    pub fn new(config: WhiteboardConfig, storage: S) -> SurfaceResult<Self> {
        let surface = RasterSurface::new(config.width, config.height)?;
        let theme = Theme::load(&storage);
        let store = DrawingStore::new(storage);
        let settings = ToolSettings {
            style: config.stroke,
            ..ToolSettings::default()
        };
        log::info!(
            "Whiteboard session started: {}x{}, {} saved drawings, {} theme",
            config.width,
            config.height,
            store.len(),
            theme.as_str()
        );

        Ok(Self {
            renderer: PreviewRenderer::with_arrow_head(config.arrow_head_length),
            config,
            settings,
            surface,
            store,
            editing: EditingContext::new(),
            overlays: OverlayLayer::new(),
            camera: Camera::new(),
            theme,
            measure: FixedAdvance::default(),
        })
    }

    pub fn config(&self) -> &WhiteboardConfig {
        &self.config
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn overlays(&self) -> &OverlayLayer {
        &self.overlays
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Id of the drawing the next save overwrites.
    pub fn editing(&self) -> Option<DrawingId> {
        self.editing.current()
    }

    pub fn store(&self) -> &DrawingStore<S> {
        &self.store
    }

    // --- Toolbar ---

    /// The lock disables every toolbar control except the lock itself.
    fn toolbar_locked(&self, action: &str) -> bool {
        if self.settings.locked {
            log::debug!("Canvas locked, ignoring {}", action);
        }
        self.settings.locked
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.toolbar_locked("tool change") {
            return;
        }
        self.settings.set_tool(tool);
        log::debug!("Tool: {}", tool.name());
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        if self.toolbar_locked("stroke width change") {
            return;
        }
        if !self.settings.set_stroke_width(width) {
            log::warn!("Ignoring invalid stroke width {}", width);
        }
    }

    pub fn set_stroke_color(&mut self, color: Rgba) {
        if self.toolbar_locked("stroke color change") {
            return;
        }
        self.settings.set_stroke_color(color);
    }

    /// Flip the drawing lock and return the new state.
    pub fn toggle_lock(&mut self) -> bool {
        let locked = self.settings.toggle_lock();
        log::info!("Canvas {}", if locked { "locked" } else { "unlocked" });
        locked
    }

    /// Switch theme and remember the choice.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        if let Err(e) = self.theme.save(self.store.storage()) {
            log::error!("Failed to save theme preference: {}", e);
        }
        self.theme
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    /// Scroll the view by a screen-space offset.
    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
    }

    // --- Pointer input ---

    /// Feed a pointer event in screen coordinates.
    ///
    /// While an overlay is being dragged the event moves it. Otherwise the
    /// event goes to the preview renderer; a text-tool press creates a text
    /// box where it landed.
    pub fn pointer(&mut self, event: PointerEvent) -> PreviewOutcome {
        let event = event.map_position(|p| self.camera.screen_to_world(p));

        if self.overlays.is_dragging() {
            match event {
                PointerEvent::Move { position } => {
                    self.overlays.drag_to(position);
                }
                PointerEvent::Up { .. } | PointerEvent::Leave => self.overlays.end_drag(),
                PointerEvent::Down { .. } => {}
            }
            return PreviewOutcome::Ignored;
        }

        let outcome = self.renderer.handle(event, &self.settings, &mut self.surface);
        if let PreviewOutcome::PlaceText(position) = outcome {
            self.overlays.add_text_box(position, self.settings.style.color);
        }
        outcome
    }

    // --- Drawings ---

    /// Save the surface as a new drawing or over the one being edited.
    pub fn save(&mut self) -> Option<SaveReport> {
        match self.store.save(&self.surface, &mut self.editing) {
            Ok(report) => Some(report),
            Err(e) => {
                log::error!("Save failed: {}", e);
                None
            }
        }
    }

    /// Blank the surface and stop editing.
    pub fn new_drawing(&mut self) {
        self.renderer.reset();
        self.store.new_drawing(&mut self.surface, &mut self.editing);
    }

    /// Load a saved drawing onto the surface for editing.
    pub fn edit_drawing(&mut self, id: DrawingId) -> bool {
        self.renderer.reset();
        match self.store.load_for_edit(id, &mut self.surface, &mut self.editing) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Could not edit drawing {}: {}", id, e);
                false
            }
        }
    }

    /// Delete a saved drawing after confirmation.
    ///
    /// Deleting the drawing being edited also stops editing it, so the next
    /// save creates a new drawing.
    pub fn delete_drawing(&mut self, id: DrawingId, confirm: &mut impl Confirm) -> bool {
        if self.store.get(id).is_none() {
            log::debug!("Delete ignored, no drawing with ID: {}", id);
            return false;
        }
        if !confirm.confirm(DELETE_DRAWING_PROMPT) {
            return false;
        }
        if self.editing.current() == Some(id) {
            self.editing.clear();
        }
        self.store.delete(id)
    }

    /// Run the edit or delete button of a listed drawing.
    pub fn drawing_action(&mut self, action: DrawingAction, confirm: &mut impl Confirm) -> bool {
        match action {
            DrawingAction::Edit(id) => self.edit_drawing(id),
            DrawingAction::Delete(id) => self.delete_drawing(id, confirm),
        }
    }

    /// The saved drawings list.
    pub fn drawings(&mut self) -> impl Iterator<Item = DrawingEntry<'_>> + '_ {
        self.store.list()
    }

    /// Wipe the surface and every overlay after confirmation.
    pub fn clear_canvas(&mut self, confirm: &mut impl Confirm) -> bool {
        if self.toolbar_locked("clear canvas") {
            return false;
        }
        if !confirm.confirm(CLEAR_CANVAS_PROMPT) {
            return false;
        }
        self.renderer.reset();
        self.surface.clear();
        self.overlays.clear();
        log::info!("Canvas cleared");
        true
    }

    // --- Overlays ---

    pub fn add_sticky_note(&mut self) -> Option<OverlayId> {
        if self.toolbar_locked("new sticky note") {
            return None;
        }
        Some(self.overlays.add_sticky_note(self.settings.style.color))
    }

    /// Add a text box at the default position.
    pub fn add_text_box(&mut self) -> Option<OverlayId> {
        if self.toolbar_locked("new text box") {
            return None;
        }
        Some(
            self.overlays
                .add_text_box(crate::overlay::DEFAULT_POSITION, self.settings.style.color),
        )
    }

    /// Type into an overlay; the text takes the current stroke color.
    pub fn set_overlay_text(&mut self, id: OverlayId, text: &str) -> bool {
        self.overlays.set_text(id, text, self.settings.style.color)
    }

    pub fn finish_overlay_editing(&mut self, id: OverlayId) -> bool {
        self.overlays.finish_editing(id)
    }

    pub fn begin_overlay_editing(&mut self, id: OverlayId) -> bool {
        self.overlays.begin_editing(id)
    }

    /// Grab an overlay at a screen point. Following pointer events move it.
    ///
    /// A shape drag in progress is committed first, since the release that
    /// would end it now goes to the overlay.
    pub fn grab_overlay(&mut self, id: OverlayId, screen_point: Point) -> bool {
        let world = self.camera.screen_to_world(screen_point);
        if !self.overlays.begin_drag(id, world) {
            return false;
        }
        if self.renderer.is_dragging() {
            self.renderer.handle(PointerEvent::Leave, &self.settings, &mut self.surface);
        }
        true
    }

    pub fn resize_overlay(&mut self, id: OverlayId, size: Size) -> bool {
        self.overlays.resize(id, size)
    }

    pub fn delete_overlay(&mut self, id: OverlayId, confirm: &mut impl Confirm) -> bool {
        self.overlays.remove(id, confirm)
    }

    /// Where an overlay currently sits on screen.
    pub fn overlay_screen_rect(&self, id: OverlayId) -> Option<Rect> {
        self.overlays.get(id).map(|w| w.screen_rect(&self.camera))
    }

    // --- Page ---

    fn page(&self) -> PageExport<'_, FixedAdvance> {
        PageExport {
            surface: &self.surface,
            overlays: &self.overlays,
            camera: &self.camera,
            theme: self.theme,
            title: &self.config.page_title,
            stylesheets: &self.config.stylesheets,
            measure: &self.measure,
        }
    }

    /// Render the whole page as HTML.
    pub fn render_html(&self) -> Option<String> {
        match self.page().render_page() {
            Ok(html) => Some(html),
            Err(e) => {
                log::error!("Export failed: {}", e);
                None
            }
        }
    }

    /// Write the page to `dir`, returning the file written.
    pub fn export_html(&self, dir: &Path) -> Option<PathBuf> {
        match self.page().export_to_dir(dir) {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("Export failed: {}", e);
                None
            }
        }
    }

    /// Where logging out redirects to.
    pub fn logout(&self) -> &str {
        log::info!("Logging out");
        &self.config.logout_url
    }
}
