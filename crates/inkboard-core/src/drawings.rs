//! Saved drawings: raster snapshots persisted as one JSON collection.
//!
//! The store keeps the collection in memory and mirrors it to a
//! [`Storage`] backend under [`DRAWINGS_KEY`] after every change. When a
//! write fails the in-memory copy stays authoritative for the rest of the
//! session and is not re-read from storage.

use crate::storage::{DRAWINGS_KEY, Storage, StorageError};
use crate::surface::{RasterSurface, SurfaceError};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Drawing identifier: a creation timestamp in milliseconds, kept unique.
pub type DrawingId = u64;

/// Title given to every new drawing.
pub const DEFAULT_TITLE: &str = "My Drawing";

/// A persisted raster capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: DrawingId,
    pub title: String,
    /// PNG data URL of the surface at save time.
    pub data: String,
}

/// The drawing the next save will overwrite, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditingContext(Option<DrawingId>);

impl EditingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<DrawingId> {
        self.0
    }

    pub fn is_editing(&self) -> bool {
        self.0.is_some()
    }

    pub fn set(&mut self, id: DrawingId) {
        self.0 = Some(id);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Drawing store errors.
#[derive(Debug, Error)]
pub enum DrawingError {
    #[error("Drawing not found: {0}")]
    NotFound(DrawingId),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("No drawing ids left above {0}")]
    IdsExhausted(DrawingId),
}

/// Result type for drawing store operations.
pub type DrawingResult<T> = Result<T, DrawingError>;

/// Whether a save created or overwrote a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Created,
    Updated,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub id: DrawingId,
    pub kind: SaveKind,
    /// False when the storage write failed and only memory holds the change.
    pub persisted: bool,
}

/// Action attached to a listed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "lowercase")]
pub enum DrawingAction {
    Edit(DrawingId),
    Delete(DrawingId),
}

/// One renderable row of the drawing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingEntry<'a> {
    pub id: DrawingId,
    pub title: &'a str,
    /// Thumbnail source.
    pub data: &'a str,
}

impl DrawingEntry<'_> {
    pub fn edit(&self) -> DrawingAction {
        DrawingAction::Edit(self.id)
    }

    pub fn delete(&self) -> DrawingAction {
        DrawingAction::Delete(self.id)
    }
}

impl<'a> From<&'a Drawing> for DrawingEntry<'a> {
    fn from(drawing: &'a Drawing) -> Self {
        Self {
            id: drawing.id,
            title: &drawing.title,
            data: &drawing.data,
        }
    }
}

/// Generates strictly increasing millisecond timestamps.
#[derive(Debug, Clone, Default)]
struct IdGenerator {
    last: DrawingId,
}

impl IdGenerator {
    /// Next id, or `None` once `last` is the largest representable id.
    fn next(&mut self) -> Option<DrawingId> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as DrawingId)
            .unwrap_or(0);
        // Two saves within the same millisecond must not share an id
        let id = now.max(self.last.checked_add(1)?);
        self.last = id;
        Some(id)
    }

    /// Never hand out an id at or below one already in use.
    fn observe(&mut self, id: DrawingId) {
        self.last = self.last.max(id);
    }
}

/// Ordered collection of saved drawings backed by key-value storage.
pub struct DrawingStore<S: Storage> {
    storage: S,
    drawings: Vec<Drawing>,
    ids: IdGenerator,
    /// False once a write failed; memory then wins over storage.
    in_sync: bool,
}

impl<S: Storage> DrawingStore<S> {
    /// Open the store, reading any collection already persisted.
    pub fn new(storage: S) -> Self {
        let mut store = Self {
            storage,
            drawings: Vec::new(),
            ids: IdGenerator::default(),
            in_sync: true,
        };
        store.reload();
        store
    }

    /// Drawings in insertion order.
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    pub fn get(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.iter().find(|d| d.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the last write reached storage.
    pub fn is_in_sync(&self) -> bool {
        self.in_sync
    }

    /// Save the surface.
    ///
    /// Overwrites the drawing being edited, or appends a new one when
    /// nothing is being edited. The editing context is cleared either way.
    pub fn save(
        &mut self,
        surface: &RasterSurface,
        editing: &mut EditingContext,
    ) -> DrawingResult<SaveReport> {
        let data = surface.to_data_url()?;

        let (id, kind) = match editing.current() {
            Some(id) => {
                editing.clear();
                let Some(drawing) = self.drawings.iter_mut().find(|d| d.id == id) else {
                    log::error!("No drawing found to update with ID: {}", id);
                    return Err(DrawingError::NotFound(id));
                };
                drawing.data = data;
                log::info!("Updated drawing with ID: {}", id);
                (id, SaveKind::Updated)
            }
            None => {
                let Some(id) = self.ids.next() else {
                    log::error!("Cannot create a drawing: ids exhausted above {}", self.ids.last);
                    return Err(DrawingError::IdsExhausted(self.ids.last));
                };
                self.drawings.push(Drawing {
                    id,
                    title: DEFAULT_TITLE.to_string(),
                    data,
                });
                log::info!("New drawing saved with ID: {}", id);
                (id, SaveKind::Created)
            }
        };

        let persisted = self.persist();
        Ok(SaveReport { id, kind, persisted })
    }

    /// Renderable entries for every saved drawing.
    ///
    /// Re-reads storage first unless a failed write made memory
    /// authoritative; an empty or unreadable store keeps the memory copy.
    pub fn list(&mut self) -> impl Iterator<Item = DrawingEntry<'_>> + '_ {
        if self.in_sync {
            self.reload();
        }
        self.drawings.iter().map(DrawingEntry::from)
    }

    /// Put a saved drawing on the surface and mark it as being edited.
    ///
    /// A missing id or undecodable data leaves surface and context alone.
    pub fn load_for_edit(
        &self,
        id: DrawingId,
        surface: &mut RasterSurface,
        editing: &mut EditingContext,
    ) -> DrawingResult<()> {
        let Some(drawing) = self.get(id) else {
            log::error!("Drawing not found for ID: {}", id);
            return Err(DrawingError::NotFound(id));
        };

        surface.load_data_url(&drawing.data)?;
        editing.set(id);
        log::info!("Loaded drawing with ID: {}", id);
        Ok(())
    }

    /// Remove a drawing. Returns false when no drawing had that id.
    pub fn delete(&mut self, id: DrawingId) -> bool {
        let Some(index) = self.drawings.iter().position(|d| d.id == id) else {
            log::debug!("Delete ignored, no drawing with ID: {}", id);
            return false;
        };
        self.drawings.remove(index);
        log::info!("Deleted drawing with ID: {}", id);
        self.persist();
        true
    }

    /// Start over on a blank surface. Storage is not touched.
    pub fn new_drawing(&self, surface: &mut RasterSurface, editing: &mut EditingContext) {
        surface.clear();
        editing.clear();
        log::info!("Canvas cleared for a new drawing");
    }

    /// Write the whole collection. Failures are logged, never retried.
    fn persist(&mut self) -> bool {
        let result = serde_json::to_string(&self.drawings)
            .map_err(|e| StorageError::Serialization(e.to_string()))
            .and_then(|json| self.storage.set(DRAWINGS_KEY, &json));

        match result {
            Ok(()) => {
                self.in_sync = true;
                true
            }
            Err(e) => {
                log::error!("Failed to save drawings: {}", e);
                self.in_sync = false;
                false
            }
        }
    }

    /// Replace the memory copy with the persisted collection, if readable.
    fn reload(&mut self) {
        let json = match self.storage.get(DRAWINGS_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Could not read drawings, keeping memory copy: {}", e);
                return;
            }
        };

        match serde_json::from_str::<Vec<Drawing>>(&json) {
            Ok(drawings) => {
                for drawing in &drawings {
                    self.ids.observe(drawing.id);
                }
                self.drawings = drawings;
            }
            Err(e) => log::warn!("Stored drawings are corrupt, keeping memory copy: {}", e),
        }
    }
}
