//! InkBoard Core Library
//!
//! Platform-agnostic core of the InkBoard whiteboard: a raster drawing
//! surface with live shape previews, saved drawings in key-value storage,
//! and floating sticky notes and text boxes.

pub mod camera;
pub mod color;
pub mod config;
pub mod confirm;
pub mod drawings;
pub mod export;
pub mod input;
pub mod layout;
pub mod overlay;
pub mod preview;
pub mod session;
pub mod shapes;
pub mod storage;
pub mod surface;
pub mod theme;
pub mod tools;

pub use camera::Camera;
pub use color::Rgba;
pub use config::{ConfigError, WhiteboardConfig};
pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use drawings::{Drawing, DrawingError, DrawingId, DrawingStore, EditingContext, SaveKind, SaveReport};
pub use export::{EXPORT_FILENAME, ExportError, PageExport};
pub use input::PointerEvent;
pub use overlay::{OverlayId, OverlayKind, OverlayLayer, OverlayWidget};
pub use preview::{DragState, PreviewOutcome, PreviewRenderer};
pub use session::Whiteboard;
pub use shapes::ShapeKind;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use surface::{RasterSurface, SurfaceError};
pub use theme::Theme;
pub use tools::{Compositing, StrokeStyle, ToolKind, ToolSettings};
