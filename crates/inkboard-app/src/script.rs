//! Scripted toolbar and pointer input.
//!
//! A script is a JSON array of [`Command`]s, each standing in for one click,
//! keystroke, or pointer event on the whiteboard page.

use inkboard_core::drawings::DrawingId;
use inkboard_core::overlay::OverlayId;
use inkboard_core::{PointerEvent, Rgba, Storage, ToolKind, Whiteboard};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn yes() -> bool {
    true
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    SetTool {
        tool: ToolKind,
    },
    SetStrokeWidth {
        width: f64,
    },
    SetStrokeColor {
        color: Rgba,
    },
    ToggleLock,
    ToggleTheme,
    /// A raw pointer event in screen coordinates.
    Pointer {
        event: PointerEvent,
    },
    /// Press at `from`, move through `through`, release at `to`.
    Drag {
        from: Point,
        #[serde(default)]
        through: Vec<Point>,
        to: Point,
    },
    Save,
    NewDrawing,
    /// Load a drawing for editing; without an id, the last one saved.
    EditDrawing {
        #[serde(default)]
        id: Option<DrawingId>,
    },
    DeleteDrawing {
        #[serde(default)]
        id: Option<DrawingId>,
        #[serde(default = "yes")]
        confirm: bool,
    },
    /// Print the saved drawings.
    ListDrawings,
    ClearCanvas {
        #[serde(default = "yes")]
        confirm: bool,
    },
    /// Add a sticky note and type `text` into it.
    AddStickyNote {
        #[serde(default)]
        text: String,
    },
    /// Add a text box at the default position and type `text` into it.
    AddTextBox {
        #[serde(default)]
        text: String,
    },
    /// Type into the newest overlay.
    TypeText {
        text: String,
    },
    /// Stop editing the newest overlay.
    FinishEditing,
    /// Delete the newest overlay.
    DeleteOverlay {
        #[serde(default = "yes")]
        confirm: bool,
    },
    ZoomIn,
    ZoomOut,
    /// Scroll the view by a screen-space offset.
    Pan {
        dx: f64,
        dy: f64,
    },
    /// Write the page to `dir`, or to the configured export directory.
    Export {
        #[serde(default)]
        dir: Option<PathBuf>,
    },
    Logout,
}

/// Parse a script.
pub fn parse_script(json: &str) -> serde_json::Result<Vec<Command>> {
    serde_json::from_str(json)
}

/// What running a script produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    /// Commands applied.
    pub applied: usize,
    /// Ids returned by successful saves, in order.
    pub saved: Vec<DrawingId>,
    /// Pages written by export commands.
    pub exported: Vec<PathBuf>,
    /// Redirect target, once a logout ran.
    pub redirect: Option<String>,
}

/// Applies commands to a whiteboard, remembering saved ids so later
/// commands can refer to them implicitly.
pub struct ScriptRunner {
    export_dir: PathBuf,
    report: RunReport,
}

impl ScriptRunner {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            export_dir,
            report: RunReport::default(),
        }
    }

    /// Apply every command in order. A command that fails is logged and the
    /// script continues.
    pub fn run<S: Storage>(mut self, board: &mut Whiteboard<S>, commands: &[Command]) -> RunReport {
        for command in commands {
            self.apply(board, command);
            self.report.applied += 1;
        }
        self.report
    }

    fn last_saved(&self) -> Option<DrawingId> {
        self.report.saved.last().copied()
    }

    pub fn apply<S: Storage>(&mut self, board: &mut Whiteboard<S>, command: &Command) {
        log::debug!("Applying {:?}", command);
        match command {
            Command::SetTool { tool } => board.set_tool(*tool),
            Command::SetStrokeWidth { width } => board.set_stroke_width(*width),
            Command::SetStrokeColor { color } => board.set_stroke_color(*color),
            Command::ToggleLock => {
                board.toggle_lock();
            }
            Command::ToggleTheme => {
                board.toggle_theme();
            }
            Command::Pointer { event } => {
                board.pointer(*event);
            }
            Command::Drag { from, through, to } => {
                board.pointer(PointerEvent::Down { position: *from });
                for point in through {
                    board.pointer(PointerEvent::Move { position: *point });
                }
                board.pointer(PointerEvent::Move { position: *to });
                board.pointer(PointerEvent::Up { position: *to });
            }
            Command::Save => {
                if let Some(report) = board.save() {
                    self.report.saved.push(report.id);
                }
            }
            Command::NewDrawing => board.new_drawing(),
            Command::EditDrawing { id } => match (*id).or_else(|| self.last_saved()) {
                Some(id) => {
                    board.edit_drawing(id);
                }
                None => log::warn!("Nothing saved yet to edit"),
            },
            Command::DeleteDrawing { id, confirm } => match (*id).or_else(|| self.last_saved()) {
                Some(id) => {
                    let answer = *confirm;
                    board.delete_drawing(id, &mut |_: &str| answer);
                }
                None => log::warn!("Nothing saved yet to delete"),
            },
            Command::ListDrawings => {
                for entry in board.drawings() {
                    println!("{}\t{}\t{} bytes", entry.id, entry.title, entry.data.len());
                }
            }
            Command::ClearCanvas { confirm } => {
                let answer = *confirm;
                board.clear_canvas(&mut |_: &str| answer);
            }
            Command::AddStickyNote { text } => {
                if let Some(id) = board.add_sticky_note() {
                    board.set_overlay_text(id, text);
                }
            }
            Command::AddTextBox { text } => {
                if let Some(id) = board.add_text_box() {
                    board.set_overlay_text(id, text);
                }
            }
            Command::TypeText { text } => {
                if let Some(id) = self.current_overlay(board) {
                    board.set_overlay_text(id, text);
                }
            }
            Command::FinishEditing => {
                if let Some(id) = self.current_overlay(board) {
                    board.finish_overlay_editing(id);
                }
            }
            Command::DeleteOverlay { confirm } => {
                if let Some(id) = self.current_overlay(board) {
                    let answer = *confirm;
                    board.delete_overlay(id, &mut |_: &str| answer);
                }
            }
            Command::ZoomIn => board.zoom_in(),
            Command::ZoomOut => board.zoom_out(),
            Command::Pan { dx, dy } => board.pan(Vec2::new(*dx, *dy)),
            Command::Export { dir } => {
                let dir = dir.as_ref().unwrap_or(&self.export_dir);
                if let Some(path) = board.export_html(dir) {
                    self.report.exported.push(path);
                }
            }
            Command::Logout => {
                self.report.redirect = Some(board.logout().to_string());
            }
        }
    }

    /// The newest overlay on the board, whether added by a command or placed
    /// with the text tool.
    fn current_overlay<S: Storage>(&self, board: &Whiteboard<S>) -> Option<OverlayId> {
        let id = board.overlays().widgets().last().map(|w| w.id);
        if id.is_none() {
            log::warn!("No overlay to act on");
        }
        id
    }
}
