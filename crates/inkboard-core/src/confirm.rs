//! Confirmation prompts for destructive operations.

/// Prompt shown before clearing the canvas.
pub const CLEAR_CANVAS_PROMPT: &str = "Are you sure you want to clear the canvas?";

/// Prompt shown before deleting a sticky note.
pub const DELETE_STICKY_NOTE_PROMPT: &str = "Do you want to delete this sticky note?";

/// Prompt shown before deleting a text box.
pub const DELETE_TEXT_BOX_PROMPT: &str = "Do you want to delete this text box?";

/// Prompt shown before deleting a saved drawing.
pub const DELETE_DRAWING_PROMPT: &str = "Do you want to delete this drawing?";

/// Asks the user to approve a destructive operation.
///
/// Returning false must make the operation a complete no-op.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        false
    }
}
