//! Tool selection and stroke style for the whiteboard.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};

/// Default stroke width.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Available drawing tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Ellipse,
    Arrow,
    Text,
}

impl ToolKind {
    /// All tools, in toolbar order.
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Pen,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Ellipse,
        ToolKind::Arrow,
        ToolKind::Text,
    ];

    /// Whether the tool accumulates a live path instead of previewing a shape.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Eraser)
    }

    /// Whether the tool previews a two-point shape.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            ToolKind::Line | ToolKind::Rectangle | ToolKind::Circle | ToolKind::Ellipse | ToolKind::Arrow
        )
    }

    /// Compositing mode the tool paints with.
    pub fn compositing(self) -> Compositing {
        match self {
            ToolKind::Eraser => Compositing::DestinationOut,
            _ => Compositing::SourceOver,
        }
    }

    /// Toolbar identifier.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Eraser => "eraser",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Arrow => "arrow",
            ToolKind::Text => "text",
        }
    }
}

/// How new strokes combine with existing surface content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compositing {
    /// Paint over existing pixels.
    #[default]
    SourceOver,
    /// Remove existing pixels where the stroke covers them.
    DestinationOut,
}

impl Compositing {
    pub(crate) fn blend_mode(self) -> tiny_skia::BlendMode {
        match self {
            Compositing::SourceOver => tiny_skia::BlendMode::SourceOver,
            Compositing::DestinationOut => tiny_skia::BlendMode::DestinationOut,
        }
    }
}

/// Stroke properties read at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke width in surface units.
    pub width: f64,
    /// Stroke color.
    pub color: Rgba,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_STROKE_WIDTH,
            color: Rgba::BLACK,
        }
    }
}

/// Current toolbar state: the selected tool, its style, and the lock toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub style: StrokeStyle,
    /// When locked, pointer input must not modify the surface.
    pub locked: bool,
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    /// Set the stroke width. Non-positive or non-finite widths are ignored.
    pub fn set_stroke_width(&mut self, width: f64) -> bool {
        if width.is_finite() && width > 0.0 {
            self.style.width = width;
            true
        } else {
            false
        }
    }

    pub fn set_stroke_color(&mut self, color: Rgba) {
        self.style.color = color;
    }

    /// Flip the lock and return the new state.
    pub fn toggle_lock(&mut self) -> bool {
        self.locked = !self.locked;
        self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ToolSettings::new();
        assert_eq!(settings.tool, ToolKind::Pen);
        assert_eq!(settings.style.width, DEFAULT_STROKE_WIDTH);
        assert_eq!(settings.style.color, Rgba::BLACK);
        assert!(!settings.locked);
    }

    #[test]
    fn test_eraser_compositing() {
        assert_eq!(ToolKind::Eraser.compositing(), Compositing::DestinationOut);
        for tool in ToolKind::ALL.iter().filter(|t| **t != ToolKind::Eraser) {
            assert_eq!(tool.compositing(), Compositing::SourceOver);
        }
    }

    #[test]
    fn test_tool_categories_are_disjoint() {
        for tool in ToolKind::ALL {
            assert!(!(tool.is_freehand() && tool.is_shape()), "{:?}", tool);
        }
        assert!(!ToolKind::Text.is_freehand());
        assert!(!ToolKind::Text.is_shape());
    }

    #[test]
    fn test_stroke_width_validation() {
        let mut settings = ToolSettings::new();
        assert!(settings.set_stroke_width(5.0));
        assert!(!settings.set_stroke_width(0.0));
        assert!(!settings.set_stroke_width(f64::NAN));
        assert_eq!(settings.style.width, 5.0);
    }

    #[test]
    fn test_toggle_lock() {
        let mut settings = ToolSettings::new();
        assert!(settings.toggle_lock());
        assert!(!settings.toggle_lock());
    }

    #[test]
    fn test_tool_serde_names() {
        let json = serde_json::to_string(&ToolKind::Rectangle).unwrap();
        assert_eq!(json, "\"rectangle\"");
        for tool in ToolKind::ALL {
            let parsed: ToolKind = serde_json::from_str(&format!("\"{}\"", tool.name())).unwrap();
            assert_eq!(parsed, tool);
        }
    }
}
