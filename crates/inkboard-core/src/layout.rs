//! Greedy word wrapping for flattening text box contents.

use kurbo::Point;

/// Vertical distance between wrapped lines.
pub const LINE_HEIGHT: f64 = 20.0;

/// Font size text boxes are laid out with.
pub const FONT_SIZE: f64 = 16.0;

/// Measures the rendered width of a run of text.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f64;
}

/// Every character advances by the same amount.
///
/// The default approximates 16px Arial, whose average advance is a little
/// over half the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance(pub f64);

impl Default for FixedAdvance {
    fn default() -> Self {
        Self(FONT_SIZE * 0.55)
    }
}

impl TextMeasure for FixedAdvance {
    fn width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.0
    }
}

impl<F: Fn(&str) -> f64> TextMeasure for F {
    fn width(&self, text: &str) -> f64 {
        self(text)
    }
}

/// A wrapped line and where its baseline starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub origin: Point,
}

/// Wrap `text` into lines no wider than `max_width`, starting at `origin`.
///
/// Words are split on spaces and appended while `line + word + " "` fits.
/// A word that does not fit on its own still gets a line. Whitespace-only
/// text produces no lines. Lines keep their trailing space.
pub fn wrap_text(text: &str, origin: Point, max_width: f64, measure: &impl TextMeasure) -> Vec<TextLine> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut y = origin.y;

    for word in text.split(' ') {
        let candidate = format!("{}{} ", line, word);
        if measure.width(&candidate) > max_width && !line.is_empty() {
            lines.push(TextLine {
                text: std::mem::take(&mut line),
                origin: Point::new(origin.x, y),
            });
            line = format!("{} ", word);
            y += LINE_HEIGHT;
        } else {
            line = candidate;
        }
    }

    lines.push(TextLine {
        text: line,
        origin: Point::new(origin.x, y),
    });
    lines
}
