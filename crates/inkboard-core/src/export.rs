//! Export of the whole page as a standalone HTML document.
//!
//! The raster surface is flattened to an embedded PNG and every overlay is
//! written out as a positioned `div` with its current style and text.

use crate::camera::Camera;
use crate::layout::TextMeasure;
use crate::overlay::{OverlayKind, OverlayLayer, OverlayWidget, TEXT_BOX_PADDING};
use crate::surface::{RasterSurface, SurfaceError};
use crate::theme::Theme;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name every export is written to.
pub const EXPORT_FILENAME: &str = "page_snapshot.html";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to flatten surface: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Everything that ends up on the exported page.
pub struct PageExport<'a, M: TextMeasure> {
    pub surface: &'a RasterSurface,
    pub overlays: &'a OverlayLayer,
    pub camera: &'a Camera,
    pub theme: Theme,
    pub title: &'a str,
    pub stylesheets: &'a [String],
    /// Measures text box contents for line wrapping.
    pub measure: &'a M,
}

impl<M: TextMeasure> PageExport<'_, M> {
    /// Build the HTML document.
    pub fn render_page(&self) -> ExportResult<String> {
        let image = self.surface.to_data_url()?;
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(self.title)));
        for href in self.stylesheets {
            html.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", escape_html(href)));
        }
        html.push_str("</head>\n");

        html.push_str(&format!(
            "<body class=\"{}\" style=\"background-color: {}; color: {};\">\n",
            if self.theme.is_dark() { "dark-mode" } else { "light-mode" },
            self.theme.background(),
            self.theme.foreground(),
        ));
        html.push_str("<div id=\"whiteboard-container\">\n");
        html.push_str(&format!(
            "<img id=\"whiteboard\" src=\"{}\" width=\"{}\" height=\"{}\" alt=\"Whiteboard\">\n",
            image,
            self.surface.width(),
            self.surface.height(),
        ));

        for widget in self.overlays.widgets() {
            if let Some(div) = self.overlay_div(widget) {
                html.push_str(&div);
                html.push('\n');
            }
        }

        html.push_str("</div>\n</body>\n</html>\n");
        Ok(html)
    }

    fn overlay_div(&self, widget: &OverlayWidget) -> Option<String> {
        let content = match widget.kind {
            OverlayKind::StickyNote => escape_html(&widget.text),
            OverlayKind::TextBox => {
                // Whitespace-only text boxes are skipped
                let lines = widget.wrapped_lines(self.measure);
                if lines.is_empty() {
                    return None;
                }
                lines
                    .iter()
                    .map(|line| escape_html(line.text.trim_end()))
                    .collect::<Vec<_>>()
                    .join("<br>")
            }
        };

        Some(format!(
            "<div class=\"{}\" style=\"{}\">{}</div>",
            widget.kind.css_class(),
            overlay_style(widget, self.camera),
            content
        ))
    }

    /// Render and write to `dir/page_snapshot.html`.
    pub fn export_to_dir(&self, dir: &Path) -> ExportResult<PathBuf> {
        let html = self.render_page()?;
        let path = dir.join(EXPORT_FILENAME);
        std::fs::write(&path, html).map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Exported page to {}", path.display());
        Ok(path)
    }
}

/// Inline CSS reproducing a widget's on-screen placement and look.
fn overlay_style(widget: &OverlayWidget, camera: &Camera) -> String {
    let rect = widget.screen_rect(camera);
    let mut style = format!(
        "position: absolute; left: {}px; top: {}px; width: {}px; height: {}px; color: {};",
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height(),
        widget.color,
    );
    if widget.kind == OverlayKind::TextBox {
        style.push_str(&format!(
            " font: 16px Arial; padding: {}px; overflow-wrap: break-word; background-color: white;",
            TEXT_BOX_PADDING
        ));
    }
    style
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
