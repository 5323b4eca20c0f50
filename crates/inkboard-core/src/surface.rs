//! The raster surface: a single RGBA pixel buffer that all strokes land in.
//!
//! Pixels are kept premultiplied (tiny-skia's native layout). PNG encoding
//! and data URLs use straight alpha, matching what a browser canvas exports.

use crate::tools::{Compositing, StrokeStyle};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{BezPath, PathEl};
use thiserror::Error;
use tiny_skia::{
    ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// Prefix of every data URL the surface produces.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("PNG decoding failed: {0}")]
    Decode(String),
    #[error("Not a PNG data URL")]
    InvalidDataUrl,
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Pixel capture used to wipe in-progress previews. Never persisted.
#[derive(Clone)]
pub struct Snapshot {
    pixmap: Pixmap,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Fixed-size pixel grid mutated by stroke commits.
#[derive(Clone)]
pub struct RasterSurface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl RasterSurface {
    /// Create a transparent surface. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap.data().iter().all(|b| *b == 0)
    }

    /// Erase everything.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Capture the current pixels.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixmap: self.pixmap.clone(),
        }
    }

    /// Put a snapshot's pixels back. Snapshots of a different size are ignored.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.width() != self.width() || snapshot.height() != self.height() {
            log::warn!(
                "Ignoring {}x{} snapshot on {}x{} surface",
                snapshot.width(),
                snapshot.height(),
                self.width(),
                self.height()
            );
            return;
        }
        self.pixmap.data_mut().copy_from_slice(snapshot.pixmap.data());
    }

    /// Stroke `path` with the given style. Empty or degenerate paths draw nothing.
    pub fn stroke(&mut self, path: &BezPath, style: &StrokeStyle, compositing: Compositing) {
        let Some(path) = to_skia_path(path) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(style.color.to_skia());
        paint.anti_alias = true;
        paint.blend_mode = compositing.blend_mode();

        let stroke = Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Draw a decoded image with its top-left corner at the origin.
    pub fn draw_image(&mut self, image: &Pixmap) {
        if image.width() == self.width() && image.height() == self.height() && self.is_blank() {
            // Same-size image on an empty surface: plain copy, no resampling
            self.pixmap.data_mut().copy_from_slice(image.data());
            return;
        }
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        let mut rgba = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| SurfaceError::Encode(e.to_string()))?;
            writer
                .write_image_data(&rgba)
                .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        }
        Ok(png_data)
    }

    /// Encode the surface as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> SurfaceResult<String> {
        let png_data = self.encode_png()?;
        Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png_data)))
    }

    /// Replace the surface contents with a decoded data URL image.
    ///
    /// The image is decoded first, so a bad URL leaves the surface untouched.
    pub fn load_data_url(&mut self, url: &str) -> SurfaceResult<()> {
        let image = decode_data_url(url)?;
        self.clear();
        self.draw_image(&image);
        Ok(())
    }
}

/// Decode a PNG data URL into a pixmap.
pub fn decode_data_url(url: &str) -> SurfaceResult<Pixmap> {
    let encoded = url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or(SurfaceError::InvalidDataUrl)?;
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| SurfaceError::Decode(e.to_string()))?;
    decode_png(&bytes)
}

/// Decode PNG bytes into a premultiplied pixmap.
pub fn decode_png(bytes: &[u8]) -> SurfaceResult<Pixmap> {
    let mut decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| SurfaceError::Decode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| SurfaceError::Decode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let (width, height) = (info.width, info.height);
    let mut pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(SurfaceError::Decode("unexpanded palette image".to_string()));
        }
    };

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(channels)) {
        let color = match channels {
            1 => ColorU8::from_rgba(src[0], src[0], src[0], 255),
            2 => ColorU8::from_rgba(src[0], src[0], src[0], src[1]),
            3 => ColorU8::from_rgba(src[0], src[1], src[2], 255),
            _ => ColorU8::from_rgba(src[0], src[1], src[2], src[3]),
        };
        *dst = color.premultiply();
    }

    Ok(pixmap)
}

/// Convert a kurbo path to a tiny-skia path.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}
