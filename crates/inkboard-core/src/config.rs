//! Whiteboard configuration.

use crate::shapes::ARROW_HEAD_LENGTH;
use crate::tools::StrokeStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where logging out sends the user.
pub const DEFAULT_LOGOUT_URL: &str = "./logIn.html";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for one whiteboard session. Every field has a default, so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Raster surface width in pixels.
    pub width: u32,
    /// Raster surface height in pixels.
    pub height: u32,
    /// Stroke style at startup.
    pub stroke: StrokeStyle,
    /// Length of each arrowhead stroke.
    pub arrow_head_length: f64,
    /// Title of exported pages.
    pub page_title: String,
    /// Stylesheets linked from exported pages.
    pub stylesheets: Vec<String>,
    /// Redirect target of the logout stub.
    pub logout_url: String,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            stroke: StrokeStyle::default(),
            arrow_head_length: ARROW_HEAD_LENGTH,
            page_title: "Whiteboard".to_string(),
            stylesheets: vec!["styles.css".to_string()],
            logout_url: DEFAULT_LOGOUT_URL.to_string(),
        }
    }
}

impl WhiteboardConfig {
    /// Parse a JSON config and check it describes a usable surface.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
