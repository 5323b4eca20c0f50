//! Light and dark page themes.

use crate::color::Rgba;
use crate::storage::{Storage, StorageResult, THEME_KEY};
use serde::{Deserialize, Serialize};

/// Page theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored form: `"light"` or `"dark"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` is light.
    pub fn from_stored(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Page background color.
    pub fn background(self) -> Rgba {
        match self {
            Theme::Light => Rgba::WHITE,
            Theme::Dark => Rgba::rgb(0x1e, 0x1e, 0x1e),
        }
    }

    /// Page text color.
    pub fn foreground(self) -> Rgba {
        match self {
            Theme::Light => Rgba::BLACK,
            Theme::Dark => Rgba::WHITE,
        }
    }

    /// Read the saved theme. Missing or unreadable values give light.
    pub fn load(storage: &impl Storage) -> Self {
        match storage.get(THEME_KEY) {
            Ok(Some(value)) => Self::from_stored(&value),
            Ok(None) => Theme::Light,
            Err(e) => {
                log::warn!("Could not read theme preference: {}", e);
                Theme::Light
            }
        }
    }

    /// Persist this theme.
    pub fn save(self, storage: &impl Storage) -> StorageResult<()> {
        storage.set(THEME_KEY, self.as_str())
    }
}
