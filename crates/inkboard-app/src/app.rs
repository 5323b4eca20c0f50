//! Application shell: configuration, storage, and script replay.

use crate::script::{Command, RunReport, ScriptRunner, parse_script};
use inkboard_core::config::ConfigError;
use inkboard_core::storage::StorageError;
use inkboard_core::surface::SurfaceError;
use inkboard_core::{FileStorage, Whiteboard, WhiteboardConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors. Only startup can fail; commands never do.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to open storage: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to create surface: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Failed to read script {path}: {source}")]
    ReadScript {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage directory. Defaults to the platform data directory.
    pub storage_dir: Option<PathBuf>,
    /// Where `export` commands without a directory write. Defaults to the
    /// current directory.
    pub export_dir: Option<PathBuf>,
    pub whiteboard: WhiteboardConfig,
}

impl AppConfig {
    /// Read a JSON config file. The whiteboard section is validated here.
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(ConfigError::Parse)?;
        config.whiteboard.validate()?;
        Ok(config)
    }

    fn open_storage(&self) -> AppResult<FileStorage> {
        let storage = match &self.storage_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => FileStorage::default_location()?,
        };
        log::info!("Using storage at {}", storage.base_path().display());
        Ok(storage)
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Open a session on file storage and replay `commands` against it.
    pub fn run(&self, commands: &[Command]) -> AppResult<RunReport> {
        let storage = self.config.open_storage()?;
        let mut board = Whiteboard::new(self.config.whiteboard.clone(), storage)?;
        let report = ScriptRunner::new(self.config.export_dir()).run(&mut board, commands);
        log::info!(
            "Applied {} commands, {} saves, {} exports",
            report.applied,
            report.saved.len(),
            report.exported.len()
        );
        Ok(report)
    }

    /// Read a script file and run it.
    pub fn run_file(&self, path: &Path) -> AppResult<RunReport> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::ReadScript {
            path: path.display().to_string(),
            source,
        })?;
        let commands = parse_script(&json)?;
        self.run(&commands)
    }
}
