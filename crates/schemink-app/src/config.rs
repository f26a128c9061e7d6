//! Application configuration.

use crate::error::{AppError, AppResult};
use kurbo::Size;
use schemink_core::config::EditorConfig;
use schemink_core::storage::FileStorage;
use schemink_render::GridStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the command-line shell, loaded from JSON.
///
/// Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Grid style name: "none", "lines" or "dots".
    pub grid_style: String,
    /// Draw connector dots.
    pub show_ports: bool,
    pub editor: EditorConfig,
    /// Document store directory. Defaults to the platform data directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            grid_style: GridStyle::default().name().to_lowercase(),
            show_ports: true,
            editor: EditorConfig::default(),
            storage_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.editor.validate().map_err(|source| AppError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn viewport(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Configured grid style, falling back to the default for unknown names.
    pub fn grid(&self) -> GridStyle {
        GridStyle::from_name(&self.grid_style).unwrap_or_else(|| {
            log::warn!("Unknown grid style {:?}, using default", self.grid_style);
            GridStyle::default()
        })
    }

    /// Open the document store.
    pub fn storage(&self) -> AppResult<FileStorage> {
        let storage = match &self.storage_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => FileStorage::default_location()?,
        };
        Ok(storage)
    }
}
