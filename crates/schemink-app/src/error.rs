//! Application errors.

use schemink_core::error::{ConfigError, DocumentError};
use schemink_core::storage::StorageError;
use schemink_render::RendererError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unusable editor settings in {}: {source}", .path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("Invalid document: {0}")]
    Document(#[from] DocumentError),
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type AppResult<T> = Result<T, AppError>;
