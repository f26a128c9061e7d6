//! Storage abstraction for persistence.

mod memory;

mod file;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::scene::Scene;
use thiserror::Error;

/// Storage key used by the quick save/load commands.
pub const DEFAULT_DOCUMENT_KEY: &str = "schematic";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for scene storage backends.
///
/// Calls complete synchronously; the editor never suspends mid-command.
pub trait Storage: Send + Sync {
    /// Save a scene under `id`, replacing any previous one.
    fn save(&self, id: &str, scene: &Scene) -> StorageResult<()>;

    /// Load the scene stored under `id`.
    fn load(&self, id: &str) -> StorageResult<Scene>;

    /// Delete a scene. Missing ids are not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all stored ids.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a scene exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
