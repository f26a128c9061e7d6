//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::scene::Scene;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Scenes are kept in serialized form so a load goes through the same
/// parse path as a file would.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw JSON under `id` without validating it.
    pub fn insert_raw(&self, id: &str, json: impl Into<String>) -> StorageResult<()> {
        let mut docs = self.documents.write().map_err(lock_error)?;
        docs.insert(id.to_string(), json.into());
        Ok(())
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, scene: &Scene) -> StorageResult<()> {
        let json = scene
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.insert_raw(id, json)
    }

    fn load(&self, id: &str) -> StorageResult<Scene> {
        let docs = self.documents.read().map_err(lock_error)?;
        let json = docs
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Scene::from_json(json).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut docs = self.documents.write().map_err(lock_error)?;
        docs.remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let docs = self.documents.read().map_err(lock_error)?;
        Ok(docs.keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        let docs = self.documents.read().map_err(lock_error)?;
        Ok(docs.contains_key(id))
    }
}
