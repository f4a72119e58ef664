//! Read-only in-memory catalog
//!
//! Loaded once at startup (typically from the JSON file named by `MEDIA_CATALOG_PATH`)
//! and never mutated afterwards, so concurrent readers share it without locking.

use crate::catalog::MediaCatalog;
use async_trait::async_trait;
use mediarelay_core::{AppError, MediaRecord};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryMediaCatalog {
    records: Arc<HashMap<Uuid, MediaRecord>>,
}

impl InMemoryMediaCatalog {
    /// Build a catalog from records. Duplicate ids are rejected.
    pub fn new(records: Vec<MediaRecord>) -> Result<Self, AppError> {
        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            let id = record.id;
            if map.insert(id, record).is_some() {
                return Err(AppError::Catalog(format!("Duplicate media id {}", id)));
            }
        }
        Ok(Self {
            records: Arc::new(map),
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a JSON array of records from disk.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to read media catalog");
            AppError::Catalog(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let records: Vec<MediaRecord> = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to parse media catalog");
            AppError::Catalog(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let catalog = Self::new(records)?;
        tracing::info!(
            path = %path.display(),
            records = catalog.records.len(),
            "Media catalog loaded"
        );
        Ok(catalog)
    }
}

#[async_trait]
impl MediaCatalog for InMemoryMediaCatalog {
    async fn get_media(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        Ok(self.records.get(&id).cloned())
    }

    async fn list_media(&self) -> Result<Vec<MediaRecord>, AppError> {
        let mut records: Vec<MediaRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.records.len())
    }
}
