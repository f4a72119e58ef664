//! Media catalog trait

use async_trait::async_trait;
use mediarelay_core::{AppError, MediaLocation, MediaRecord};
use uuid::Uuid;

/// Read access to stored media records.
///
/// Implementations must support concurrent reads; every method may be called from
/// many request tasks at once.
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Resolve where the bytes of a media item live.
    ///
    /// Returns `AppError::NotFound` for unknown ids.
    async fn get_media_location(&self, id: Uuid) -> Result<MediaLocation, AppError> {
        self.get_media(id)
            .await?
            .map(|record| record.location())
            .ok_or_else(|| AppError::NotFound("Media not found".to_string()))
    }

    /// Fetch a full record, `None` when the id is unknown.
    async fn get_media(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError>;

    /// All records, newest upload first.
    async fn list_media(&self) -> Result<Vec<MediaRecord>, AppError>;

    /// Number of records, used by the health endpoint.
    async fn count(&self) -> Result<usize, AppError>;
}
