pub mod media_get;
pub mod media_stream;

use mediarelay_core::AppError;
use uuid::Uuid;

/// Media ids are UUIDs. Anything else cannot name a record, so it is reported exactly
/// like an unknown id.
pub(crate) fn parse_media_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        tracing::debug!(media_id = %raw, "Media id is not a UUID");
        AppError::NotFound("Media not found".to_string())
    })
}
