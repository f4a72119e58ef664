use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_media_id;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use mediarelay_core::{AppError, MediaRecord};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/media",
    tag = "media",
    responses(
        (status = 200, description = "All media, newest upload first", body = Vec<MediaRecord>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.catalog.list_media().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list media");
        e
    })?;

    tracing::debug!(count = records.len(), "Listed media");
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/media/{id}",
    tag = "media",
    params(
        ("id" = String, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Media found", body = MediaRecord),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let media_id = parse_media_id(&id)?;

    let record = state
        .catalog
        .get_media(media_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    Ok(Json(record))
}
