use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::parse_media_id;
use crate::relay::{
    relay_headers, relay_status, RelayBody, StreamTarget, UpstreamErrorBody, UpstreamFailure,
};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header::CONTENT_LENGTH, HeaderMap, Method},
    response::Response,
};
use mediarelay_core::AppError;
use mediarelay_storage::{ForwardHeaders, UpstreamError};
use std::sync::Arc;

/// Stream a media file through the relay
///
/// Forwards an optional `Range` header to the origin and relays the answer without
/// buffering it. When the origin fails before anything is sent, the configured policy
/// answers with a redirect to the origin or a 502. A `HEAD` gets the same status and
/// headers with no body; the upstream body is dropped unread.
#[utoipa::path(
    get,
    path = "/media/{id}/stream",
    tag = "media",
    params(
        ("id" = String, Path, description = "Media ID"),
        ("Range" = Option<String>, Header, description = "Byte range, forwarded verbatim to the origin")
    ),
    responses(
        (status = 200, description = "Whole object", content_type = "application/octet-stream"),
        (status = 206, description = "Partial content as returned by the origin", content_type = "application/octet-stream"),
        (status = 302, description = "Origin failed; fetch it directly (redirect policy)"),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Stored origin URL is unusable", body = ErrorResponse),
        (status = 502, description = "Origin failed (bad_gateway policy)", body = UpstreamErrorBody)
    )
)]
pub async fn stream_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let media_id = parse_media_id(&id)?;
    let location = state.catalog.get_media_location(media_id).await?;

    let target = StreamTarget::new(media_id, location.url, location.mime_type);
    let forward = ForwardHeaders::from_request_headers(&headers);

    tracing::debug!(
        media_id = %media_id,
        origin_host = %target.origin_host,
        range = forward.has_range(),
        strategy = %state.upstream.source.strategy(),
        "Opening upstream"
    );

    let upstream = match state.upstream.source.open(&target.origin_url, &forward).await {
        Ok(upstream) => upstream,
        Err(UpstreamError::InvalidUrl(reason)) => {
            tracing::error!(
                media_id = %media_id,
                reason = %reason,
                "Stored origin URL cannot be fetched"
            );
            return Err(AppError::InvalidOriginUrl(reason).into());
        }
        Err(err) => {
            return state
                .upstream
                .failures
                .respond(&target, UpstreamFailure::Fetch(err))
                .await;
        }
    };

    let Some(status) = relay_status(upstream.status) else {
        return state
            .upstream
            .failures
            .respond(&target, UpstreamFailure::ErrorStatus(upstream))
            .await;
    };

    let headers = relay_headers(&upstream.headers, target.mime_type.as_deref());
    let expected_len = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let body = if method == Method::HEAD {
        tracing::debug!(
            media_id = %media_id,
            status = status.as_u16(),
            "Answered HEAD without relaying the body"
        );
        Body::empty()
    } else {
        Body::from_stream(RelayBody::new(
            upstream.body,
            target,
            status.as_u16(),
            expected_len,
        ))
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
