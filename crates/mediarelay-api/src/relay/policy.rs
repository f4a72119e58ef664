//! Failure/fallback policy
//!
//! Only reached before any response header is committed. The configured policy
//! (`STREAM_FAILURE_POLICY`) is fixed for the life of the process:
//!
//! - `redirect`: 302 to the stored origin URL so the client fetches it directly.
//! - `bad_gateway`: 502 with `{ message, upstreamStatus, detail }`.
//!
//! No retry is ever made against the origin.

use super::{RelayState, StreamTarget};
use crate::error::HttpAppError;
use axum::http::header::{CACHE_CONTROL, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use mediarelay_core::{AppError, FailurePolicy};
use mediarelay_storage::{ByteStream, UpstreamError, UpstreamResponse};
use serde::Serialize;
use std::time::Duration;
use utoipa::ToSchema;

const BAD_GATEWAY_MESSAGE: &str = "Failed to retrieve media";

/// Why the relay could not start.
#[derive(Debug)]
pub enum UpstreamFailure {
    /// The origin answered with a status that cannot be relayed. The body is unread.
    ErrorStatus(UpstreamResponse),
    /// No usable response: timeout, connection failure, or a buffered read that failed.
    Fetch(UpstreamError),
}

impl UpstreamFailure {
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            UpstreamFailure::ErrorStatus(response) => Some(response.status.as_u16()),
            UpstreamFailure::Fetch(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamFailure::ErrorStatus(_) => "upstream_error_status",
            UpstreamFailure::Fetch(err) => err.kind(),
        }
    }
}

/// Body of the 502 answer under the `bad_gateway` policy.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamErrorBody {
    pub message: String,
    /// Origin status, `null` when the origin never answered.
    pub upstream_status: Option<u16>,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct FailureResponder {
    policy: FailurePolicy,
    detail_max_chars: usize,
    read_timeout: Duration,
}

impl FailureResponder {
    /// `read_timeout` bounds how long an upstream error body is read for its detail text.
    pub fn new(policy: FailurePolicy, detail_max_chars: usize, read_timeout: Duration) -> Self {
        Self {
            policy,
            detail_max_chars,
            read_timeout,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Answer a request whose upstream leg failed before anything was sent.
    pub async fn respond(
        &self,
        target: &StreamTarget,
        failure: UpstreamFailure,
    ) -> Result<Response, HttpAppError> {
        match self.policy {
            FailurePolicy::Redirect => self.redirect(target, &failure),
            FailurePolicy::BadGateway => Ok(self.bad_gateway(target, failure).await),
        }
    }

    fn redirect(
        &self,
        target: &StreamTarget,
        failure: &UpstreamFailure,
    ) -> Result<Response, HttpAppError> {
        let location = HeaderValue::from_str(&target.origin_url).map_err(|e| {
            AppError::InvalidOriginUrl(format!("Origin URL is not a valid Location: {}", e))
        })?;

        tracing::warn!(
            media_id = %target.media_id,
            origin_host = %target.origin_host,
            upstream_status = ?failure.upstream_status(),
            failure = failure.kind(),
            state = RelayState::FallbackRedirectSent.as_str(),
            "redirecting client to origin"
        );

        Ok((
            StatusCode::FOUND,
            [
                (LOCATION, location),
                (CACHE_CONTROL, HeaderValue::from_static("no-store")),
            ],
        )
            .into_response())
    }

    async fn bad_gateway(&self, target: &StreamTarget, failure: UpstreamFailure) -> Response {
        let upstream_status = failure.upstream_status();
        let kind = failure.kind();

        let raw_detail = match failure {
            UpstreamFailure::ErrorStatus(response) => self.read_error_text(response.body).await,
            UpstreamFailure::Fetch(err) => err.to_string(),
        };
        let detail = truncate_chars(&raw_detail, self.detail_max_chars);

        tracing::warn!(
            media_id = %target.media_id,
            origin_host = %target.origin_host,
            upstream_status = ?upstream_status,
            failure = kind,
            state = RelayState::ErrorReported.as_str(),
            "upstream failure reported"
        );

        (
            StatusCode::BAD_GATEWAY,
            Json(UpstreamErrorBody {
                message: BAD_GATEWAY_MESSAGE.to_string(),
                upstream_status,
                detail,
            }),
        )
            .into_response()
    }

    /// Read just enough of an error body to fill `detail`. A UTF-8 char is at most four
    /// bytes, so that many bytes per char is always enough. Whatever arrived before an
    /// error or the timeout is kept; the rest of the body is dropped unread.
    async fn read_error_text(&self, mut body: ByteStream) -> String {
        let limit = self.detail_max_chars.saturating_mul(4);
        let mut buf = Vec::new();

        let read = async {
            while buf.len() < limit {
                match body.next().await {
                    Some(Ok(chunk)) => buf.extend_from_slice(&chunk),
                    Some(Err(err)) => {
                        tracing::debug!(error = %err, "Upstream error body read failed");
                        break;
                    }
                    None => break,
                }
            }
        };
        if tokio::time::timeout(self.read_timeout, read).await.is_err() {
            tracing::debug!("Upstream error body read timed out");
        }

        buf.truncate(limit);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
