//! Byte source abstraction
//!
//! This module defines the `ByteStreamSource` trait every upstream strategy implements,
//! and the response type handed to the relay.

use crate::forward::ForwardHeaders;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use mediarelay_core::BodyStrategy;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_RANGES, CACHE_CONTROL, CONTENT_LENGTH,
    CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED,
};
use reqwest::StatusCode;
use std::fmt;
use std::pin::Pin;
use thiserror::Error;

/// Upstream operation errors
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No response headers within the configured timeout. The request was aborted.
    #[error("Upstream timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// DNS, refused connection, TLS or any other connection-level failure.
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    /// The stored URL cannot be fetched at all (unparseable or not http/https).
    #[error("Invalid origin URL: {0}")]
    InvalidUrl(String),

    /// The body failed after the response headers were received.
    #[error("Upstream body error: {0}")]
    Body(String),

    /// Buffered strategy only: the body exceeded the configured cap.
    #[error("Upstream body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl UpstreamError {
    /// Short machine-readable kind, used in logs and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout { .. } => "upstream_timeout",
            UpstreamError::Unreachable(_) => "upstream_unreachable",
            UpstreamError::InvalidUrl(_) => "invalid_origin_url",
            UpstreamError::Body(_) => "upstream_body",
            UpstreamError::BodyTooLarge { .. } => "upstream_body_too_large",
            UpstreamError::Client(_) => "http_client",
        }
    }
}

/// Result type for upstream operations
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Lazily consumed origin body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, UpstreamError>> + Send>>;

/// The response headers the relay cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamHeaders {
    pub content_type: Option<HeaderValue>,
    pub content_length: Option<HeaderValue>,
    pub content_range: Option<HeaderValue>,
    pub accept_ranges: Option<HeaderValue>,
    pub cache_control: Option<HeaderValue>,
    pub last_modified: Option<HeaderValue>,
    pub etag: Option<HeaderValue>,
}

impl UpstreamHeaders {
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let pick = |name: HeaderName| headers.get(name).cloned();
        Self {
            content_type: pick(CONTENT_TYPE),
            content_length: pick(CONTENT_LENGTH),
            content_range: pick(CONTENT_RANGE),
            accept_ranges: pick(ACCEPT_RANGES),
            cache_control: pick(CACHE_CONTROL),
            last_modified: pick(LAST_MODIFIED),
            etag: pick(ETAG),
        }
    }

    /// Headers copied through to the client unchanged. Content type is resolved separately.
    pub fn passthrough(&self) -> impl Iterator<Item = (HeaderName, &HeaderValue)> {
        [
            (CONTENT_LENGTH, self.content_length.as_ref()),
            (CONTENT_RANGE, self.content_range.as_ref()),
            (ACCEPT_RANGES, self.accept_ranges.as_ref()),
            (CACHE_CONTROL, self.cache_control.as_ref()),
            (LAST_MODIFIED, self.last_modified.as_ref()),
            (ETAG, self.etag.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// An opened origin object: status, header subset and a live body positioned at the
/// first unread byte.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: UpstreamHeaders,
    pub body: ByteStream,
}

impl fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Byte source abstraction trait
///
/// Implementations issue one GET per call. Dropping the returned body closes the
/// upstream connection, so a relay that stops early never leaks it.
#[async_trait]
pub trait ByteStreamSource: Send + Sync {
    /// Open the object at `url`, forwarding `forward` headers.
    ///
    /// Fails with `Timeout` when no response headers arrive in time, `Unreachable` on
    /// connection-level failures and `InvalidUrl` for URLs that are not http(s).
    /// Error statuses are not errors here: they come back as a normal response.
    async fn open(&self, url: &str, forward: &ForwardHeaders) -> UpstreamResult<UpstreamResponse>;

    /// Which strategy this source implements
    fn strategy(&self) -> BodyStrategy;
}
