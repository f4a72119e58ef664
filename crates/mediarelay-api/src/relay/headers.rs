//! Status and header mapping from the upstream response onto the client response.

use axum::http::header::{ACCEPT_RANGES, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use mediarelay_core::constants::{ACCEPT_RANGES_BYTES, DEFAULT_CONTENT_TYPE};
use mediarelay_storage::UpstreamHeaders;

/// Outbound status for a relayable upstream status, `None` when the failure policy
/// must take over.
///
/// 206 stays 206. Every other 2xx becomes 200. Redirects the client library did not
/// follow are failures like 4xx and 5xx.
pub fn relay_status(upstream: StatusCode) -> Option<StatusCode> {
    if upstream == StatusCode::PARTIAL_CONTENT {
        Some(StatusCode::PARTIAL_CONTENT)
    } else if upstream.is_success() {
        Some(StatusCode::OK)
    } else {
        None
    }
}

/// Build the committed header set for a relayed response.
///
/// Content type comes from the origin, then the stored record, then the generic
/// binary type. `Accept-Ranges: bytes` goes in last and wins over whatever the origin sent.
pub fn relay_headers(upstream: &UpstreamHeaders, stored_mime_type: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let content_type = upstream
        .content_type
        .clone()
        .or_else(|| {
            stored_mime_type
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .and_then(|m| HeaderValue::from_str(m).ok())
        })
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);

    for (name, value) in upstream.passthrough() {
        headers.insert(name, value.clone());
    }

    headers.insert(ACCEPT_RANGES, HeaderValue::from_static(ACCEPT_RANGES_BYTES));
    headers
}
