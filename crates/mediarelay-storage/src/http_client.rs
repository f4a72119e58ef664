//! Shared upstream HTTP client
//!
//! Both byte sources issue their GET through here, so the timeout and error
//! classification are identical whichever strategy is configured.

use crate::forward::ForwardHeaders;
use crate::traits::{UpstreamError, UpstreamResult};
use reqwest::{Client, Response, Url};
use std::time::{Duration, Instant};

#[derive(Clone)]
pub(crate) struct UpstreamClient {
    client: Client,
    timeout: Duration,
}

impl UpstreamClient {
    /// `timeout` bounds connect plus response headers. The body transfer itself is unbounded.
    pub(crate) fn new(timeout: Duration) -> UpstreamResult<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Client(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub(crate) fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Issue the single upstream GET. Returns as soon as the status line and headers
    /// are in; the body is left unread.
    pub(crate) async fn get(&self, url: &str, forward: &ForwardHeaders) -> UpstreamResult<Response> {
        let origin = parse_origin_url(url)?;
        let origin_host = origin.host_str().unwrap_or_default().to_string();
        let started = Instant::now();

        let request = self
            .client
            .get(origin)
            .headers(forward.to_header_map())
            .send();

        // Dropping the in-flight future on timeout aborts the request and its connection.
        let response = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(self.classify(e)),
            Err(_) => {
                return Err(UpstreamError::Timeout {
                    timeout_ms: self.timeout_ms(),
                })
            }
        };

        tracing::debug!(
            origin_host = %origin_host,
            upstream_status = response.status().as_u16(),
            range = forward.has_range(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Upstream response headers received"
        );

        Ok(response)
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout {
                timeout_ms: self.timeout_ms(),
            }
        } else if err.is_builder() {
            UpstreamError::InvalidUrl(err.to_string())
        } else {
            UpstreamError::Unreachable(err.to_string())
        }
    }
}

/// Only absolute http(s) URLs can be fetched.
pub(crate) fn parse_origin_url(url: &str) -> UpstreamResult<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        "http" | "https" => Err(UpstreamError::InvalidUrl("URL has no host".to_string())),
        other => Err(UpstreamError::InvalidUrl(format!(
            "Unsupported URL scheme: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_origin_url("http://cdn.example.com/a.mp4").is_ok());
        assert!(parse_origin_url(" https://cdn.example.com/a.mp4?sig=1 ").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(matches!(
            parse_origin_url("ftp://cdn.example.com/a.mp4"),
            Err(UpstreamError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_origin_url("file:///etc/passwd"),
            Err(UpstreamError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_origin_url("not a url"),
            Err(UpstreamError::InvalidUrl(_))
        ));
    }
}
