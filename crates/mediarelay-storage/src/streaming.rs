//! Streaming byte source
//!
//! The default strategy. The origin body is exposed as the response's chunk stream
//! and is only pulled as fast as the relay writes to the client.

use crate::forward::ForwardHeaders;
use crate::http_client::UpstreamClient;
use crate::traits::{
    ByteStreamSource, UpstreamError, UpstreamHeaders, UpstreamResponse, UpstreamResult,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mediarelay_core::BodyStrategy;
use std::time::Duration;

/// Incremental upstream reader
#[derive(Clone)]
pub struct StreamingSource {
    client: UpstreamClient,
}

impl StreamingSource {
    pub fn new(timeout: Duration) -> UpstreamResult<Self> {
        Ok(Self {
            client: UpstreamClient::new(timeout)?,
        })
    }
}

#[async_trait]
impl ByteStreamSource for StreamingSource {
    async fn open(&self, url: &str, forward: &ForwardHeaders) -> UpstreamResult<UpstreamResponse> {
        let response = self.client.get(url, forward).await?;

        let status = response.status();
        let headers = UpstreamHeaders::from_header_map(response.headers());
        let body = response
            .bytes_stream()
            .map_err(|e| UpstreamError::Body(e.to_string()));

        Ok(UpstreamResponse {
            status,
            headers,
            body: Box::pin(body),
        })
    }

    fn strategy(&self) -> BodyStrategy {
        BodyStrategy::Streaming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_origins::{refused_origin, silent_origin, truncating_origin};
    use bytes::Bytes;
    use futures::StreamExt;
    use reqwest::header::{HeaderMap, HeaderValue, RANGE};
    use reqwest::StatusCode;

    fn source() -> StreamingSource {
        StreamingSource::new(Duration::from_millis(500)).unwrap()
    }

    async fn collect(response: UpstreamResponse) -> Result<Vec<u8>, UpstreamError> {
        let chunks: Vec<Bytes> = response.body.try_collect().await?;
        Ok(chunks.concat())
    }

    #[tokio::test]
    async fn whole_object_is_streamed_with_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/clip.mp4")
            .match_header("accept", "*/*")
            .with_status(200)
            .with_header("content-type", "video/mp4")
            .with_header("etag", "\"v1\"")
            .with_header("cache-control", "max-age=60")
            .with_body("0123456789")
            .create_async()
            .await;

        let url = format!("{}/clip.mp4", server.url());
        let response = source()
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers.content_type.as_ref().unwrap(), "video/mp4");
        assert_eq!(response.headers.etag.as_ref().unwrap(), "\"v1\"");
        assert_eq!(response.headers.cache_control.as_ref().unwrap(), "max-age=60");
        assert_eq!(collect(response).await.unwrap(), b"0123456789");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn range_is_forwarded_to_origin() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/clip.mp4")
            .match_header("range", "bytes=2-5")
            .with_status(206)
            .with_header("content-range", "bytes 2-5/10")
            .with_body("2345")
            .create_async()
            .await;

        let mut inbound = HeaderMap::new();
        inbound.insert(RANGE, HeaderValue::from_static("bytes=2-5"));
        let forward = ForwardHeaders::from_request_headers(&inbound);

        let url = format!("{}/clip.mp4", server.url());
        let response = source().open(&url, &forward).await.unwrap();

        assert_eq!(response.status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(
            response.headers.content_range.as_ref().unwrap(),
            "bytes 2-5/10"
        );
        assert_eq!(collect(response).await.unwrap(), b"2345");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_a_response_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.mp4")
            .with_status(404)
            .with_body("NoSuchKey")
            .create_async()
            .await;

        let url = format!("{}/missing.mp4", server.url());
        let response = source()
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(collect(response).await.unwrap(), b"NoSuchKey");
    }

    #[tokio::test]
    async fn silent_origin_times_out() {
        let url = silent_origin().await;
        let source = StreamingSource::new(Duration::from_millis(150)).unwrap();

        let err = source
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout { timeout_ms: 150 }));
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let url = refused_origin().await;
        let err = source()
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Unreachable(_)));
    }

    #[tokio::test]
    async fn non_http_url_is_rejected_before_any_request() {
        let err = source()
            .open("s3://bucket/key.mp4", &ForwardHeaders::whole_resource())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn truncated_body_surfaces_as_stream_error() {
        let url = truncating_origin(100, b"0123456789").await;
        let response = source()
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::OK);

        let mut body = response.body;
        let mut received = 0;
        let mut failed = false;
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => received += bytes.len(),
                Err(err) => {
                    assert!(matches!(err, UpstreamError::Body(_)));
                    failed = true;
                    break;
                }
            }
        }
        assert!(failed);
        assert!(received <= 10);
    }
}
