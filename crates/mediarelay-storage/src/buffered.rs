//! Buffered byte source
//!
//! Portability fallback: successful bodies are read completely into memory before the
//! relay sees them, bounded by `BUFFERED_BODY_MAX_MB`. Error bodies stay lazy so the
//! failure policy can decide how much of them to read.

use crate::forward::ForwardHeaders;
use crate::http_client::UpstreamClient;
use crate::traits::{
    ByteStreamSource, UpstreamError, UpstreamHeaders, UpstreamResponse, UpstreamResult,
};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{stream, TryStreamExt};
use mediarelay_core::BodyStrategy;
use reqwest::header::HeaderValue;
use std::time::Duration;

#[derive(Clone)]
pub struct BufferedSource {
    client: UpstreamClient,
    max_bytes: usize,
}

impl BufferedSource {
    pub fn new(timeout: Duration, max_bytes: usize) -> UpstreamResult<Self> {
        Ok(Self {
            client: UpstreamClient::new(timeout)?,
            max_bytes,
        })
    }

    async fn read_all(&self, mut response: reqwest::Response) -> UpstreamResult<Bytes> {
        if let Some(declared) = response.content_length() {
            if declared as usize > self.max_bytes {
                return Err(UpstreamError::BodyTooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let mut buf = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| UpstreamError::Body(e.to_string()))?
        {
            if buf.len() + chunk.len() > self.max_bytes {
                return Err(UpstreamError::BodyTooLarge {
                    limit: self.max_bytes,
                });
            }
            buf.extend_from_slice(&chunk);
        }

        Ok(buf.freeze())
    }
}

#[async_trait]
impl ByteStreamSource for BufferedSource {
    async fn open(&self, url: &str, forward: &ForwardHeaders) -> UpstreamResult<UpstreamResponse> {
        let response = self.client.get(url, forward).await?;

        let status = response.status();
        let mut headers = UpstreamHeaders::from_header_map(response.headers());

        if !status.is_success() {
            let body = response
                .bytes_stream()
                .map_err(|e| UpstreamError::Body(e.to_string()));
            return Ok(UpstreamResponse {
                status,
                headers,
                body: Box::pin(body),
            });
        }

        let data = self.read_all(response).await?;
        tracing::debug!(bytes = data.len(), "Upstream body buffered");

        headers.content_length = Some(HeaderValue::from(data.len()));
        let body = stream::iter(std::iter::once(Ok::<_, UpstreamError>(data)));

        Ok(UpstreamResponse {
            status,
            headers,
            body: Box::pin(body),
        })
    }

    fn strategy(&self) -> BodyStrategy {
        BodyStrategy::Buffered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_origins::truncating_origin;
    use reqwest::StatusCode;

    fn source(max_bytes: usize) -> BufferedSource {
        BufferedSource::new(Duration::from_millis(500), max_bytes).unwrap()
    }

    #[tokio::test]
    async fn buffers_success_body_and_sets_length() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/photo.jpg")
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_body("jpegbytes")
            .create_async()
            .await;

        let url = format!("{}/photo.jpg", server.url());
        let response = source(1024)
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers.content_length.as_ref().unwrap(), "9");

        let chunks: Vec<Bytes> = response.body.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"jpegbytes");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/big.mp4")
            .with_status(200)
            .with_body(vec![7u8; 64])
            .create_async()
            .await;

        let url = format!("{}/big.mp4", server.url());
        let err = source(16)
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::BodyTooLarge { limit: 16 }));
    }

    #[tokio::test]
    async fn error_body_is_left_unread() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/denied.mp4")
            .with_status(403)
            .with_body("AccessDenied")
            .create_async()
            .await;

        let url = format!("{}/denied.mp4", server.url());
        let response = source(4)
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::FORBIDDEN);
        let chunks: Vec<Bytes> = response.body.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"AccessDenied");
    }

    #[tokio::test]
    async fn truncated_body_fails_before_relay() {
        let url = truncating_origin(100, b"0123456789").await;
        let err = source(1024)
            .open(&url, &ForwardHeaders::whole_resource())
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Body(_)));
    }
}
