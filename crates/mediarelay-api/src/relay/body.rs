//! Relay body: the upstream byte stream as handed to hyper.
//!
//! Chunks are forwarded as they arrive; nothing is accumulated. A body error is passed
//! on as a stream error, which makes hyper cut the connection, so the client sees a
//! truncated response rather than a corrected one. Dropping the body (client gone, or
//! server shutdown) drops the upstream stream and with it the origin connection.

use super::{RelayState, StreamTarget};
use bytes::Bytes;
use futures::Stream;
use mediarelay_storage::{ByteStream, UpstreamError};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

pub struct RelayBody {
    inner: ByteStream,
    target: StreamTarget,
    status: u16,
    expected_len: Option<u64>,
    bytes_sent: u64,
    started: Instant,
    state: RelayState,
}

impl RelayBody {
    pub fn new(
        inner: ByteStream,
        target: StreamTarget,
        status: u16,
        expected_len: Option<u64>,
    ) -> Self {
        Self {
            inner,
            target,
            status,
            expected_len,
            bytes_sent: 0,
            started: Instant::now(),
            state: RelayState::Relaying,
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    fn complete(&mut self) {
        self.state = RelayState::RelayingComplete;
        tracing::info!(
            media_id = %self.target.media_id,
            origin_host = %self.target.origin_host,
            status = self.status,
            bytes_sent = self.bytes_sent,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "relay complete"
        );
    }

    fn abort(&mut self, reason: &str) {
        self.state = RelayState::Aborted;
        tracing::warn!(
            media_id = %self.target.media_id,
            origin_host = %self.target.origin_host,
            status = self.status,
            bytes_sent = self.bytes_sent,
            expected_bytes = ?self.expected_len,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            reason = %reason,
            "relay aborted"
        );
    }
}

impl Stream for RelayBody {
    type Item = Result<Bytes, UpstreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.state.is_terminal() {
            return Poll::Ready(None);
        }

        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_sent += chunk.len() as u64;
                // hyper may stop polling once the announced length is written.
                if this.expected_len == Some(this.bytes_sent) {
                    this.complete();
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(err))) => {
                this.abort(&err.to_string());
                Poll::Ready(Some(Err(err)))
            }
            Poll::Ready(None) => {
                match this.expected_len {
                    Some(expected) if expected > this.bytes_sent => {
                        this.abort("upstream body ended early")
                    }
                    _ => this.complete(),
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayBody {
    fn drop(&mut self) {
        if self.state == RelayState::Relaying {
            self.abort("client disconnected");
        }
    }
}
