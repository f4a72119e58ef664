use crate::{BufferedSource, ByteStreamSource, StreamingSource, UpstreamResult};
use mediarelay_core::{BodyStrategy, Config};
use std::sync::Arc;

/// Create the byte source selected by configuration. Called once at startup.
pub fn create_byte_source(config: &Config) -> UpstreamResult<Arc<dyn ByteStreamSource>> {
    let timeout = config.upstream_timeout();

    match config.body_strategy() {
        BodyStrategy::Streaming => {
            tracing::info!(
                timeout_ms = config.upstream_timeout_ms(),
                "Upstream body strategy: streaming"
            );
            Ok(Arc::new(StreamingSource::new(timeout)?))
        }
        BodyStrategy::Buffered => {
            tracing::warn!(
                timeout_ms = config.upstream_timeout_ms(),
                max_bytes = config.buffered_body_max_bytes(),
                "Upstream body strategy: buffered. Every relayed body is held in memory"
            );
            Ok(Arc::new(BufferedSource::new(
                timeout,
                config.buffered_body_max_bytes(),
            )?))
        }
    }
}
