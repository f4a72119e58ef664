//! Mediarelay Storage Library
//!
//! The upstream leg of the relay: turning a client's request headers into the headers
//! forwarded to the origin, and opening the origin object as a byte source.
//!
//! Two [`ByteStreamSource`] strategies exist. [`StreamingSource`] hands the origin body
//! to the relay as an incremental stream and is the default. [`BufferedSource`] reads the
//! whole body into memory first and only exists for portability. The strategy is picked
//! once at startup by [`create_byte_source`].

pub mod buffered;
pub mod factory;
pub mod forward;
mod http_client;
pub mod streaming;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod test_origins;

// Re-export commonly used types
pub use buffered::BufferedSource;
pub use factory::create_byte_source;
pub use forward::ForwardHeaders;
pub use streaming::StreamingSource;
pub use traits::{
    ByteStream, ByteStreamSource, UpstreamError, UpstreamHeaders, UpstreamResponse,
    UpstreamResult,
};
