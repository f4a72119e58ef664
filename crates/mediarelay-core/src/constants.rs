//! Values shared across crates that are not configurable.

/// Content type used when neither the origin nor the catalog knows better.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Range unit advertised on every relayed response.
pub const ACCEPT_RANGES_BYTES: &str = "bytes";

/// Default upstream connect + response-header timeout.
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 8000;

/// Default truncation applied to upstream error text in 502 bodies.
pub const DEFAULT_ERROR_DETAIL_MAX_CHARS: usize = 500;
