//! Application state.
//!
//! Everything here is built once at startup and shared read-only by every request.
//! Nothing is mutated per request, so concurrent streams never see each other's data.

use crate::relay::FailureResponder;
use mediarelay_core::Config;
use mediarelay_db::MediaCatalog;
use mediarelay_storage::ByteStreamSource;
use std::sync::Arc;

/// Upstream leg: the byte source strategy and the failure policy, both fixed at startup.
#[derive(Clone)]
pub struct UpstreamState {
    pub source: Arc<dyn ByteStreamSource>,
    pub failures: FailureResponder,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<dyn MediaCatalog>,
    pub upstream: UpstreamState,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn MediaCatalog>,
        source: Arc<dyn ByteStreamSource>,
    ) -> Self {
        let failures = FailureResponder::new(
            config.failure_policy(),
            config.error_detail_max_chars(),
            config.upstream_timeout(),
        );

        Self {
            config,
            catalog,
            upstream: UpstreamState { source, failures },
        }
    }
}
