//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use mediarelay_core::{BodyStrategy, Config};

/// Validate critical configuration values
///
/// Fails on values that would make the relay misbehave at request time instead of
/// letting the first stream request discover them.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.upstream_timeout_ms() == 0 {
        return Err(anyhow::anyhow!(
            "UPSTREAM_TIMEOUT_MS must be greater than 0"
        ));
    }

    if config.upstream_timeout_ms() > 60_000 {
        tracing::warn!(
            upstream_timeout_ms = config.upstream_timeout_ms(),
            "UPSTREAM_TIMEOUT_MS is very high - clients will wait that long before any fallback"
        );
    }

    if config.body_strategy() == BodyStrategy::Buffered {
        if config.buffered_body_max_bytes() == 0 {
            return Err(anyhow::anyhow!(
                "BUFFERED_BODY_MAX_MB must be greater than 0 with the buffered strategy"
            ));
        }
        tracing::warn!(
            "UPSTREAM_BODY_STRATEGY=buffered holds every relayed body in memory - use only where streaming is unavailable"
        );
    }

    if let Some(path) = config.catalog_path() {
        if !std::path::Path::new(path).is_file() {
            return Err(anyhow::anyhow!(
                "MEDIA_CATALOG_PATH does not point to a file: {}",
                path
            ));
        }
    }

    Ok(())
}
