//! Catalog and byte source initialization

use crate::state::AppState;
use anyhow::{Context, Result};
use mediarelay_core::Config;
use mediarelay_db::{InMemoryMediaCatalog, MediaCatalog};
use mediarelay_storage::create_byte_source;
use std::sync::Arc;

/// Load the catalog, resolve the byte source strategy and build the application state.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let catalog = load_catalog(config).await?;

    let source = create_byte_source(config).context("Failed to create upstream byte source")?;

    tracing::info!(
        failure_policy = %config.failure_policy(),
        body_strategy = %source.strategy(),
        upstream_timeout_ms = config.upstream_timeout_ms(),
        "Relay initialized"
    );

    Ok(Arc::new(AppState::new(config.clone(), catalog, source)))
}

async fn load_catalog(config: &Config) -> Result<Arc<dyn MediaCatalog>> {
    match config.catalog_path() {
        Some(path) => {
            let catalog = InMemoryMediaCatalog::from_json_file(path)
                .await
                .with_context(|| format!("Failed to load media catalog from {}", path))?;
            Ok(Arc::new(catalog))
        }
        None => {
            tracing::warn!("MEDIA_CATALOG_PATH not set, serving an empty catalog");
            Ok(Arc::new(InMemoryMediaCatalog::empty()))
        }
    }
}
