//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub catalog: CatalogHealth,
    pub upstream: UpstreamHealth,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CatalogHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpstreamHealth {
    pub strategy: String,
    pub failure_policy: String,
    pub timeout_ms: u64,
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Health check: catalog reachability plus the relay settings resolved at startup.
///
/// Origins are not probed; each media item may live on a different one.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let catalog = match tokio::time::timeout(TIMEOUT, state.catalog.count()).await {
        Ok(Ok(records)) => CatalogHealth {
            status: "healthy".to_string(),
            records: Some(records),
        },
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Catalog health check failed");
            CatalogHealth {
                status: format!("unhealthy: {}", e),
                records: None,
            }
        }
        Err(_) => {
            tracing::error!("Catalog health check timed out");
            CatalogHealth {
                status: "timeout".to_string(),
                records: None,
            }
        }
    };

    let healthy = catalog.status == "healthy";
    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        catalog,
        upstream: UpstreamHealth {
            strategy: state.upstream.source.strategy().to_string(),
            failure_policy: state.upstream.failures.policy().to_string(),
            timeout_ms: state.config.upstream_timeout_ms(),
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
