//! Route configuration and setup.

mod health;

use crate::api_doc::get_openapi_spec;
use crate::handlers::{media_get, media_stream};
use crate::state::AppState;
use axum::{
    http::{
        header::{
            ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, IF_RANGE, RANGE,
        },
        HeaderValue, Method,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use mediarelay_core::Config;
use mediarelay_infra::{
    request_id_middleware, security_headers_middleware, SecurityHeadersConfig,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let security_headers_config = SecurityHeadersConfig {
        hsts: config.is_production(),
    };

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    // No request timeout layer: only the upstream leg is time-bounded, a long
    // video relay is expected to outlive any fixed deadline.
    let app = media_routes()
        .merge(health_routes())
        .route("/api/openapi.json", get(openapi_json))
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

fn media_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/media", get(media_get::list_media))
        .route("/media/{id}", get(media_get::get_media))
        .route("/media/{id}/stream", get(media_stream::stream_media))
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
}

async fn openapi_json() -> impl IntoResponse {
    Json(get_openapi_spec())
}

/// Range requests come from browsers' media elements on other origins, so the range
/// headers must be both accepted and readable cross-origin.
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let exposed = [ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG];
    let methods = [Method::GET, Method::HEAD, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
            .expose_headers(exposed)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([RANGE, IF_RANGE, CONTENT_TYPE])
            .expose_headers(exposed)
    };
    Ok(cors)
}
