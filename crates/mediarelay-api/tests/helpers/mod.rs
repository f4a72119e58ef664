//! Test helpers: build the router around an in-memory catalog and test origins.
//!
//! Origins are mockito servers where a canned answer is enough, and the raw listeners of
//! `mediarelay_storage::test_origins` for failure modes mockito cannot produce.

#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use mediarelay_api::setup::routes;
use mediarelay_api::state::AppState;
use mediarelay_core::{Config, MediaKind, MediaRecord};
use mediarelay_db::InMemoryMediaCatalog;
use mediarelay_storage::create_byte_source;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Config from explicit variables only; the process environment is never read.
pub fn test_config(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_vars(|key| vars.get(key).cloned()).expect("valid test config")
}

pub fn record(url: impl Into<String>, mime_type: Option<&str>) -> MediaRecord {
    record_uploaded(url, mime_type, 1)
}

pub fn record_uploaded(url: impl Into<String>, mime_type: Option<&str>, day: u32) -> MediaRecord {
    MediaRecord {
        id: Uuid::new_v4(),
        title: format!("media {}", day),
        description: None,
        url: url.into(),
        kind: mime_type
            .map(MediaKind::from_mime_type)
            .unwrap_or(MediaKind::Video),
        mime_type: mime_type.map(String::from),
        size: None,
        uploaded_at: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
        thumbnail_url: None,
    }
}

/// Build the full application router.
pub async fn build_router(records: Vec<MediaRecord>, vars: &[(&str, &str)]) -> Router {
    let config = test_config(vars);
    let catalog = InMemoryMediaCatalog::new(records).expect("unique test ids");
    let source = create_byte_source(&config).expect("byte source");
    let state = Arc::new(AppState::new(config.clone(), Arc::new(catalog), source));

    routes::setup_routes(&config, state)
        .await
        .expect("routes")
}

/// In-process test server (no sockets on the inbound side).
pub async fn setup_test_app(records: Vec<MediaRecord>, vars: &[(&str, &str)]) -> TestServer {
    TestServer::new(build_router(records, vars).await).expect("test server")
}

/// Real listener on the inbound side, for tests that need to watch the connection itself.
pub async fn spawn_app(records: Vec<MediaRecord>, vars: &[(&str, &str)]) -> String {
    let router = build_router(records, vars).await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn stream_path(id: Uuid) -> String {
    format!("/media/{}/stream", id)
}
