//! Integration tests for the catalog, health and documentation routes.

mod helpers;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use helpers::{record, record_uploaded, setup_test_app};
use std::io::Write;
use uuid::Uuid;

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

#[tokio::test]
async fn test_list_media_newest_first() {
    let older = record_uploaded("https://cdn.example.com/old.mp4", Some("video/mp4"), 1);
    let newer = record_uploaded("https://cdn.example.com/new.png", Some("image/png"), 20);
    let (older_id, newer_id) = (older.id, newer.id);
    let server = setup_test_app(vec![older, newer], &[]).await;

    let response = server.get("/media").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], newer_id.to_string());
    assert_eq!(items[0]["type"], "image");
    assert_eq!(items[0]["mimeType"], "image/png");
    assert_eq!(items[1]["id"], older_id.to_string());
    assert!(items[1]["uploadedAt"].is_string());
}

#[tokio::test]
async fn test_get_media_by_id() {
    let media = record("https://cdn.example.com/clip.mp4", Some("video/mp4"));
    let id = media.id;
    let server = setup_test_app(vec![media], &[]).await;

    let response = server.get(&format!("/media/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["url"], "https://cdn.example.com/clip.mp4");
    assert_eq!(body["type"], "video");

    let response = server.get(&format!("/media/{}", Uuid::new_v4())).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Media not found");
    assert_eq!(body["code"], "NOT_FOUND");

    let response = server.get("/media/12345").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_loaded_from_file_is_served() {
    let media = record("https://cdn.example.com/clip.mp4", Some("video/mp4"));
    let id = media.id;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&vec![media]).unwrap().as_bytes())
        .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let config = helpers::test_config(&[("MEDIA_CATALOG_PATH", path.as_str())]);
    let state = mediarelay_api::setup::services::initialize_services(&config)
        .await
        .unwrap();
    let router = mediarelay_api::setup::routes::setup_routes(&config, state)
        .await
        .unwrap();
    let server = axum_test::TestServer::new(router).unwrap();

    let response = server.get(&format!("/media/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_liveness() {
    let media = record("https://cdn.example.com/clip.mp4", Some("video/mp4"));
    let server = setup_test_app(
        vec![media],
        &[
            ("STREAM_FAILURE_POLICY", "bad_gateway"),
            ("UPSTREAM_TIMEOUT_MS", "1500"),
        ],
    )
    .await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["catalog"]["records"], 1);
    assert_eq!(body["upstream"]["strategy"], "streaming");
    assert_eq!(body["upstream"]["failurePolicy"], "bad_gateway");
    assert_eq!(body["upstream"]["timeoutMs"], 1500);

    let response = server.get("/live").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let server = setup_test_app(vec![], &[]).await;

    let response = server.get("/api/openapi.json").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/media/{id}/stream"].is_object());
    assert!(body["components"]["schemas"]["MediaRecord"].is_object());

    let response = server.get("/docs").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = setup_test_app(vec![], &[]).await;

    let response = server
        .get("/media")
        .add_header(X_REQUEST_ID, HeaderValue::from_static("req-42"))
        .await;
    assert_eq!(response.header(X_REQUEST_ID), "req-42");

    let response = server.get("/live").await;
    assert!(response.maybe_header(X_REQUEST_ID).is_some());
}
