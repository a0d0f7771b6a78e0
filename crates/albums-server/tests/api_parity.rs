//! API parity tests — drive the router in-process and check status codes and
//! JSON bodies against the album service contract.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

use albums_core::AlbumsConfig;
use albums_server::{build_router, AppState};
use albums_store::SqliteStore;

/// Test helper: router over a fresh, seeded database in a temp dir.
fn setup_app() -> (Router, Arc<AppState>, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = AlbumsConfig {
        db_path: dir.path().join("albums.db"),
        ..AlbumsConfig::default()
    };
    let store = SqliteStore::open(&config.db_path, &config.db).unwrap();
    let state = Arc::new(AppState::new(config, store));
    (build_router(state.clone()), state, dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_list_returns_seed_albums() {
    let (app, _state, _dir) = setup_app();

    let (status, body) = send(&app, get("/albums")).await;
    assert_eq!(status, StatusCode::OK);

    let albums: Value = serde_json::from_str(&body).unwrap();
    let albums = albums.as_array().unwrap();
    assert_eq!(albums.len(), 3);

    let mut ids: Vec<&str> = albums.iter().map(|a| a["id"].as_str().unwrap()).collect();
    ids.sort();
    assert_eq!(ids, vec!["1", "2", "3"]);

    for album in albums {
        assert!(album["title"].is_string());
        assert!(album["artist"].is_string());
        assert!(album["price"].is_number());
    }
}

#[tokio::test]
async fn test_responses_are_indented_json() {
    let (app, _state, _dir) = setup_app();

    let response = app.clone().oneshot(get("/albums/1")).await.unwrap();
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/json"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("\n  \"title\": \"Blue Train\""));
}

#[tokio::test]
async fn test_create_then_fetch() {
    let (app, _state, _dir) = setup_app();
    let payload = json!({"id": "99", "title": "T", "artist": "A", "price": 9.99});

    let (status, body) = send(&app, post_json("/albums", &payload.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), payload);

    let (status, body) = send(&app, get("/albums/99")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), payload);
}

#[tokio::test]
async fn test_unknown_album_is_404() {
    let (app, _state, _dir) = setup_app();

    let (status, body) = send(&app, get("/albums/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"message": "album not found"})
    );
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let (app, state, _dir) = setup_app();

    for body in ["{not json", r#"{"id": "7", "price": "cheap"}"#, "[1, 2]", "null"] {
        let (status, response) = send(&app, post_json("/albums", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        let error: Value = serde_json::from_str(&response).unwrap();
        assert!(error["error"].is_string());
    }

    assert_eq!(state.store.count_albums().unwrap(), 3);
}

#[tokio::test]
async fn test_body_decoded_without_json_content_type() {
    let (app, state, _dir) = setup_app();
    let payload = json!({"id": "99", "title": "T", "artist": "A", "price": 9.99});

    let request = Request::builder()
        .method("POST")
        .uri("/albums")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), payload);

    let request = Request::builder()
        .method("POST")
        .uri("/albums")
        .header("Content-Type", "text/plain")
        .body(Body::from(
            json!({"id": "100", "title": "T", "artist": "A", "price": 1.5}).to_string(),
        ))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(state.store.count_albums().unwrap(), 5);
}

#[tokio::test]
async fn test_malformed_body_without_content_type_is_400() {
    let (app, _state, _dir) = setup_app();
    let request = Request::builder()
        .method("POST")
        .uri("/albums")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_create_is_500() {
    let (app, _state, _dir) = setup_app();
    let payload = json!({"id": "1", "title": "Other", "artist": "Someone", "price": 1.0});

    let (status, body) = send(&app, post_json("/albums", &payload.to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = serde_json::from_str(&body).unwrap();
    let message = error["error"].as_str().unwrap();
    assert!(message.contains("already exists"));
    assert!(message.contains("UNIQUE constraint failed"));

    let (_, body) = send(&app, get("/albums/1")).await;
    let album: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(album["title"], "Blue Train");
}

#[tokio::test]
async fn test_partial_body_defaults_missing_fields() {
    let (app, _state, _dir) = setup_app();

    let (status, body) = send(&app, post_json("/albums", r#"{"id": "50", "title": "Only Title"}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"id": "50", "title": "Only Title", "artist": "", "price": 0.0})
    );
}

#[tokio::test]
async fn test_closed_store_is_500() {
    let (app, state, _dir) = setup_app();
    state.store.close();

    let (status, body) = send(&app, get("/albums")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert!(error["error"].is_string());

    let (status, _) = send(&app, get("/albums/1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

/// Verify the Album JSON shape: { id, title, artist, price }.
#[test]
fn test_album_shape() {
    let album = albums_store::Album::new("1", "Blue Train", "John Coltrane", 56.99);
    let value = serde_json::to_value(&album).unwrap();

    assert!(value["id"].is_string());
    assert!(value["title"].is_string());
    assert!(value["artist"].is_string());
    assert!(value["price"].is_number());
    assert_eq!(value.as_object().unwrap().len(), 4);
}
