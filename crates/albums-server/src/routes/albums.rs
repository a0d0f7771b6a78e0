//! Album routes — list, fetch by id, create.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::error;

use super::IndentedJson;
use crate::state::AppState;
use albums_store::Album;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/albums", get(list_albums).post(create_album))
        .route("/albums/{id}", get(get_album))
}

/// GET /albums
async fn list_albums(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list_albums() {
        Ok(albums) => (StatusCode::OK, IndentedJson(albums)).into_response(),
        Err(e) => {
            error!("Failed to list albums: {}", e);
            server_error(e)
        }
    }
}

/// GET /albums/{id}
async fn get_album(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.store.get_album(&id) {
        Ok(Some(album)) => (StatusCode::OK, IndentedJson(album)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            IndentedJson(serde_json::json!({ "message": "album not found" })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to get album {}: {}", id, e);
            server_error(e)
        }
    }
}

/// POST /albums — echoes the stored album back.
///
/// The body is decoded as JSON regardless of the declared content type.
async fn create_album(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let album: Album = match serde_json::from_slice(&body) {
        Ok(album) => album,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                IndentedJson(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    };

    match state.store.create_album(&album) {
        Ok(()) => (StatusCode::CREATED, IndentedJson(album)).into_response(),
        Err(e) => {
            error!("Failed to create album {}: {}", album.id, e);
            server_error(e)
        }
    }
}

fn server_error(e: albums_core::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        IndentedJson(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}
