//! Shared application state.

use albums_core::AlbumsConfig;
use albums_store::SqliteStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: AlbumsConfig,
    pub store: SqliteStore,
}

impl AppState {
    pub fn new(config: AlbumsConfig, store: SqliteStore) -> Self {
        Self { config, store }
    }
}
