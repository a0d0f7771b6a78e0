//! Albums Store — SQLite persistence for the album catalogue.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::*;
