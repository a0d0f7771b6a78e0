//! Error types for the albums service.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to connect to database: {0}")]
    Connect(String),

    #[error("Failed to ping database: {0}")]
    Ping(String),

    #[error("Failed to create table: {0}")]
    Schema(String),

    #[error("Failed to count albums: {0}")]
    Seed(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Album already exists: id={id}: {message}")]
    DuplicateAlbum { id: String, message: String },

    #[error("Store is closed")]
    Closed,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Startup failures the process cannot recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Connect(_) | Error::Ping(_) | Error::Schema(_) | Error::Seed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
