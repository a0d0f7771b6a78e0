//! Albums Core — error taxonomy and runtime configuration.

pub mod config;
pub mod error;

pub use config::{AlbumsConfig, DbSettings};
pub use error::{Error, Result};
