//! Runtime configuration read from the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8181;
pub const DEFAULT_DB_PATH: &str = "./albums.db";

/// Connection pool settings for the SQLite store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DbSettings {
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// Pool checkout timeout, also used as the SQLite busy timeout.
    pub timeout_secs: u64,
}

impl DbSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            pool_size: 8,
            timeout_secs: 5,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumsConfig {
    /// Host the HTTP listener binds to.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// SQLite database file.
    pub db_path: PathBuf,
    pub db: DbSettings,
}

impl Default for AlbumsConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            db: DbSettings::default(),
        }
    }
}

impl AlbumsConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("ALBUMS_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);
        let db_path = lookup("ALBUMS_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let pool_size = parse_var(&lookup, "ALBUMS_DB_POOL_SIZE")?.unwrap_or(defaults.db.pool_size);
        if pool_size == 0 {
            return Err(Error::Config(
                "ALBUMS_DB_POOL_SIZE must be at least 1".to_string(),
            ));
        }
        let timeout_secs =
            parse_var(&lookup, "ALBUMS_DB_TIMEOUT_SECS")?.unwrap_or(defaults.db.timeout_secs);

        Ok(Self {
            host,
            port,
            db_path,
            db: DbSettings {
                pool_size,
                timeout_secs,
            },
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid {}={:?}: {}", key, raw, e))),
        None => Ok(None),
    }
}
