//! SQLite-backed album store.
//!
//! Connections come from an `r2d2` pool, so handlers running in parallel each
//! check out their own connection instead of queueing on a shared lock.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, ErrorCode, OptionalExtension};
use tracing::{debug, info, warn};

use crate::schema::{CONNECTION_PRAGMAS_SQL, SCHEMA_SQL};
use crate::types::Album;
use albums_core::{DbSettings, Error, Result};

type SqlitePool = Pool<SqliteConnectionManager>;
type SqliteConn = PooledConnection<SqliteConnectionManager>;

/// Album store over a pooled SQLite database file.
pub struct SqliteStore {
    /// `None` once the store has been closed.
    pool: RwLock<Option<SqlitePool>>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the database, ensure the schema exists and seed an
    /// empty table.
    ///
    /// Every error returned here is a startup failure; the caller decides
    /// whether to exit.
    pub fn open(db_path: impl AsRef<Path>, settings: &DbSettings) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        let pool = Self::create_pool(&db_path, settings)?;
        Self::ping(&pool)?;
        info!("Connected to SQLite database at {}", db_path.display());

        Self::init_schema(&pool)?;

        let store = Self {
            pool: RwLock::new(Some(pool)),
            db_path,
        };

        let count = store.count_albums().map_err(|e| Error::Seed(e.to_string()))?;
        if count == 0 {
            store.seed(&Album::seed_set());
        }

        info!(
            "SqliteStore initialized: {} albums, pool_size={}, path={}",
            store.count_albums()?,
            settings.pool_size,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_pool(db_path: &Path, settings: &DbSettings) -> Result<SqlitePool> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::Connect(e.to_string()))?;
        }

        let busy_timeout = settings.timeout();
        let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch(CONNECTION_PRAGMAS_SQL)
        });

        Pool::builder()
            .max_size(settings.pool_size)
            .connection_timeout(settings.timeout())
            .build(manager)
            .map_err(|e| Error::Connect(e.to_string()))
    }

    fn ping(pool: &SqlitePool) -> Result<()> {
        let conn = pool.get().map_err(|e| Error::Ping(e.to_string()))?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| Error::Ping(e.to_string()))?;
        Ok(())
    }

    fn init_schema(pool: &SqlitePool) -> Result<()> {
        let conn = pool.get().map_err(|e| Error::Schema(e.to_string()))?;
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Schema(e.to_string()))?;
        Ok(())
    }

    /// Insert each album, logging and skipping rows that fail.
    /// Returns how many rows were written.
    fn seed(&self, albums: &[Album]) -> usize {
        let mut inserted = 0;
        for album in albums {
            match self.create_album(album) {
                Ok(()) => inserted += 1,
                Err(e) => warn!("Failed to insert sample album {}: {}", album.id, e),
            }
        }
        info!("Sample data inserted: {} of {} albums", inserted, albums.len());
        inserted
    }

    fn conn(&self) -> Result<SqliteConn> {
        // Clone the handle so the lock is released before the checkout blocks.
        let pool = self.pool.read().clone().ok_or(Error::Closed)?;
        pool.get().map_err(|e| Error::Database(e.to_string()))
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    // ---------------------------------------------------------------
    // Album CRUD
    // ---------------------------------------------------------------

    /// All albums, in whatever order SQLite returns them.
    pub fn list_albums(&self) -> Result<Vec<Album>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare_cached("SELECT id, title, artist, price FROM albums")
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], Self::row_to_album)
            .map_err(|e| Error::Database(e.to_string()))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Get an album by ID. `Ok(None)` means no such album.
    pub fn get_album(&self, id: &str) -> Result<Option<Album>> {
        let conn = self.conn()?;
        let album = conn
            .prepare_cached("SELECT id, title, artist, price FROM albums WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![id], Self::row_to_album)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        if album.is_none() {
            debug!("Album {} not found", id);
        }
        Ok(album)
    }

    /// Insert a new album. An existing id is rejected, never overwritten.
    pub fn create_album(&self, album: &Album) -> Result<()> {
        let conn = self.conn()?;
        conn.prepare_cached("INSERT INTO albums (id, title, artist, price) VALUES (?1, ?2, ?3, ?4)")
            .map_err(|e| Error::Database(e.to_string()))?
            .execute(params![album.id, album.title, album.artist, album.price])
            .map_err(|e| {
                if is_key_violation(&e) {
                    Error::DuplicateAlbum {
                        id: album.id.clone(),
                        message: e.to_string(),
                    }
                } else {
                    Error::Database(e.to_string())
                }
            })?;
        Ok(())
    }

    /// Count stored albums.
    pub fn count_albums(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM albums", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    /// Release the pool. Safe to call more than once.
    pub fn close(&self) {
        if let Some(pool) = self.pool.write().take() {
            drop(pool);
            info!("Closed SQLite database at {}", self.db_path.display());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pool.read().is_none()
    }

    fn row_to_album(row: &rusqlite::Row<'_>) -> rusqlite::Result<Album> {
        Ok(Album {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            price: row.get(3)?,
        })
    }
}

fn is_key_violation(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => {
            err.code == ErrorCode::ConstraintViolation
                && matches!(
                    err.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                )
        }
        _ => false,
    }
}
