//! Database schema SQL and the fixed seed catalogue.

/// The single `albums` table.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS albums (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    artist TEXT NOT NULL,
    price REAL NOT NULL
);
"#;

/// Per-connection pragmas applied when the pool opens a connection.
pub const CONNECTION_PRAGMAS_SQL: &str = "PRAGMA journal_mode = WAL;
     PRAGMA synchronous = NORMAL;";

/// Rows inserted when the table starts out empty: (id, title, artist, price).
pub const SEED_ALBUMS: [(&str, &str, &str, f64); 3] = [
    ("1", "Blue Train", "John Coltrane", 56.99),
    ("2", "Jeru", "Gerry Mulligan", 17.99),
    ("3", "Sarah Vaughan and Clifford Brown", "Sarah Vaughan", 39.99),
];
