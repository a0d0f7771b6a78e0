//! Albums — HTTP catalogue service over an embedded SQLite store.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use albums_core::AlbumsConfig;
use albums_server::{build_router, AppState};
use albums_store::SqliteStore;

fn print_help() {
    println!("Albums — album catalogue HTTP service");
    println!();
    println!("Usage: albums [command]");
    println!();
    println!("Commands:");
    println!("  (none)    Start the server");
    println!("  help      Show this help message");
    println!();
    println!("Environment:");
    println!("  ALBUMS_HOST             bind host (default localhost)");
    println!("  PORT                    bind port (default 8181)");
    println!("  ALBUMS_DB_PATH          database file (default ./albums.db)");
    println!("  ALBUMS_DB_POOL_SIZE     pooled connections (default 8)");
    println!("  ALBUMS_DB_TIMEOUT_SECS  pool and busy timeout (default 5)");
    println!("  RUST_LOG                log filter (default info)");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'albums help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = AlbumsConfig::from_env()?;

    // Startup failures end the process here.
    let store = match SqliteStore::open(&config.db_path, &config.db) {
        Ok(store) => store,
        Err(e) => {
            if e.is_fatal() {
                error!("Fatal startup failure: {}", e);
            }
            return Err(anyhow::anyhow!("Failed to open store: {}", e));
        }
    };
    info!("Database path: {}", store.path().display());

    let state = Arc::new(AppState::new(config, store));
    let app = build_router(state.clone());

    let addr = state.config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            state.store.close();
            return Err(e.into());
        }
    };
    info!("Starting server on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.store.close();
    served?;

    Ok(())
}
