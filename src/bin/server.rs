//! Stayfinder API server
//!
//! Serves the destination and hotel catalogue over HTTP, backed by SQLite.
//!
//! # Configuration
//!
//! Environment variables (override the config file):
//! - `STAYFINDER_PORT`: Port to listen on (default: 5000)
//! - `STAYFINDER_DATABASE_PATH`: SQLite file (default: ~/.local/share/stayfinder/stayfinder.db)
//! - `STAYFINDER_CORS_ORIGINS`: Comma-separated browser origins
//! - `STAYFINDER_CONFIG`: Path to config file (default: ~/.config/stayfinder/config.yaml)
//!
//! # Config File Format
//!
//! ```yaml
//! port: 5000
//! database_path: /var/lib/stayfinder/stayfinder.db
//! cors_origins:
//!   - http://localhost:3000
//! ```
//!
//! Log output is controlled with `RUST_LOG`.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stayfinder::config::Config;
use stayfinder::db::init_db;
use stayfinder::server::{cors_layer, router, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stayfinder=info,stayfinder_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None)?;

    tracing::info!("Database: {}", config.database_path.display());
    let pool = init_db(&config.database_path).await?;

    let app = router(AppState::new(pool)).layer(cors_layer(&config.cors_origins));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
