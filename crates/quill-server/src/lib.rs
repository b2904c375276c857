//! HTTP API server for the quill blog engine.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - Post CRUD endpoints (list, create, fetch by slug, update, delete)
//! - Comment endpoints (create, delete)
//! - A live-preview endpoint for the authoring surface
//!
//! Post content is stored as markdown and rendered with `quill-renderer`
//! immediately before it is handed to the display surface; clients inject
//! the returned `contentHtml` directly.
//!
//! # Quick Start
//!
//! ```ignore
//! use quill_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 4040,
//!         database: "quill.db".to_string(),
//!         blog_title: "My Blog".to_string(),
//!         blog_description: None,
//!         version: "1.0.0".to_string(),
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► Rust axum server (quill-server)
//!                        │
//!                        ├─► Post/comment routes ──► Store (SQLite via sqlx)
//!                        │
//!                        └─► Render on read ──► quill-renderer
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use quill_store::Store;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// SQLite database path (`:memory:` for in-memory).
    pub database: String,
    /// Blog title shown to readers.
    pub blog_title: String,
    /// Optional blog description.
    pub blog_description: Option<String>,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4040,
            database: "quill.db".to_string(),
            blog_title: "My Blog".to_string(),
            blog_description: None,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the server fails to
/// start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::connect(&config.database).await?;

    let state = Arc::new(AppState {
        store,
        blog_title: config.blog_title.clone(),
        blog_description: config.blog_description.clone(),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from quill config.
///
/// # Arguments
///
/// * `config` - quill configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &quill_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        database: config.database.path.clone(),
        blog_title: config.blog.title.clone(),
        blog_description: config.blog.description.clone(),
        version,
    }
}
