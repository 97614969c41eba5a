//! # HTTP Server for Design Storage and Rendering
//!
//! Stores designs by key and serves composed layer trees and SVG previews.
//!
//! ## Usage
//!
//! ```bash
//! insignia serve --listen 127.0.0.1:8080 --design-dir ./designs
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/api/designs` | Store a new design, returns its key |
//! | GET | `/api/designs/:key` | Fetch a stored design |
//! | PUT | `/api/designs/:key` | Merge a JSON patch into a design |
//! | PUT | `/api/designs/:key/assets/:slot` | Upload image bytes into an asset slot |
//! | POST | `/api/render/layers` | Compose and return the layer tree |
//! | POST | `/api/render/svg` | Compose and render to SVG |
//! | GET | `/api/page` | Page geometry and print CSS |
//! | GET | `/api/fit` | Display scale for a container size |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::InsigniaError;

/// Slack on top of the asset limit for request framing.
const UPLOAD_OVERHEAD: u64 = 64 * 1024;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit =
        usize::try_from(state.config.engine.max_asset_bytes + UPLOAD_OVERHEAD).unwrap_or(usize::MAX);

    Router::new()
        // Design storage
        .route("/api/designs", post(handlers::designs::create))
        .route(
            "/api/designs/:key",
            get(handlers::designs::get).put(handlers::designs::patch),
        )
        .route(
            "/api/designs/:key/assets/:slot",
            put(handlers::designs::upload_asset).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Rendering
        .route("/api/render/layers", post(handlers::render::layers))
        .route("/api/render/svg", post(handlers::render::svg))
        .route("/api/page", get(handlers::render::page))
        .route("/api/fit", get(handlers::render::fit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use insignia::config::EngineConfig;
/// use insignia::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), insignia::InsigniaError> {
/// let config = ServerConfig {
///     listen_addr: "127.0.0.1:8080".to_string(),
///     design_dir: "./designs".into(),
///     engine: EngineConfig::default(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), InsigniaError> {
    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(AppState::new(config)?);

    info!(
        listen = %listen_addr,
        design_dir = %state.config.design_dir.display(),
        "insignia server starting"
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| InsigniaError::Server(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    info!("listening on http://{}/", listen_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| InsigniaError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
