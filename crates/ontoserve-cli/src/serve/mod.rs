//! Read-only HTTP API over an [`OntologyBrowser`].
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API request/response types (DTOs)
//! - `error` - error to response mapping

mod error;
mod handlers;
mod models;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use ontoserve_core::{Config, OntologyBrowser};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    pub browser: OntologyBrowser,
    /// Config file re-read by the settings reload endpoint.
    pub config_path: Option<PathBuf>,
}

// =============================================================================
// Router
// =============================================================================

/// Build the API router.
pub fn router(state: Arc<AppState>, cors: bool) -> Router {
    let app = Router::new()
        .route("/ontologies/{ontology}/classes", get(handlers::list_classes))
        .route("/ontologies/{ontology}/classes/roots", get(handlers::roots))
        .route("/ontologies/{ontology}/classes/{cls}", get(handlers::class))
        .route("/ontologies/{ontology}/classes/{cls}/tree", get(handlers::tree))
        .route(
            "/ontologies/{ontology}/classes/{cls}/ancestors",
            get(handlers::ancestors),
        )
        .route(
            "/ontologies/{ontology}/classes/{cls}/descendants",
            get(handlers::descendants),
        )
        .route(
            "/ontologies/{ontology}/classes/{cls}/children",
            get(handlers::children),
        )
        .route(
            "/ontologies/{ontology}/classes/{cls}/parents",
            get(handlers::parents),
        )
        .route(
            "/ontologies/{ontology}/submissions",
            get(handlers::submissions),
        )
        .route(
            "/ontologies/{ontology}/download",
            get(handlers::download_latest),
        )
        .route(
            "/ontologies/{ontology}/submissions/{id}/download",
            get(handlers::download_submission),
        )
        .route("/search", get(handlers::search).post(handlers::search_form))
        .route("/admin/settings/reload", post(handlers::reload_settings))
        .route("/_health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        app.layer(CorsLayer::new().allow_origin(Any))
    } else {
        app
    }
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Start the API server and run until interrupted.
pub async fn start_server(
    config: Config,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let browser = OntologyBrowser::from_config(&config).await?;
    let state = Arc::new(AppState {
        browser,
        config_path,
    });
    let app = router(state, config.server.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "listening");
    println!("ontoserve listening on http://{}", addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
