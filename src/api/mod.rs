//! REST API over the recommendation engine.
//!
//! Routes:
//! - `POST /recommend` runs the engine for a set of quiz answers
//! - `GET /catalog` lists the loaded catalog and where it came from
//! - `GET /assumptions` returns the active assumption set

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::catalog::LoadedCatalog;
use crate::engine::RecommendationEngine;
use crate::irradiance::IrradianceProvider;

pub use types::{CatalogResponse, ErrorResponse, RecommendRequest};

/// Immutable application state shared across all request handlers.
///
/// Built once at startup and wrapped in `Arc`; handlers only read it.
pub struct AppState {
    pub engine: RecommendationEngine,
    pub catalog: LoadedCatalog,
    /// Consulted when a request carries no irradiance payload.
    pub irradiance: Box<dyn IrradianceProvider + Send + Sync>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recommend", post(handlers::recommend))
        .route("/catalog", get(handlers::get_catalog))
        .route("/assumptions", get(handlers::get_assumptions))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
