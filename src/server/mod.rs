//! HTTP surface
//!
//! ## Endpoints
//!
//! - `GET /api/corporations/search?q=` - substring search on either name
//! - `GET /api/corporations/:corp_code` - exact lookup, 404 when unknown
//! - `GET /api/corporations/stock/:stock_code` - all corporations with a stock code
//! - `GET /api/corporations/count` - row count
//! - `GET /api/corporations/health` - liveness
//! - `GET /`, `GET /search` - landing page from the static directory

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::service::CorporationService;

pub mod handlers;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CorporationService>,
}

impl AppState {
    pub fn new(service: CorporationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the router with API routes, landing page and middleware.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let index = static_dir.join("index.html");

    let api = Router::new()
        .route("/search", get(handlers::search_corporations))
        .route("/count", get(handlers::count_corporations))
        .route("/health", get(handlers::health))
        .route("/stock/:stock_code", get(handlers::get_by_stock_code))
        .route("/:corp_code", get(handlers::get_corporation));

    Router::new()
        .nest("/api/corporations", api)
        .route_service("/", ServeFile::new(&index))
        .route_service("/search", ServeFile::new(&index))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
