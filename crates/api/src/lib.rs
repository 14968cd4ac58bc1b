//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the ledger core
//! - Request extractors
//! - Response types

pub mod extractors;
pub mod responses;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use balans_core::Ledger;
use balans_shared::config::LedgerConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The wired ledger core.
    pub ledger: Arc<Ledger>,
    /// Ledger policy configuration (retained-earnings designation).
    pub config: Arc<LedgerConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
