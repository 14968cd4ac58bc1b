//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod closing;
pub mod health;
pub mod periods;
pub mod reports;
pub mod templates;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(templates::routes())
        .merge(periods::routes())
        .merge(closing::routes())
        .merge(reports::routes())
}
