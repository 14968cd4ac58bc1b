//! Fiscal year closing routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;

use balans_core::account::AccountCode;

use crate::extractors::Actor;
use crate::responses::api_error;
use crate::AppState;

/// Creates the closing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/closing/api/{year}", get(closing_status))
        .route("/closing/api/{year}/preview", get(preview_closing))
        .route("/closing/api/{year}", post(execute_closing))
}

/// GET `/closing/api/{year}` - The year's closing record.
async fn closing_status(State(state): State<AppState>, Path(year): Path<i32>) -> impl IntoResponse {
    let record = state.ledger.closing().status(year);
    (StatusCode::OK, Json(json!(record))).into_response()
}

/// GET `/closing/api/{year}/preview` - Net income and the entry that would
/// be posted, persisting nothing.
async fn preview_closing(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    let retained_earnings = AccountCode::new(state.config.retained_earnings_code.as_str());
    match state.ledger.closing().preview_year(year, &retained_earnings) {
        Ok(preview) => (StatusCode::OK, Json(json!(preview))).into_response(),
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}

/// POST `/closing/api/{year}` - Execute the year closing.
async fn execute_closing(
    State(state): State<AppState>,
    actor: Actor,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    let retained_earnings = AccountCode::new(state.config.retained_earnings_code.as_str());
    match state
        .ledger
        .closing()
        .close_year(year, &retained_earnings, &actor.0)
    {
        Ok(record) => {
            info!(year, "fiscal year closed via API");
            (StatusCode::CREATED, Json(json!(record))).into_response()
        }
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}
