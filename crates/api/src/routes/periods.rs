//! Fiscal period management routes (administrative).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::extractors::Actor;
use crate::responses::api_error;
use crate::AppState;

/// Creates the period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/periods/api", post(open_period))
        .route("/periods/api/{year}", get(list_year))
        .route("/periods/api/{year}/{month}/close-month", post(close_month))
        .route("/periods/api/{year}/{month}/file-tax", post(file_tax))
        .route("/periods/api/{year}/{month}/reopen", post(reopen))
}

/// Request body for opening a period.
#[derive(Debug, Deserialize)]
pub struct OpenPeriodRequest {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1..=12.
    pub month: u32,
}

/// POST `/periods/api` - Open a fiscal period.
async fn open_period(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<OpenPeriodRequest>,
) -> impl IntoResponse {
    match state
        .ledger
        .periods()
        .open(payload.year, payload.month, &actor.0)
    {
        Ok(period) => {
            info!(period = %period.code, "fiscal period opened via API");
            (StatusCode::CREATED, Json(json!(period))).into_response()
        }
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}

/// GET `/periods/api/{year}` - List the year's periods.
async fn list_year(State(state): State<AppState>, Path(year): Path<i32>) -> impl IntoResponse {
    let periods = state.ledger.periods().list_year(year);
    (StatusCode::OK, Json(json!({ "periods": periods }))).into_response()
}

/// POST `/periods/api/{year}/{month}/close-month` - Close the month.
async fn close_month(
    State(state): State<AppState>,
    actor: Actor,
    Path((year, month)): Path<(i32, u32)>,
) -> impl IntoResponse {
    match state.ledger.periods().close_month(year, month, &actor.0) {
        Ok(period) => (StatusCode::OK, Json(json!(period))).into_response(),
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}

/// POST `/periods/api/{year}/{month}/file-tax` - Mark tax filed.
async fn file_tax(
    State(state): State<AppState>,
    actor: Actor,
    Path((year, month)): Path<(i32, u32)>,
) -> impl IntoResponse {
    match state.ledger.periods().file_tax(year, month, &actor.0) {
        Ok(period) => (StatusCode::OK, Json(json!(period))).into_response(),
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}

/// POST `/periods/api/{year}/{month}/reopen` - Reopen a closed month.
async fn reopen(
    State(state): State<AppState>,
    actor: Actor,
    Path((year, month)): Path<(i32, u32)>,
) -> impl IntoResponse {
    match state.ledger.periods().reopen(year, month, &actor.0) {
        Ok(period) => (StatusCode::OK, Json(json!(period))).into_response(),
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}
