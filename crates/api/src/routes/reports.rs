//! Report query routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::responses::api_error;
use crate::AppState;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/api/cash-flow", get(cash_flow))
}

/// Query parameters for the cash-flow report.
#[derive(Debug, Deserialize)]
pub struct CashFlowQuery {
    /// Range start (inclusive, YYYY-MM-DD).
    pub start_date: NaiveDate,
    /// Range end (inclusive, YYYY-MM-DD).
    pub end_date: NaiveDate,
}

/// GET `/reports/api/cash-flow` - Cash-flow report for a date range.
async fn cash_flow(
    State(state): State<AppState>,
    Query(query): Query<CashFlowQuery>,
) -> impl IntoResponse {
    match state
        .ledger
        .reports()
        .generate(query.start_date, query.end_date)
    {
        Ok(report) => (StatusCode::OK, Json(json!(report))).into_response(),
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}
