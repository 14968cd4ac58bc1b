//! Journal posting routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use balans_core::account::AccountCode;
use balans_core::ledger::{JournalLine, PostEntryInput};
use balans_shared::types::{JournalEntryId, Money, TemplateId};

use crate::extractors::Actor;
use crate::responses::api_error;
use crate::AppState;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/api", post(post_transaction))
        .route("/transactions/api/{id}", get(get_transaction))
        .route("/transactions/api/{id}/reverse", post(reverse_transaction))
}

/// One line of a posting request.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// Account code.
    pub account: String,
    /// Debit amount in minor units.
    #[serde(default)]
    pub debit: i64,
    /// Credit amount in minor units.
    #[serde(default)]
    pub credit: i64,
}

/// Request body for posting a journal entry.
///
/// Carries either explicit `lines`, or a `template_id` plus `amount` which
/// expands to the template's debit/credit pair.
#[derive(Debug, Deserialize)]
pub struct PostTransactionRequest {
    /// Transaction date (YYYY-MM-DD); the owning period is derived from it.
    pub transaction_date: NaiveDate,
    /// Entry description. Defaults to the template's description when
    /// posting by template.
    pub description: Option<String>,
    /// Optional external reference number.
    pub reference_number: Option<String>,
    /// Template to expand.
    pub template_id: Option<TemplateId>,
    /// Amount for template expansion, in minor units.
    pub amount: Option<i64>,
    /// Explicit entry lines.
    pub lines: Option<Vec<LineRequest>>,
}

/// Request body for reversing an entry.
#[derive(Debug, Deserialize)]
pub struct ReverseRequest {
    /// Date of the reversing entry; must fall in an open period.
    pub transaction_date: NaiveDate,
}

/// POST `/transactions/api` - Post a journal entry.
async fn post_transaction(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<PostTransactionRequest>,
) -> impl IntoResponse {
    let (lines, description) = match (&payload.template_id, &payload.lines) {
        (Some(_), Some(_)) => {
            return api_error(
                400,
                "VALIDATION_ERROR",
                "Provide either template_id or lines, not both",
            );
        }
        (Some(template_id), None) => {
            let Some(amount) = payload.amount else {
                return api_error(
                    400,
                    "VALIDATION_ERROR",
                    "amount is required when posting by template",
                );
            };
            let template = match state.ledger.templates().lookup(*template_id) {
                Ok(t) => t,
                Err(e) => return api_error(e.http_status_code(), e.error_code(), e.to_string()),
            };
            let description = payload
                .description
                .clone()
                .unwrap_or_else(|| template.description.clone());
            (template.lines(Money::from_minor(amount)), description)
        }
        (None, Some(lines)) => {
            let lines = lines
                .iter()
                .map(|l| JournalLine {
                    account: AccountCode::new(l.account.as_str()),
                    debit: Money::from_minor(l.debit),
                    credit: Money::from_minor(l.credit),
                })
                .collect();
            let Some(description) = payload.description.clone() else {
                return api_error(400, "VALIDATION_ERROR", "description is required");
            };
            (lines, description)
        }
        (None, None) => {
            return api_error(
                400,
                "VALIDATION_ERROR",
                "Either template_id or lines is required",
            );
        }
    };

    let input = PostEntryInput {
        transaction_date: payload.transaction_date,
        description,
        reference_number: payload.reference_number,
        lines,
        posted_by: actor.0,
    };

    match state.ledger.journal().post(input) {
        Ok(entry) => {
            info!(entry_id = %entry.id, period = %entry.period, "entry posted via API");
            (StatusCode::CREATED, Json(json!(entry))).into_response()
        }
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}

/// GET `/transactions/api/{id}` - Fetch one entry.
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<JournalEntryId>,
) -> impl IntoResponse {
    match state.ledger.journal().entry(id) {
        Some(entry) => (StatusCode::OK, Json(json!(entry))).into_response(),
        None => api_error(404, "ENTRY_NOT_FOUND", format!("Journal entry not found: {id}")),
    }
}

/// POST `/transactions/api/{id}/reverse` - Reverse a posted entry.
async fn reverse_transaction(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<JournalEntryId>,
    Json(payload): Json<ReverseRequest>,
) -> impl IntoResponse {
    match state
        .ledger
        .journal()
        .reverse(id, payload.transaction_date, &actor.0)
    {
        Ok(entry) => {
            info!(original = %id, reversing = %entry.id, "entry reversed via API");
            (StatusCode::CREATED, Json(json!(entry))).into_response()
        }
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}
