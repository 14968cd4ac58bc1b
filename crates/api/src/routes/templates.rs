//! Transaction template routes.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use balans_core::account::AccountCode;
use balans_core::template::CreateTemplateInput;

use crate::responses::api_error;
use crate::AppState;

/// Creates the template routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/templates/api", get(list_templates))
        .route("/templates/api", post(create_template))
}

/// Request body for creating a template.
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    /// Display name.
    pub name: String,
    /// Account code debited on expansion.
    pub debit_account: String,
    /// Account code credited on expansion.
    pub credit_account: String,
    /// Default entry description.
    pub description: String,
}

/// GET `/templates/api` - List templates.
async fn list_templates(State(state): State<AppState>) -> impl IntoResponse {
    let templates = state.ledger.templates().list();
    (StatusCode::OK, Json(json!({ "templates": templates }))).into_response()
}

/// POST `/templates/api` - Create a template.
///
/// The referenced accounts must exist and accept postings; checking here
/// keeps a bad template from failing every posting later.
async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<CreateTemplateRequest>,
) -> impl IntoResponse {
    for code in [&payload.debit_account, &payload.credit_account] {
        match state.ledger.accounts().lookup(&AccountCode::new(code.as_str())) {
            Ok(account) if account.is_header => {
                return api_error(
                    400,
                    "HEADER_ACCOUNT_POSTING",
                    format!("Account {code} is a header account and cannot receive postings"),
                );
            }
            Ok(_) => {}
            Err(e) => return api_error(e.http_status_code(), e.error_code(), e.to_string()),
        }
    }

    let template = state.ledger.templates().create(CreateTemplateInput {
        name: payload.name,
        debit_account: AccountCode::new(payload.debit_account),
        credit_account: AccountCode::new(payload.credit_account),
        description: payload.description,
    });
    info!(template_id = %template.id, "template created via API");
    (StatusCode::CREATED, Json(json!(template))).into_response()
}
