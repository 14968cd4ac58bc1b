//! Account management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use balans_core::account::{
    Account, AccountCode, AccountSubtype, AccountType, CreateAccountInput, NormalBalance,
};

use crate::extractors::Actor;
use crate::responses::api_error;
use crate::AppState;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/api", get(list_accounts))
        .route("/accounts/api", post(create_account))
        .route("/accounts/api/{code}", get(get_account))
        .route("/accounts/api/{code}", delete(deactivate_account))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Filter by active status; defaults to active only.
    pub active: Option<bool>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code (must be unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Normal balance side: debit or credit.
    pub normal_balance: String,
    /// Whether this is a header (grouping-only) account.
    #[serde(default)]
    pub is_header: bool,
    /// Parent account code for hierarchical structure.
    pub parent: Option<String>,
    /// Reporting subtype (e.g. cash, bank, retained_earnings).
    pub subtype: Option<String>,
    /// Whether the account starts active (default: true).
    pub active: Option<bool>,
}

/// GET `/accounts/api` - List accounts.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    let type_filter = match &query.account_type {
        Some(t) => match string_to_account_type(t) {
            Some(parsed) => Some(parsed),
            None => {
                return api_error(
                    400,
                    "INVALID_ACCOUNT_TYPE",
                    "Invalid account type. Must be one of: asset, liability, equity, revenue, expense",
                );
            }
        },
        None => None,
    };

    let include_inactive = query.active == Some(false) || query.active.is_none();
    let accounts: Vec<Account> = state
        .ledger
        .accounts()
        .list(include_inactive)
        .into_iter()
        .filter(|a| type_filter.is_none_or(|t| a.account_type == t))
        .filter(|a| query.active.is_none_or(|wanted| a.active == wanted))
        .collect();

    (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
}

/// POST `/accounts/api` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let Some(account_type) = string_to_account_type(&payload.account_type) else {
        return api_error(
            400,
            "INVALID_ACCOUNT_TYPE",
            "Invalid account type. Must be one of: asset, liability, equity, revenue, expense",
        );
    };

    let Some(normal_balance) = string_to_normal_balance(&payload.normal_balance) else {
        return api_error(
            400,
            "INVALID_NORMAL_BALANCE",
            "Invalid normal balance. Must be debit or credit",
        );
    };

    let subtype = match &payload.subtype {
        Some(s) => match string_to_subtype(s) {
            Some(parsed) => Some(parsed),
            None => {
                return api_error(400, "INVALID_SUBTYPE", format!("Unknown subtype: {s}"));
            }
        },
        None => None,
    };

    let input = CreateAccountInput {
        code: AccountCode::new(payload.code),
        name: payload.name,
        account_type,
        normal_balance,
        is_header: payload.is_header,
        parent: payload.parent.map(AccountCode::new),
        subtype,
    };

    match state.ledger.accounts().create(input, &actor.0) {
        Ok(mut account) => {
            // The payload may ask for a pre-deactivated account.
            if payload.active == Some(false) {
                match state.ledger.accounts().deactivate(&account.code, &actor.0) {
                    Ok(deactivated) => account = deactivated,
                    Err(e) => return api_error(e.http_status_code(), e.error_code(), e.to_string()),
                }
            }
            info!(code = %account.code, "account created via API");
            (StatusCode::CREATED, Json(json!(account))).into_response()
        }
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}

/// GET `/accounts/api/{code}` - Get one account, inactive included.
async fn get_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    match state.ledger.accounts().lookup_any(&AccountCode::new(code)) {
        Ok(account) => (StatusCode::OK, Json(json!(account))).into_response(),
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}

/// DELETE `/accounts/api/{code}` - Deactivate (soft delete) an account.
async fn deactivate_account(
    State(state): State<AppState>,
    actor: Actor,
    Path(code): Path<String>,
) -> impl IntoResponse {
    match state
        .ledger
        .accounts()
        .deactivate(&AccountCode::new(code), &actor.0)
    {
        Ok(account) => {
            info!(code = %account.code, "account deactivated via API");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e) => api_error(e.http_status_code(), e.error_code(), e.to_string()),
    }
}

// Helper functions

fn string_to_account_type(s: &str) -> Option<AccountType> {
    match s.to_lowercase().as_str() {
        "asset" => Some(AccountType::Asset),
        "liability" => Some(AccountType::Liability),
        "equity" => Some(AccountType::Equity),
        "revenue" => Some(AccountType::Revenue),
        "expense" => Some(AccountType::Expense),
        _ => None,
    }
}

fn string_to_normal_balance(s: &str) -> Option<NormalBalance> {
    match s.to_lowercase().as_str() {
        "debit" => Some(NormalBalance::Debit),
        "credit" => Some(NormalBalance::Credit),
        _ => None,
    }
}

fn string_to_subtype(s: &str) -> Option<AccountSubtype> {
    match s.to_lowercase().as_str() {
        "cash" => Some(AccountSubtype::Cash),
        "bank" => Some(AccountSubtype::Bank),
        "accounts_receivable" => Some(AccountSubtype::AccountsReceivable),
        "inventory" => Some(AccountSubtype::Inventory),
        "fixed_asset" => Some(AccountSubtype::FixedAsset),
        "accounts_payable" => Some(AccountSubtype::AccountsPayable),
        "short_term_debt" => Some(AccountSubtype::ShortTermDebt),
        "long_term_debt" => Some(AccountSubtype::LongTermDebt),
        "owner_equity" => Some(AccountSubtype::OwnerEquity),
        "retained_earnings" => Some(AccountSubtype::RetainedEarnings),
        "operating_revenue" => Some(AccountSubtype::OperatingRevenue),
        "other_revenue" => Some(AccountSubtype::OtherRevenue),
        "operating_expense" => Some(AccountSubtype::OperatingExpense),
        "other_expense" => Some(AccountSubtype::OtherExpense),
        _ => None,
    }
}
