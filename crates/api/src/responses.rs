//! Response helpers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Renders an error as the standard `{"error", "message"}` payload.
pub fn api_error(status: u16, code: &str, message: impl Into<String>) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into()
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let response = api_error(409, "DUPLICATE_CODE", "Account code '1000' already exists");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_bad_status_falls_back_to_500() {
        let response = api_error(99, "WEIRD", "out of range");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
