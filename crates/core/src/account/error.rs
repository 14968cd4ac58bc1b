//! Account registry error types.

use thiserror::Error;

use super::types::AccountCode;

/// Errors that can occur during account registry operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// An account with this code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(AccountCode),

    /// Account not found (unknown code, or account inactive).
    #[error("Account not found: {0}")]
    AccountNotFound(AccountCode),

    /// Referenced parent account does not exist.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountCode),

    /// Referenced parent account is inactive.
    #[error("Parent account {0} is inactive")]
    ParentInactive(AccountCode),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::ParentInactive(_) => "PARENT_INACTIVE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateCode(_) => 409,
            Self::AccountNotFound(_) => 404,
            Self::ParentNotFound(_) | Self::ParentInactive(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AccountError::DuplicateCode(AccountCode::new("1000")).error_code(),
            "DUPLICATE_CODE"
        );
        assert_eq!(
            AccountError::AccountNotFound(AccountCode::new("9999")).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            AccountError::DuplicateCode(AccountCode::new("1000")).http_status_code(),
            409
        );
        assert_eq!(
            AccountError::AccountNotFound(AccountCode::new("9999")).http_status_code(),
            404
        );
        assert_eq!(
            AccountError::ParentNotFound(AccountCode::new("9999")).http_status_code(),
            400
        );
    }

    #[test]
    fn test_error_display() {
        let err = AccountError::DuplicateCode(AccountCode::new("1000"));
        assert_eq!(err.to_string(), "Account code '1000' already exists");
    }
}
