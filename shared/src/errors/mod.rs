//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message (localized)
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Machine readable error codes returned in `ErrorResponse::error`
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const CONFLICT: &str = "conflict";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const OPERATION_FAILED: &str = "operation_failed";
    pub const INVALID_CREDENTIALS: &str = "invalid_credentials";
    pub const ACCOUNT_UNVERIFIED: &str = "account_unverified";
    pub const EMAIL_ALREADY_REGISTERED: &str = "email_already_registered";
    pub const DUPLICATE_PENDING_REQUEST: &str = "duplicate_pending_request";
    pub const INVALID_OR_EXPIRED_CODE: &str = "invalid_or_expired_code";
    pub const CORRUPT_PENDING_STATE: &str = "corrupt_pending_state";
    pub const VERIFICATION_EMAIL_FAILED: &str = "verification_email_failed";
    pub const INSUFFICIENT_PERMISSIONS: &str = "insufficient_permissions";
    pub const TOKEN_EXPIRED: &str = "token_expired";
    pub const TOKEN_INVALID: &str = "token_invalid";
    pub const TOKEN_REVOKED: &str = "token_revoked";
    pub const INVALID_REFRESH_TOKEN: &str = "invalid_refresh_token";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_details_are_skipped_when_empty() {
        let body = serde_json::to_value(ErrorResponse::new("not_found", "Missing")).unwrap();
        assert!(body.get("details").is_none());
        assert_eq!(body["error"], "not_found");
    }

    #[test]
    fn test_add_detail() {
        let response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid input")
            .add_detail("field", "email");
        let details = response.details.unwrap();
        assert_eq!(details["field"], "email");
    }
}
