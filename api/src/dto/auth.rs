use serde::{Deserialize, Serialize};
use validator::Validate;

use mp_core::domain::entities::{AccountKind, AccountView};
use mp_core::domain::value_objects::PendingReceipt;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterClientRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(max = 120))]
    pub name: String,

    #[validate(length(max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterCompanyRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(max = 120))]
    pub name: String,

    #[validate(length(max = 128))]
    pub password: String,

    /// Reference to an already uploaded logo
    #[validate(length(max = 512))]
    pub logo: Option<String>,
}

/// Acknowledgement of a parked registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub email: String,
    pub kind: AccountKind,
    /// Seconds the emailed code stays valid
    pub expires_in: i64,
}

impl RegisterResponse {
    pub fn new(message: impl Into<String>, receipt: PendingReceipt) -> Self {
        Self {
            message: message.into(),
            email: receipt.email,
            kind: receipt.kind,
            expires_in: receipt.expires_in_seconds,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 1, max = 255))]
    pub email: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,

    pub kind: AccountKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeResponse {
    pub message: String,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendCodeRequest {
    #[validate(length(min = 1, max = 255))]
    pub email: String,

    pub kind: AccountKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Optional body of `POST /auth/logout`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}
