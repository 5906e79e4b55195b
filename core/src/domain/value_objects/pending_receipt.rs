//! Acknowledgement returned when a registration is parked awaiting verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AccountKind, VerificationCode};

/// What a caller learns after registering; never contains the code itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReceipt {
    pub email: String,
    pub kind: AccountKind,
    pub expires_at: DateTime<Utc>,
    pub expires_in_seconds: i64,
}

impl From<&VerificationCode> for PendingReceipt {
    fn from(code: &VerificationCode) -> Self {
        Self {
            email: code.email.clone(),
            kind: code.kind,
            expires_at: code.expires_at,
            expires_in_seconds: (code.expires_at - code.created_at).num_seconds(),
        }
    }
}
