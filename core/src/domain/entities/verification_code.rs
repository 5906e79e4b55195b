//! Verification code entity for email-based registration.
//!
//! A code travels together with the serialized registration it unlocks. The
//! account row is built from that payload alone once the code is consumed.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AuthError, DomainError};

use super::account::{Account, AccountKind};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of a freshly issued code
pub const DEFAULT_EXPIRATION_SECONDS: i64 = 60;

/// Registration data held until the email is verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PendingAccount {
    Cliente {
        name: String,
        password_hash: String,
    },
    Empresa {
        name: String,
        password_hash: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        logo: Option<String>,
    },
}

impl PendingAccount {
    pub fn kind(&self) -> AccountKind {
        match self {
            PendingAccount::Cliente { .. } => AccountKind::Cliente,
            PendingAccount::Empresa { .. } => AccountKind::Empresa,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PendingAccount::Cliente { name, .. } | PendingAccount::Empresa { name, .. } => name,
        }
    }

    fn password_hash(&self) -> &str {
        match self {
            PendingAccount::Cliente { password_hash, .. }
            | PendingAccount::Empresa { password_hash, .. } => password_hash,
        }
    }

    /// Serialize for storage alongside the code
    pub fn encode(&self) -> Result<String, DomainError> {
        serde_json::to_string(self).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode pending registration: {}", e),
        })
    }

    /// Decode a stored payload, failing closed on anything unexpected
    ///
    /// The payload must be well-formed JSON, tagged with `expected`, and carry a
    /// non-blank name and password hash.
    pub fn decode(payload: &str, expected: AccountKind) -> Result<Self, AuthError> {
        let pending: PendingAccount =
            serde_json::from_str(payload).map_err(|_| AuthError::CorruptPendingState)?;

        if pending.kind() != expected
            || pending.name().trim().is_empty()
            || pending.password_hash().trim().is_empty()
        {
            return Err(AuthError::CorruptPendingState);
        }

        Ok(pending)
    }

    /// Build the verified account this registration describes
    pub fn into_account(self, email: String) -> Account {
        match self {
            PendingAccount::Cliente {
                name,
                password_hash,
            } => Account::new_verified(AccountKind::Cliente, email, name, password_hash, None),
            PendingAccount::Empresa {
                name,
                password_hash,
                logo,
            } => Account::new_verified(AccountKind::Empresa, email, name, password_hash, logo),
        }
    }
}

/// One-time registration code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    pub id: Uuid,

    /// Normalized email the code was sent to
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    pub kind: AccountKind,

    /// Serialized `PendingAccount`
    pub pending_payload: String,

    pub expires_at: DateTime<Utc>,

    pub is_used: bool,

    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Issue a fresh code for a pending registration
    pub fn issue(
        email: String,
        kind: AccountKind,
        pending_payload: String,
        ttl_seconds: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            code: Self::generate_code(),
            kind,
            pending_payload,
            expires_at: now + Duration::seconds(ttl_seconds),
            is_used: false,
            created_at: now,
        }
    }

    /// Issue a replacement code that carries the same registration forward
    pub fn reissue(&self, ttl_seconds: i64) -> Self {
        Self::issue(
            self.email.clone(),
            self.kind,
            self.pending_payload.clone(),
            ttl_seconds,
        )
    }

    /// Uniform over [100000, 999999] from the OS CSPRNG
    pub fn generate_code() -> String {
        OsRng.gen_range(100_000u32..=999_999).to_string()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Unused and unexpired at `now`
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && !self.is_expired_at(now)
    }

    /// Constant-time comparison against a submitted code
    pub fn matches(&self, candidate: &str) -> bool {
        if self.code.len() != candidate.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_client() -> PendingAccount {
        PendingAccount::Cliente {
            name: "Ana".to_string(),
            password_hash: "$2b$12$hash".to_string(),
        }
    }

    #[test]
    fn test_generated_codes_are_six_digits_without_leading_zero() {
        for _ in 0..500 {
            let code = VerificationCode::generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_issue_sets_window() {
        let code = VerificationCode::issue(
            "ana@example.com".into(),
            AccountKind::Cliente,
            pending_client().encode().unwrap(),
            DEFAULT_EXPIRATION_SECONDS,
        );
        assert!(code.is_live_at(Utc::now()));
        assert_eq!(code.expires_at - code.created_at, Duration::seconds(60));
        assert!(!code.is_live_at(code.created_at + Duration::seconds(61)));
    }

    #[test]
    fn test_reissue_keeps_payload_and_changes_identity() {
        let original = VerificationCode::issue(
            "ana@example.com".into(),
            AccountKind::Cliente,
            pending_client().encode().unwrap(),
            60,
        );
        let next = original.reissue(60);
        assert_ne!(original.id, next.id);
        assert_eq!(original.pending_payload, next.pending_payload);
        assert_eq!(original.email, next.email);
    }

    #[test]
    fn test_matches_requires_exact_code() {
        let mut code = VerificationCode::issue("a@b.co".into(), AccountKind::Cliente, "{}".into(), 60);
        code.code = "123456".to_string();
        assert!(code.matches("123456"));
        assert!(!code.matches("123457"));
        assert!(!code.matches("12345"));
    }

    #[test]
    fn test_pending_payload_round_trip_and_tag() {
        let pending = PendingAccount::Empresa {
            name: "Shop".into(),
            password_hash: "hash".into(),
            logo: Some("logo.png".into()),
        };
        let encoded = pending.encode().unwrap();
        assert!(encoded.contains("\"kind\":\"empresa\""));
        assert_eq!(PendingAccount::decode(&encoded, AccountKind::Empresa).unwrap(), pending);
    }

    #[test]
    fn test_pending_payload_fails_closed() {
        let encoded = pending_client().encode().unwrap();
        assert_eq!(
            PendingAccount::decode(&encoded, AccountKind::Empresa),
            Err(AuthError::CorruptPendingState)
        );
        assert_eq!(
            PendingAccount::decode("not json", AccountKind::Cliente),
            Err(AuthError::CorruptPendingState)
        );
        assert_eq!(
            PendingAccount::decode("", AccountKind::Cliente),
            Err(AuthError::CorruptPendingState)
        );
        assert_eq!(
            PendingAccount::decode(
                r#"{"kind":"cliente","name":"  ","password_hash":"hash"}"#,
                AccountKind::Cliente
            ),
            Err(AuthError::CorruptPendingState)
        );
        assert_eq!(
            PendingAccount::decode(r#"{"kind":"cliente","name":"Ana"}"#, AccountKind::Cliente),
            Err(AuthError::CorruptPendingState)
        );
    }

    #[test]
    fn test_into_account_is_verified() {
        let account = pending_client().into_account("ana@example.com".into());
        assert_eq!(account.kind, AccountKind::Cliente);
        assert!(account.is_verified);
        assert_eq!(account.password_hash, "$2b$12$hash");
    }
}
