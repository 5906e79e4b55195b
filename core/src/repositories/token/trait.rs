//! Token revocation denylist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Repository trait for revoked token ids
///
/// Entries only need to live as long as the token they revoke; past that the
/// token fails expiry validation anyway.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Add a token id to the denylist until `expires_at`
    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Check whether a token id is on the denylist
    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, DomainError>;

    /// Remove entries whose token has expired
    async fn cleanup_blacklist(&self) -> Result<usize, DomainError>;
}
