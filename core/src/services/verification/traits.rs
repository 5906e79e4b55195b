//! Trait for outbound email integration

use async_trait::async_trait;

/// Trait for email delivery used by the verification engine
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Send a registration code; the copy states how long it stays valid
    ///
    /// Returns the provider message id.
    async fn send_verification_code(
        &self,
        email: &str,
        code: &str,
        expires_in_seconds: i64,
    ) -> Result<String, String>;

    /// Send a welcome message after the account is created
    async fn send_welcome(&self, email: &str, name: &str) -> Result<String, String>;
}
