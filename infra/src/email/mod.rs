//! Email Service Module
//!
//! Outbound transactional email for registration codes and welcome messages.
//!
//! - **EmailService trait**: common interface for every provider
//! - **Mock implementation**: logs messages and records codes for development
//! - **Brevo**: production delivery over the Brevo HTTP API with retries
//! - **Adapter**: bridges any provider to the core `EmailServiceTrait`

use std::sync::Arc;

use async_trait::async_trait;

use mp_core::services::verification::EmailServiceTrait;
use mp_shared::config::EmailConfig;

use crate::InfrastructureError;

pub mod brevo;
pub mod mock_email;
pub mod templates;

pub use brevo::BrevoEmailService;
pub use mock_email::MockEmailService;
pub use templates::EmailContent;

#[cfg(test)]
mod tests;

/// Email delivery trait implemented by each provider
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send one message, returning the provider's message id
    async fn send_email(&self, to: &str, content: &EmailContent) -> Result<String, InfrastructureError>;

    /// Send a registration code
    ///
    /// The copy states the same validity window the server enforces.
    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        expires_in_seconds: i64,
    ) -> Result<String, InfrastructureError> {
        let content = templates::verification_email(code, expires_in_seconds);
        self.send_email(to, &content).await
    }

    /// Send the post-verification welcome message
    async fn send_welcome(&self, to: &str, name: &str) -> Result<String, InfrastructureError> {
        let content = templates::welcome_email(name);
        self.send_email(to, &content).await
    }

    /// Get the service provider name
    fn provider_name(&self) -> &str;
}

/// Adapter that implements the core `EmailServiceTrait` for any provider
pub struct EmailServiceAdapter {
    inner: Arc<dyn EmailService>,
}

impl EmailServiceAdapter {
    pub fn new(inner: Arc<dyn EmailService>) -> Self {
        Self { inner }
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[async_trait]
impl EmailServiceTrait for EmailServiceAdapter {
    async fn send_verification_code(
        &self,
        email: &str,
        code: &str,
        expires_in_seconds: i64,
    ) -> Result<String, String> {
        self.inner
            .send_verification_code(email, code, expires_in_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn send_welcome(&self, email: &str, name: &str) -> Result<String, String> {
        self.inner
            .send_welcome(email, name)
            .await
            .map_err(|e| e.to_string())
    }
}

/// Create an email service based on configuration
///
/// Unknown providers and a Brevo setup without credentials fall back to the
/// mock so development environments still boot.
pub fn create_email_service(config: &EmailConfig) -> Arc<dyn EmailService> {
    match config.provider.as_str() {
        "mock" => Arc::new(MockEmailService::new()),
        "brevo" => match BrevoEmailService::new(config.clone()) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize Brevo email service");
                tracing::warn!("Falling back to mock email service");
                Arc::new(MockEmailService::new())
            }
        },
        other => {
            tracing::warn!(
                provider = other,
                "Unknown email provider, using mock implementation"
            );
            Arc::new(MockEmailService::new())
        }
    }
}
