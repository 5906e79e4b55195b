//! Outbound email configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Email provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Provider name ("brevo" or "mock")
    pub provider: String,

    /// Provider API key
    pub api_key: String,

    /// Provider endpoint
    pub api_url: String,

    /// Sender address shown to recipients
    pub sender_email: String,

    /// Sender display name
    pub sender_name: String,

    /// Maximum delivery attempts per message
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (doubles each attempt)
    pub retry_delay_ms: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: String::from("mock"),
            api_key: String::new(),
            api_url: String::from("https://api.brevo.com/v3/smtp/email"),
            sender_email: String::from("no-reply@mercado.local"),
            sender_name: String::from("Mercado"),
            max_retries: 3,
            retry_delay_ms: 500,
            request_timeout_secs: 15,
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: std::env::var("EMAIL_PROVIDER").unwrap_or(defaults.provider),
            api_key: std::env::var("EMAIL_API_KEY").unwrap_or_default(),
            api_url: std::env::var("EMAIL_API_URL").unwrap_or(defaults.api_url),
            sender_email: std::env::var("EMAIL_SENDER").unwrap_or(defaults.sender_email),
            sender_name: std::env::var("EMAIL_SENDER_NAME").unwrap_or(defaults.sender_name),
            max_retries: env_or("EMAIL_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("EMAIL_RETRY_DELAY_MS", defaults.retry_delay_ms),
            request_timeout_secs: env_or("EMAIL_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }

    /// Whether a real provider has credentials to work with
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.sender_email.trim().is_empty()
    }
}
