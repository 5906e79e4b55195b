//! Configuration for the verification service

use mp_shared::VerificationConfig;

use crate::domain::entities::verification_code::DEFAULT_EXPIRATION_SECONDS;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Seconds before a verification code expires
    pub code_expiration_seconds: i64,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_seconds: DEFAULT_EXPIRATION_SECONDS,
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_expiration_seconds: config.code_expiration_seconds,
        }
    }
}
