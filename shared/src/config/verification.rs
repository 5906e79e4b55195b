//! Registration code and cleanup configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Registration verification code configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Seconds a freshly issued code stays valid
    pub code_expiration_seconds: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_expiration_seconds: 60,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            code_expiration_seconds: env_or("VERIFICATION_CODE_EXPIRATION_SECONDS", 60),
        }
    }
}

/// Periodic cleanup of expired codes and revoked tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Whether the background sweep runs
    pub enabled: bool,

    /// Seconds between sweeps
    pub interval_seconds: u64,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 300,
        }
    }
}

impl CleanupConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env_or("CLEANUP_ENABLED", true),
            interval_seconds: env_or("CLEANUP_INTERVAL_SECONDS", 300),
        }
    }
}
