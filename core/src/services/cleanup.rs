//! Periodic sweep of expired registration codes and revoked tokens
//!
//! Expired verification codes are reclaimed whether or not they were used, and
//! denylist entries are dropped once the token they block has expired anyway.

use std::sync::Arc;
use tracing::{error, info, warn};

use mp_shared::config::CleanupConfig;

use crate::errors::DomainError;
use crate::repositories::TokenRepository;
use crate::services::verification::VerificationService;

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct CleanupServiceConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for CleanupServiceConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
            enabled: true,
        }
    }
}

impl From<&CleanupConfig> for CleanupServiceConfig {
    fn from(config: &CleanupConfig) -> Self {
        Self {
            interval_seconds: config.interval_seconds.max(1),
            enabled: config.enabled,
        }
    }
}

/// Service for removing expired codes and denylist entries
pub struct CleanupService {
    verification: Arc<VerificationService>,
    tokens: Arc<dyn TokenRepository>,
    config: CleanupServiceConfig,
}

impl CleanupService {
    /// Create a new cleanup service
    pub fn new(
        verification: Arc<VerificationService>,
        tokens: Arc<dyn TokenRepository>,
        config: CleanupServiceConfig,
    ) -> Self {
        Self {
            verification,
            tokens,
            config,
        }
    }

    /// Run a single cleanup cycle
    ///
    /// A failure in one sweep is recorded in the result and does not stop the
    /// other one.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();

        match self.verification.cleanup_expired().await {
            Ok(count) => result.expired_codes_deleted = count,
            Err(e) => {
                error!(error = %e, event = "code_cleanup_failed", "Failed to delete expired codes");
                result.errors.push(format!("Code cleanup error: {}", e));
            }
        }

        match self.tokens.cleanup_blacklist().await {
            Ok(count) => result.revoked_tokens_deleted = count,
            Err(e) => {
                error!(error = %e, event = "denylist_cleanup_failed", "Failed to clean up denylist");
                result.errors.push(format!("Denylist cleanup error: {}", e));
            }
        }

        info!(
            expired_codes = result.expired_codes_deleted,
            revoked_tokens = result.revoked_tokens_deleted,
            event = "cleanup_completed",
            "Cleanup cycle completed"
        );

        Ok(result)
    }

    /// Start the cleanup service as a background task
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!(event = "cleanup_disabled", "Cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                event = "cleanup_started",
                "Cleanup service started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.is_success() {
                            warn!(errors = ?result.errors, "Cleanup completed with errors");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Cleanup cycle failed");
                    }
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired verification codes deleted
    pub expired_codes_deleted: usize,
    /// Number of expired denylist entries deleted
    pub revoked_tokens_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.expired_codes_deleted + self.revoked_tokens_deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::entities::{AccountKind, PendingAccount};
    use crate::repositories::InMemoryStore;
    use crate::services::verification::tests::mocks::MockEmailService;
    use crate::services::verification::VerificationServiceConfig;

    fn service(store: &InMemoryStore, config: CleanupServiceConfig) -> CleanupService {
        let verification = Arc::new(VerificationService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(MockEmailService::new()),
            VerificationServiceConfig::default(),
        ));
        CleanupService::new(verification, Arc::new(store.clone()), config)
    }

    fn pending() -> PendingAccount {
        PendingAccount::Cliente {
            name: "Ana".into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn test_run_cleanup_removes_expired_rows() {
        let store = InMemoryStore::new();
        let cleanup = service(&store, CleanupServiceConfig::default());

        cleanup
            .verification
            .issue_code("ana@example.com", pending())
            .await
            .unwrap();
        store
            .age_codes("ana@example.com", AccountKind::Cliente, Duration::seconds(120))
            .await;
        store
            .blacklist_token("old-jti", Utc::now() - Duration::minutes(1))
            .await
            .unwrap();
        store
            .blacklist_token("live-jti", Utc::now() + Duration::minutes(10))
            .await
            .unwrap();

        let result = cleanup.run_cleanup().await.unwrap();

        assert!(result.is_success());
        assert_eq!(result.expired_codes_deleted, 1);
        assert_eq!(result.revoked_tokens_deleted, 1);
        assert_eq!(result.total_cleaned(), 2);
        assert!(store.is_token_blacklisted("live-jti").await.unwrap());
    }

    #[tokio::test]
    async fn test_live_codes_survive_cleanup() {
        let store = InMemoryStore::new();
        let cleanup = service(&store, CleanupServiceConfig::default());
        cleanup
            .verification
            .issue_code("ana@example.com", pending())
            .await
            .unwrap();

        let result = cleanup.run_cleanup().await.unwrap();

        assert_eq!(result.expired_codes_deleted, 0);
        assert_eq!(store.codes_for("ana@example.com", AccountKind::Cliente).await.len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_cleanup_does_nothing() {
        let store = InMemoryStore::new();
        store
            .blacklist_token("old-jti", Utc::now() - Duration::minutes(1))
            .await
            .unwrap();
        let cleanup = service(
            &store,
            CleanupServiceConfig {
                enabled: false,
                ..Default::default()
            },
        );

        let result = cleanup.run_cleanup().await.unwrap();

        assert_eq!(result.total_cleaned(), 0);
        assert!(store.is_token_blacklisted("old-jti").await.unwrap());
    }
}
