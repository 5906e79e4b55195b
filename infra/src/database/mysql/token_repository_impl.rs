//! MySQL implementation of the TokenRepository trait.
//!
//! Revoked token ids are kept until the token itself would have expired.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use mp_core::errors::DomainError;
use mp_core::repositories::TokenRepository;

use super::db_error;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO token_blacklist (jti, expires_at)
            VALUES (?, ?)
            ON DUPLICATE KEY UPDATE expires_at = VALUES(expires_at)
        "#;

        sqlx::query(query)
            .bind(jti)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to blacklist token"))?;

        Ok(())
    }

    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, DomainError> {
        let query = "SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE jti = ?) AS is_blacklisted";

        let row = sqlx::query(query)
            .bind(jti)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to check blacklist"))?;

        let exists: i64 = row.try_get("is_blacklisted").map_err(|e| DomainError::Internal {
            message: format!("Failed to get blacklist result: {}", e),
        })?;

        Ok(exists == 1)
    }

    async fn cleanup_blacklist(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to clean up blacklist"))?;

        Ok(result.rows_affected() as usize)
    }
}
