//! MySQL implementation of the VerificationCodeRepository trait.
//!
//! Every multi-statement operation runs in one transaction. Consumption uses a
//! conditional `UPDATE ... WHERE is_used = FALSE AND expires_at > ?`, so among
//! concurrent verifiers exactly one sees an affected row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use mp_core::domain::entities::{Account, AccountKind, VerificationCode};
use mp_core::errors::DomainError;
use mp_core::repositories::VerificationCodeRepository;

use super::account_repository_impl::MySqlAccountRepository;
use super::{column, db_error, uuid_column};

const CODE_COLUMNS: &str =
    "id, email, code, kind, pending_payload, expires_at, is_used, created_at";

/// MySQL implementation of VerificationCodeRepository
pub struct MySqlVerificationCodeRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationCodeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_code(row: &sqlx::mysql::MySqlRow) -> Result<VerificationCode, DomainError> {
        let kind: String = column(row, "kind")?;

        Ok(VerificationCode {
            id: uuid_column(row, "id")?,
            email: column(row, "email")?,
            code: column(row, "code")?,
            kind: kind.parse().map_err(|e: String| DomainError::Internal { message: e })?,
            pending_payload: column(row, "pending_payload")?,
            expires_at: column::<DateTime<Utc>>(row, "expires_at")?,
            is_used: column(row, "is_used")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
        })
    }

    async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
        code: &VerificationCode,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO verification_codes (
                id, email, code, kind, pending_payload, expires_at, is_used, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(code.id.to_string())
        .bind(&code.email)
        .bind(&code.code)
        .bind(code.kind.as_str())
        .bind(&code.pending_payload)
        .bind(code.expires_at)
        .bind(code.is_used)
        .bind(code.created_at)
        .execute(&mut **tx)
        .await
        .map_err(db_error("Failed to insert verification code"))?;
        Ok(())
    }
}

#[async_trait]
impl VerificationCodeRepository for MySqlVerificationCodeRepository {
    async fn create_if_none_live(&self, code: &VerificationCode) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        // Locking read so two registrations for the pair serialize here
        let live = sqlx::query(
            r#"
            SELECT id FROM verification_codes
            WHERE email = ? AND kind = ? AND is_used = FALSE AND expires_at > ?
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(&code.email)
        .bind(code.kind.as_str())
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to check live codes"))?;

        if live.is_some() {
            tx.rollback().await.map_err(db_error("Failed to roll back"))?;
            return Ok(false);
        }

        Self::insert(&mut tx, code).await?;
        tx.commit().await.map_err(db_error("Failed to commit code"))?;
        Ok(true)
    }

    async fn find_live(
        &self,
        email: &str,
        kind: AccountKind,
    ) -> Result<Vec<VerificationCode>, DomainError> {
        let query = format!(
            "SELECT {} FROM verification_codes \
             WHERE email = ? AND kind = ? AND is_used = FALSE AND expires_at > ? \
             ORDER BY created_at DESC",
            CODE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(email)
            .bind(kind.as_str())
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to find live codes"))?;

        rows.iter().map(Self::row_to_code).collect()
    }

    async fn find_latest(
        &self,
        email: &str,
        kind: AccountKind,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let query = format!(
            "SELECT {} FROM verification_codes WHERE email = ? AND kind = ? \
             ORDER BY created_at DESC LIMIT 1",
            CODE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(email)
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find latest code"))?;

        row.as_ref().map(Self::row_to_code).transpose()
    }

    async fn supersede(&self, code: &VerificationCode) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        sqlx::query(
            r#"
            UPDATE verification_codes SET is_used = TRUE
            WHERE email = ? AND kind = ? AND is_used = FALSE AND expires_at > ?
            "#,
        )
        .bind(&code.email)
        .bind(code.kind.as_str())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to supersede codes"))?;

        Self::insert(&mut tx, code).await?;
        tx.commit().await.map_err(db_error("Failed to commit code"))?;
        Ok(())
    }

    async fn consume_and_promote(
        &self,
        code_id: Uuid,
        account: Account,
    ) -> Result<Option<Account>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let consumed = sqlx::query(
            r#"
            UPDATE verification_codes SET is_used = TRUE
            WHERE id = ? AND is_used = FALSE AND expires_at > ?
            "#,
        )
        .bind(code_id.to_string())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to consume code"))?;

        if consumed.rows_affected() != 1 {
            tx.rollback().await.map_err(db_error("Failed to roll back"))?;
            return Ok(None);
        }

        // A duplicate account aborts the transaction and leaves the code unused
        if let Err(e) = MySqlAccountRepository::insert(&mut *tx, &account).await {
            tx.rollback().await.map_err(db_error("Failed to roll back"))?;
            return Err(e);
        }

        sqlx::query("DELETE FROM verification_codes WHERE email = ? AND kind = ?")
            .bind(&account.email)
            .bind(account.kind.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to purge codes"))?;

        tx.commit().await.map_err(db_error("Failed to commit verification"))?;
        Ok(Some(account))
    }

    async fn mark_used(&self, code_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE verification_codes SET is_used = TRUE WHERE id = ? AND is_used = FALSE",
        )
        .bind(code_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to mark code used"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete expired codes"))?;

        Ok(result.rows_affected() as usize)
    }
}
