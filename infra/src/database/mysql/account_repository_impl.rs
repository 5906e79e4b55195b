//! MySQL implementation of the AccountRepository trait.
//!
//! Clients and companies live in separate tables (`clientes`, `empresas`);
//! the account kind selects the table. Only companies carry a logo column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool};
use uuid::Uuid;

use mp_core::domain::entities::{Account, AccountKind};
use mp_core::errors::{AuthError, DomainError};
use mp_core::repositories::AccountRepository;

use super::{column, db_error, is_duplicate, uuid_column};

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub(crate) fn table(kind: AccountKind) -> &'static str {
        match kind {
            AccountKind::Cliente => "clientes",
            AccountKind::Empresa => "empresas",
        }
    }

    fn select_columns(kind: AccountKind) -> &'static str {
        match kind {
            AccountKind::Cliente => {
                "id, email, name, password_hash, is_verified, created_at, updated_at"
            }
            AccountKind::Empresa => {
                "id, email, name, password_hash, is_verified, logo, created_at, updated_at"
            }
        }
    }

    /// Convert database row to Account entity
    pub(crate) fn row_to_account(
        row: &sqlx::mysql::MySqlRow,
        kind: AccountKind,
    ) -> Result<Account, DomainError> {
        let logo = match kind {
            AccountKind::Cliente => None,
            AccountKind::Empresa => column::<Option<String>>(row, "logo")?,
        };

        Ok(Account {
            id: uuid_column(row, "id")?,
            kind,
            email: column(row, "email")?,
            name: column(row, "name")?,
            password_hash: column(row, "password_hash")?,
            is_verified: column(row, "is_verified")?,
            logo,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }

    /// Insert an account using any executor, so verification can run it
    /// inside its own transaction
    pub(crate) async fn insert<'e, E>(executor: E, account: &Account) -> Result<(), DomainError>
    where
        E: sqlx::Executor<'e, Database = MySql>,
    {
        let result = match account.kind {
            AccountKind::Cliente => {
                sqlx::query(
                    r#"
                    INSERT INTO clientes (id, email, name, password_hash, is_verified, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(account.id.to_string())
                .bind(&account.email)
                .bind(&account.name)
                .bind(&account.password_hash)
                .bind(account.is_verified)
                .bind(account.created_at)
                .bind(account.updated_at)
                .execute(executor)
                .await
            }
            AccountKind::Empresa => {
                sqlx::query(
                    r#"
                    INSERT INTO empresas (id, email, name, password_hash, is_verified, logo, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(account.id.to_string())
                .bind(&account.email)
                .bind(&account.name)
                .bind(&account.password_hash)
                .bind(account.is_verified)
                .bind(&account.logo)
                .bind(account.created_at)
                .bind(account.updated_at)
                .execute(executor)
                .await
            }
        };

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate(&e) => Err(AuthError::EmailAlreadyRegistered.into()),
            Err(e) => Err(db_error("Failed to create account")(e)),
        }
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_email(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE email = ? LIMIT 1",
            Self::select_columns(kind),
            Self::table(kind)
        );

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find account by email"))?;

        row.map(|r| Self::row_to_account(&r, kind)).transpose()
    }

    async fn find_by_id(&self, kind: AccountKind, id: Uuid) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = ? LIMIT 1",
            Self::select_columns(kind),
            Self::table(kind)
        );

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find account by id"))?;

        row.map(|r| Self::row_to_account(&r, kind)).transpose()
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        Self::insert(&self.pool, &account).await?;
        Ok(account)
    }

    async fn list(&self, kind: AccountKind) -> Result<Vec<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} ORDER BY name",
            Self::select_columns(kind),
            Self::table(kind)
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list accounts"))?;

        rows.iter().map(|r| Self::row_to_account(r, kind)).collect()
    }
}
