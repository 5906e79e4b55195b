//! MySQL-specific database implementations
//!
//! UUIDs are stored as `CHAR(36)`, enums as their lowercase wire names.

pub mod account_repository_impl;
pub mod notification_repository_impl;
pub mod order_repository_impl;
pub mod product_repository_impl;
pub mod token_repository_impl;
pub mod verification_repository_impl;

// Re-export the MySQL implementations
pub use account_repository_impl::MySqlAccountRepository;
pub use notification_repository_impl::MySqlNotificationRepository;
pub use order_repository_impl::MySqlOrderRepository;
pub use product_repository_impl::MySqlProductRepository;
pub use token_repository_impl::MySqlTokenRepository;
pub use verification_repository_impl::MySqlVerificationCodeRepository;

use mp_core::errors::DomainError;
use sqlx::Row;
use uuid::Uuid;

/// Wrap a driver error with context
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

/// Whether the error is a unique-key violation
pub(crate) fn is_duplicate(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Read a column, mapping decode failures to `Internal`
pub(crate) fn column<'r, T>(row: &'r sqlx::mysql::MySqlRow, name: &'static str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}

/// Read a `CHAR(36)` column as a UUID
pub(crate) fn uuid_column(row: &sqlx::mysql::MySqlRow, name: &'static str) -> Result<Uuid, DomainError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", name, e),
    })
}
