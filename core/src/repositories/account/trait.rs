//! Credential store: one repository for both account kinds.
//!
//! Emails are unique per kind, so every lookup is parameterized by `AccountKind`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Account, AccountKind};
use crate::errors::DomainError;

/// Repository trait for Account persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by normalized email within one kind
    async fn find_by_email(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<Account>, DomainError>;

    /// Find an account by id within one kind
    async fn find_by_id(&self, kind: AccountKind, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Insert a new account
    ///
    /// # Returns
    /// * `Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))` - Email taken for this kind
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// All accounts of one kind, newest first
    async fn list(&self, kind: AccountKind) -> Result<Vec<Account>, DomainError>;
}
