//! Pending-registration ledger: one-time codes and the registrations they unlock.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Account, AccountKind, VerificationCode};
use crate::errors::DomainError;

/// Repository trait for VerificationCode persistence operations
///
/// Operations documented as atomic must be a single unit of work in the
/// implementation (a transaction, or one critical section).
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Insert `code` unless a live code already exists for its (email, kind)
    ///
    /// Atomic. Returns `false` and writes nothing when a live code exists.
    async fn create_if_none_live(&self, code: &VerificationCode) -> Result<bool, DomainError>;

    /// Unused, unexpired codes for the pair
    async fn find_live(
        &self,
        email: &str,
        kind: AccountKind,
    ) -> Result<Vec<VerificationCode>, DomainError>;

    /// Most recently created code for the pair, whatever its state
    async fn find_latest(
        &self,
        email: &str,
        kind: AccountKind,
    ) -> Result<Option<VerificationCode>, DomainError>;

    /// Mark every live code for the pair used and insert `code`
    ///
    /// Atomic.
    async fn supersede(&self, code: &VerificationCode) -> Result<(), DomainError>;

    /// Consume a code and create the account it unlocks
    ///
    /// Atomic: the code is marked used only if it is still unused and
    /// unexpired, then `account` is inserted and every code for the pair is
    /// deleted. Returns `Ok(None)` and writes nothing when the code was no
    /// longer live (another verifier won).
    async fn consume_and_promote(
        &self,
        code_id: Uuid,
        account: Account,
    ) -> Result<Option<Account>, DomainError>;

    /// Mark a single code used; returns whether a row changed
    async fn mark_used(&self, code_id: Uuid) -> Result<bool, DomainError>;

    /// Delete rows whose expiry has passed, used or not
    async fn delete_expired(&self) -> Result<usize, DomainError>;
}
