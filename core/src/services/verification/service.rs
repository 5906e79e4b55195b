//! Main verification service implementation

use std::sync::Arc;

use mp_shared::utils::{is_valid_email, is_valid_verification_code, mask_email, normalize_email};

use crate::domain::entities::{Account, AccountKind, PendingAccount, VerificationCode};
use crate::errors::{AuthError, DomainResult, ValidationError};
use crate::repositories::{AccountRepository, VerificationCodeRepository};

use super::config::VerificationServiceConfig;
use super::traits::EmailServiceTrait;

/// Verification service for registration codes
pub struct VerificationService {
    /// Credential store, consulted for already registered emails
    accounts: Arc<dyn AccountRepository>,
    /// Pending-registration ledger
    codes: Arc<dyn VerificationCodeRepository>,
    /// Email delivery
    email_service: Arc<dyn EmailServiceTrait>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl VerificationService {
    /// Create a new verification service
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        codes: Arc<dyn VerificationCodeRepository>,
        email_service: Arc<dyn EmailServiceTrait>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            accounts,
            codes,
            email_service,
            config,
        }
    }

    /// Seconds a new code stays valid
    pub fn code_expiration_seconds(&self) -> i64 {
        self.config.code_expiration_seconds
    }

    /// Park a registration and email a code for it
    ///
    /// This method:
    /// 1. Rejects emails that already belong to an account of this kind
    /// 2. Atomically inserts the code unless a live one exists for the pair
    /// 3. Sends the code and waits for the provider
    ///
    /// If the email cannot be sent the new code is invalidated immediately so
    /// the caller can register again.
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationCode)` - The stored code
    /// * `Err(DomainError)` - `EmailAlreadyRegistered`, `DuplicatePendingRequest`,
    ///   `VerificationEmailFailed`, or a storage failure
    pub async fn issue_code(
        &self,
        email: &str,
        pending: PendingAccount,
    ) -> DomainResult<VerificationCode> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        let kind = pending.kind();

        if self.accounts.find_by_email(kind, &email).await?.is_some() {
            tracing::info!(
                email = %mask_email(&email),
                kind = %kind,
                event = "registration_rejected_existing",
                "Registration attempted for an existing account"
            );
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        let code = VerificationCode::issue(
            email.clone(),
            kind,
            pending.encode()?,
            self.config.code_expiration_seconds,
        );

        if !self.codes.create_if_none_live(&code).await? {
            tracing::info!(
                email = %mask_email(&email),
                kind = %kind,
                event = "registration_rejected_pending",
                "Registration already pending verification"
            );
            return Err(AuthError::DuplicatePendingRequest.into());
        }

        tracing::info!(
            email = %mask_email(&email),
            kind = %kind,
            code_id = %code.id,
            event = "verification_code_issued",
            "Issued registration verification code"
        );

        self.deliver(&code).await?;
        Ok(code)
    }

    /// Verify a code and create the account it unlocks
    ///
    /// The code is compared in constant time against every live code for the
    /// pair. The stored payload is decoded before anything is written, so a
    /// corrupt payload leaves the ledger untouched. Consumption, account
    /// creation and purging of the pair's codes are one atomic unit; a caller
    /// that loses a race sees `InvalidOrExpiredCode`.
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
        kind: AccountKind,
    ) -> DomainResult<Account> {
        let email = normalize_email(email);
        let code = code.trim();

        if !is_valid_verification_code(code) {
            tracing::warn!(
                email = %mask_email(&email),
                event = "invalid_code_format",
                code_length = code.len(),
                "Invalid verification code format provided"
            );
            return Err(AuthError::InvalidOrExpiredCode.into());
        }

        let live = self.codes.find_live(&email, kind).await?;
        let matched = live
            .into_iter()
            .find(|candidate| candidate.matches(code))
            .ok_or_else(|| {
                tracing::warn!(
                    email = %mask_email(&email),
                    kind = %kind,
                    event = "verification_failed",
                    "No live code matched"
                );
                AuthError::InvalidOrExpiredCode
            })?;

        let pending = PendingAccount::decode(&matched.pending_payload, kind).map_err(|e| {
            tracing::error!(
                email = %mask_email(&email),
                code_id = %matched.id,
                event = "pending_state_corrupt",
                "Stored registration payload could not be decoded"
            );
            e
        })?;

        let account = pending.into_account(email.clone());
        let account = self
            .codes
            .consume_and_promote(matched.id, account)
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    email = %mask_email(&email),
                    code_id = %matched.id,
                    event = "verification_race_lost",
                    "Code was consumed or expired before it could be used"
                );
                AuthError::InvalidOrExpiredCode
            })?;

        tracing::info!(
            email = %mask_email(&email),
            kind = %kind,
            account_id = %account.id,
            event = "account_verified",
            "Registration verified and account created"
        );

        self.spawn_welcome(&account);
        Ok(account)
    }

    /// Issue a replacement code for a pending registration
    ///
    /// Without any prior code for the pair this is a silent no-op and
    /// returns `Ok(None)`, so the endpoint never reveals whether an email
    /// has registered.
    pub async fn resend_code(
        &self,
        email: &str,
        kind: AccountKind,
    ) -> DomainResult<Option<VerificationCode>> {
        let email = normalize_email(email);

        let latest = match self.codes.find_latest(&email, kind).await? {
            Some(latest) => latest,
            None => {
                tracing::debug!(
                    email = %mask_email(&email),
                    kind = %kind,
                    event = "resend_without_registration",
                    "Resend requested without a pending registration"
                );
                return Ok(None);
            }
        };

        let code = latest.reissue(self.config.code_expiration_seconds);
        self.codes.supersede(&code).await?;

        tracing::info!(
            email = %mask_email(&email),
            kind = %kind,
            code_id = %code.id,
            event = "verification_code_resent",
            "Superseded live codes with a new one"
        );

        self.deliver(&code).await?;
        Ok(Some(code))
    }

    /// Delete expired codes, used or not
    pub async fn cleanup_expired(&self) -> DomainResult<usize> {
        let deleted = self.codes.delete_expired().await?;
        if deleted > 0 {
            tracing::info!(deleted = deleted, event = "expired_codes_deleted", "Expired codes removed");
        }
        Ok(deleted)
    }

    /// Send the code, invalidating it if delivery fails
    async fn deliver(&self, code: &VerificationCode) -> DomainResult<()> {
        match self
            .email_service
            .send_verification_code(&code.email, &code.code, self.config.code_expiration_seconds)
            .await
        {
            Ok(message_id) => {
                tracing::debug!(
                    email = %mask_email(&code.email),
                    message_id = %message_id,
                    "Verification email accepted by provider"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    email = %mask_email(&code.email),
                    code_id = %code.id,
                    error = %e,
                    event = "verification_email_failed",
                    "Failed to send verification email"
                );
                if let Err(mark_err) = self.codes.mark_used(code.id).await {
                    tracing::error!(
                        code_id = %code.id,
                        error = %mark_err,
                        "Failed to invalidate undelivered code"
                    );
                }
                Err(AuthError::VerificationEmailFailed.into())
            }
        }
    }

    /// Fire-and-forget welcome email
    fn spawn_welcome(&self, account: &Account) {
        let email_service = Arc::clone(&self.email_service);
        let email = account.email.clone();
        let name = account.name.clone();
        tokio::spawn(async move {
            if let Err(e) = email_service.send_welcome(&email, &name).await {
                tracing::warn!(
                    email = %mask_email(&email),
                    error = %e,
                    event = "welcome_email_failed",
                    "Failed to send welcome email"
                );
            }
        });
    }
}
