//! Main authentication service implementation

use std::sync::Arc;

use tokio::sync::OnceCell;

use mp_shared::utils::{is_blank, is_valid_email, mask_email, normalize_email};

use crate::domain::entities::{AccountKind, AccountView, Claims, PendingAccount, TokenPair};
use crate::domain::value_objects::PendingReceipt;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::AccountRepository;
use crate::services::token::TokenService;
use crate::services::verification::VerificationService;

use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};

/// Authentication service for clients and companies
pub struct AuthService {
    /// Credential store
    accounts: Arc<dyn AccountRepository>,
    /// Registration code engine
    verification_service: Arc<VerificationService>,
    /// JWT management
    token_service: Arc<TokenService>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Hash compared against when no account matched, so every login pays
    /// for one bcrypt verification
    dummy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        verification_service: Arc<VerificationService>,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            accounts,
            verification_service,
            token_service,
            config,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Log in with email and password
    ///
    /// Clients are checked before companies. An account qualifies only if it is
    /// verified and the password matches. Every failure, including storage
    /// errors, is reported as `InvalidCredentials`. A bcrypt comparison runs
    /// whether or not the email is known.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let email = normalize_email(email);

        let mut compared = false;
        for kind in AccountKind::ALL {
            let account = match self.accounts.find_by_email(kind, &email).await {
                Ok(Some(account)) => account,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(
                        email = %mask_email(&email),
                        error = %e,
                        event = "login_lookup_failed",
                        "Account lookup failed during login"
                    );
                    continue;
                }
            };

            compared = true;
            let password_ok = verify_password(password, &account.password_hash).await;
            if account.is_verified && password_ok {
                tracing::info!(
                    account_id = %account.id,
                    kind = %kind,
                    event = "login_success",
                    "Account logged in"
                );
                return self
                    .token_service
                    .issue_pair(&account)
                    .map_err(|_| AuthError::InvalidCredentials.into());
            }
        }

        if !compared {
            self.burn_password_check(password).await;
        }

        tracing::warn!(
            email = %mask_email(&email),
            event = "login_failed",
            "Login rejected"
        );
        Err(AuthError::InvalidCredentials.into())
    }

    /// Verify against a throwaway hash at the configured cost
    async fn burn_password_check(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| hash_password("mercado-no-such-account", self.config.bcrypt_cost))
            .await;
        match dummy {
            Ok(hash) => {
                verify_password(password, hash).await;
            }
            Err(e) => tracing::warn!(error = %e, "Failed to prepare login dummy hash"),
        }
    }

    #[cfg(test)]
    pub(crate) fn has_dummy_hash(&self) -> bool {
        self.dummy_hash.initialized()
    }

    /// Park a client registration and email its code
    pub async fn register_client(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> DomainResult<PendingReceipt> {
        self.validate_registration(email, name, password)?;
        let pending = PendingAccount::Cliente {
            name: name.trim().to_string(),
            password_hash: hash_password(password, self.config.bcrypt_cost).await?,
        };
        let code = self.verification_service.issue_code(email, pending).await?;
        Ok(PendingReceipt::from(&code))
    }

    /// Park a company registration and email its code
    pub async fn register_company(
        &self,
        email: &str,
        name: &str,
        password: &str,
        logo: Option<String>,
    ) -> DomainResult<PendingReceipt> {
        self.validate_registration(email, name, password)?;
        let pending = PendingAccount::Empresa {
            name: name.trim().to_string(),
            password_hash: hash_password(password, self.config.bcrypt_cost).await?,
            logo: logo.filter(|l| !is_blank(l)),
        };
        let code = self.verification_service.issue_code(email, pending).await?;
        Ok(PendingReceipt::from(&code))
    }

    /// Verify a registration code, returning the new account
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
        kind: AccountKind,
    ) -> DomainResult<AccountView> {
        let account = self.verification_service.verify_code(email, code, kind).await?;
        Ok(account.view())
    }

    /// Resend a registration code; silent when nothing is pending
    pub async fn resend_code(&self, email: &str, kind: AccountKind) -> DomainResult<()> {
        self.verification_service.resend_code(email, kind).await?;
        Ok(())
    }

    /// Exchange a refresh token for a new pair, revoking the presented token
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claims = self.token_service.verify_refresh_token(refresh_token).await?;
        let user_id = claims
            .user_id()
            .map_err(|_| TokenError::InvalidRefreshToken)?;

        let account = self
            .accounts
            .find_by_id(claims.kind, user_id)
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        self.token_service.revoke(&claims).await?;
        tracing::info!(
            account_id = %account.id,
            event = "token_refreshed",
            "Refresh token rotated"
        );
        self.token_service.issue_pair(&account)
    }

    /// Revoke the caller's access token and, optionally, their refresh token
    ///
    /// A refresh token that is invalid or belongs to someone else is ignored.
    pub async fn logout(&self, claims: &Claims, refresh_token: Option<&str>) -> DomainResult<()> {
        self.token_service.revoke(claims).await?;

        if let Some(token) = refresh_token {
            match self.token_service.verify_refresh_token(token).await {
                Ok(refresh) if refresh.sub == claims.sub => {
                    self.token_service.revoke(&refresh).await?;
                }
                Ok(_) | Err(DomainError::Token(_)) => {
                    tracing::debug!(event = "logout_refresh_ignored", "Refresh token not revoked");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(sub = %claims.sub, event = "logout", "Account logged out");
        Ok(())
    }

    fn validate_registration(&self, email: &str, name: &str, password: &str) -> DomainResult<()> {
        if !is_valid_email(&normalize_email(email)) {
            return Err(ValidationError::InvalidEmail.into());
        }
        if is_blank(name) {
            return Err(ValidationError::RequiredField {
                field: "name".to_string(),
            }
            .into());
        }
        if password.chars().count() < self.config.min_password_length {
            return Err(ValidationError::TooShort {
                field: "password".to_string(),
                min: self.config.min_password_length,
            }
            .into());
        }
        Ok(())
    }
}
