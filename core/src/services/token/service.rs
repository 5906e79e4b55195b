//! Main token service implementation

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::{Account, Claims, TokenPair, TokenType};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Service for issuing and checking JWTs
pub struct TokenService {
    repository: Arc<dyn TokenRepository>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    pub fn new(repository: Arc<dyn TokenRepository>, config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Access token lifetime in seconds, reported as `expiresIn`
    pub fn access_token_expiry(&self) -> i64 {
        self.config.access_token_expiry_seconds
    }

    /// Generates a new access/refresh pair for an account
    pub fn issue_pair(&self, account: &Account) -> DomainResult<TokenPair> {
        let access = Claims::new(
            account,
            TokenType::Access,
            self.config.access_token_expiry_seconds,
            &self.config.issuer,
            &self.config.audience,
        );
        let refresh = Claims::new(
            account,
            TokenType::Refresh,
            self.config.refresh_token_expiry_seconds,
            &self.config.issuer,
            &self.config.audience,
        );

        Ok(TokenPair::new(
            self.encode_jwt(&access)?,
            self.encode_jwt(&refresh)?,
            self.config.access_token_expiry_seconds,
            self.config.refresh_token_expiry_seconds,
        ))
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies an access token and returns the claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature, expiry, issuer, audience and type check out
    ///   and the token is not revoked
    /// * `Err(TokenError)` - `TokenExpired`, `TokenRevoked` or `InvalidTokenFormat`
    pub async fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        let claims = self.decode_jwt(token, TokenType::Access)?;
        self.ensure_not_revoked(&claims).await?;
        Ok(claims)
    }

    /// Verifies a refresh token; every failure collapses to `InvalidRefreshToken`
    pub async fn verify_refresh_token(&self, token: &str) -> DomainResult<Claims> {
        let claims = self
            .decode_jwt(token, TokenType::Refresh)
            .map_err(|_| TokenError::InvalidRefreshToken)?;
        self.ensure_not_revoked(&claims)
            .await
            .map_err(|e| match e {
                DomainError::Token(_) => DomainError::Token(TokenError::InvalidRefreshToken),
                other => other,
            })?;
        Ok(claims)
    }

    /// Put a token on the denylist until it would have expired anyway
    pub async fn revoke(&self, claims: &Claims) -> DomainResult<()> {
        self.repository
            .blacklist_token(&claims.jti, claims.expires_at())
            .await?;
        tracing::info!(
            jti = %claims.jti,
            token_type = ?claims.token_type,
            event = "token_revoked",
            "Token added to denylist"
        );
        Ok(())
    }

    fn decode_jwt(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidTokenFormat,
            },
        )?;

        if token_data.claims.token_type != expected {
            return Err(TokenError::InvalidTokenFormat);
        }
        Ok(token_data.claims)
    }

    async fn ensure_not_revoked(&self, claims: &Claims) -> DomainResult<()> {
        if self.repository.is_token_blacklisted(&claims.jti).await? {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }
        Ok(())
    }
}
