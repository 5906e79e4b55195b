use std::sync::Arc;

use crate::domain::entities::AccountKind;
use crate::errors::{AuthError, DomainError, TokenError, ValidationError};
use crate::repositories::InMemoryStore;
use crate::services::auth::{AuthService, AuthServiceConfig};
use crate::services::token::{TokenService, TokenServiceConfig};
use crate::services::verification::tests::mocks::MockEmailService;
use crate::services::verification::{VerificationService, VerificationServiceConfig};

struct Harness {
    auth: AuthService,
    tokens: Arc<TokenService>,
    email: Arc<MockEmailService>,
}

fn harness() -> Harness {
    let store = InMemoryStore::new();
    let email = Arc::new(MockEmailService::new());
    let verification = Arc::new(VerificationService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        email.clone(),
        VerificationServiceConfig::default(),
    ));
    let tokens = Arc::new(TokenService::new(
        Arc::new(store.clone()),
        TokenServiceConfig::default(),
    ));
    let auth = AuthService::new(
        Arc::new(store),
        verification,
        tokens.clone(),
        AuthServiceConfig {
            bcrypt_cost: 4,
            ..Default::default()
        },
    );
    Harness { auth, tokens, email }
}

async fn registered_client(h: &Harness, email: &str, password: &str) {
    h.auth.register_client(email, "Ana", password).await.unwrap();
    let code = h.email.last_code(email).unwrap();
    h.auth.verify_code(email, &code, AccountKind::Cliente).await.unwrap();
}

#[tokio::test]
async fn test_register_returns_receipt_without_code() {
    let h = harness();
    let receipt = h
        .auth
        .register_client("Ana@Example.com", "Ana", "password123")
        .await
        .unwrap();

    assert_eq!(receipt.email, "ana@example.com");
    assert_eq!(receipt.kind, AccountKind::Cliente);
    assert_eq!(receipt.expires_in_seconds, 60);
    let json = serde_json::to_string(&receipt).unwrap();
    let code = h.email.last_code("ana@example.com").unwrap();
    assert!(!json.contains(&code));
}

#[tokio::test]
async fn test_registration_validation() {
    let h = harness();
    assert!(matches!(
        h.auth.register_client("ana@example.com", "Ana", "short").await,
        Err(DomainError::ValidationErr(ValidationError::TooShort { .. }))
    ));
    assert!(matches!(
        h.auth.register_client("ana@example.com", "  ", "password123").await,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));
    assert!(matches!(
        h.auth.register_client("ana", "Ana", "password123").await,
        Err(DomainError::ValidationErr(ValidationError::InvalidEmail))
    ));
    assert_eq!(h.email.count(), 0);
}

#[tokio::test]
async fn test_company_registration_keeps_logo() {
    let h = harness();
    h.auth
        .register_company("shop@example.com", "Shop", "password123", Some("logo.png".into()))
        .await
        .unwrap();
    let code = h.email.last_code("shop@example.com").unwrap();
    let view = h
        .auth
        .verify_code("shop@example.com", &code, AccountKind::Empresa)
        .await
        .unwrap();

    assert_eq!(view.kind, AccountKind::Empresa);
    assert_eq!(view.logo.as_deref(), Some("logo.png"));
}

#[tokio::test]
async fn test_login_after_verification() {
    let h = harness();
    registered_client(&h, "ana@example.com", "password123").await;

    let pair = h.auth.login("ANA@example.com", "password123").await.unwrap();
    let claims = h.tokens.verify_access_token(&pair.access_token).await.unwrap();
    assert_eq!(claims.kind, AccountKind::Cliente);
    assert_eq!(pair.expires_in, 900);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();
    registered_client(&h, "ana@example.com", "password123").await;
    h.auth
        .register_client("pending@example.com", "Pen", "password123")
        .await
        .unwrap();

    let wrong_password = h.auth.login("ana@example.com", "wrong-password").await;
    let unknown = h.auth.login("nobody@example.com", "password123").await;
    let unverified = h.auth.login("pending@example.com", "password123").await;

    for result in [wrong_password, unknown, unverified] {
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::InvalidCredentials))
        ));
    }
}

#[tokio::test]
async fn test_unknown_email_still_runs_password_check() {
    let h = harness();
    registered_client(&h, "ana@example.com", "password123").await;

    let result = h.auth.login("ana@example.com", "wrong-password").await;
    assert!(result.is_err());
    assert!(!h.auth.has_dummy_hash());

    let result = h.auth.login("nobody@example.com", "password123").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    assert!(h.auth.has_dummy_hash());
}

#[tokio::test]
async fn test_login_falls_through_to_company() {
    let h = harness();
    h.auth
        .register_company("shop@example.com", "Shop", "company-pass", None)
        .await
        .unwrap();
    let code = h.email.last_code("shop@example.com").unwrap();
    h.auth
        .verify_code("shop@example.com", &code, AccountKind::Empresa)
        .await
        .unwrap();

    let pair = h.auth.login("shop@example.com", "company-pass").await.unwrap();
    let claims = h.tokens.verify_access_token(&pair.access_token).await.unwrap();
    assert_eq!(claims.kind, AccountKind::Empresa);
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let h = harness();
    registered_client(&h, "ana@example.com", "password123").await;
    let pair = h.auth.login("ana@example.com", "password123").await.unwrap();

    let rotated = h.auth.refresh(&pair.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, pair.refresh_token);

    assert!(matches!(
        h.auth.refresh(&pair.refresh_token).await,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
    assert!(h.auth.refresh(&rotated.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let h = harness();
    registered_client(&h, "ana@example.com", "password123").await;
    let pair = h.auth.login("ana@example.com", "password123").await.unwrap();

    assert!(matches!(
        h.auth.refresh(&pair.access_token).await,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_logout_revokes_access_and_refresh() {
    let h = harness();
    registered_client(&h, "ana@example.com", "password123").await;
    let pair = h.auth.login("ana@example.com", "password123").await.unwrap();
    let claims = h.tokens.verify_access_token(&pair.access_token).await.unwrap();

    h.auth.logout(&claims, Some(&pair.refresh_token)).await.unwrap();

    assert!(matches!(
        h.tokens.verify_access_token(&pair.access_token).await,
        Err(DomainError::Token(TokenError::TokenRevoked))
    ));
    assert!(h.auth.refresh(&pair.refresh_token).await.is_err());
}

#[tokio::test]
async fn test_logout_ignores_foreign_refresh_token() {
    let h = harness();
    registered_client(&h, "ana@example.com", "password123").await;
    registered_client(&h, "bob@example.com", "password456").await;
    let ana = h.auth.login("ana@example.com", "password123").await.unwrap();
    let bob = h.auth.login("bob@example.com", "password456").await.unwrap();
    let ana_claims = h.tokens.verify_access_token(&ana.access_token).await.unwrap();

    h.auth.logout(&ana_claims, Some(&bob.refresh_token)).await.unwrap();

    assert!(h.auth.refresh(&bob.refresh_token).await.is_ok());
}
