//! Integration tests for the registration flow across services

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;

use mp_core::domain::entities::AccountKind;
use mp_core::errors::{AuthError, DomainError};
use mp_core::repositories::InMemoryStore;
use mp_core::services::{
    AuthService, AuthServiceConfig, EmailServiceTrait, TokenService, TokenServiceConfig,
    VerificationService, VerificationServiceConfig,
};

// Email service that records the codes it was asked to send
#[derive(Default)]
struct RecordingEmail {
    codes: Mutex<HashMap<String, Vec<String>>>,
}

impl RecordingEmail {
    fn codes(&self, email: &str) -> Vec<String> {
        self.codes.lock().unwrap().get(email).cloned().unwrap_or_default()
    }

    fn latest(&self, email: &str) -> String {
        self.codes(email).last().cloned().expect("no code sent")
    }
}

#[async_trait]
impl EmailServiceTrait for RecordingEmail {
    async fn send_verification_code(
        &self,
        email: &str,
        code: &str,
        _expires_in_seconds: i64,
    ) -> Result<String, String> {
        self.codes
            .lock()
            .unwrap()
            .entry(email.to_string())
            .or_default()
            .push(code.to_string());
        Ok("recorded".to_string())
    }

    async fn send_welcome(&self, _email: &str, _name: &str) -> Result<String, String> {
        Ok("recorded".to_string())
    }
}

struct App {
    store: InMemoryStore,
    email: Arc<RecordingEmail>,
    verification: Arc<VerificationService>,
    auth: Arc<AuthService>,
}

fn app() -> App {
    let store = InMemoryStore::new();
    let email = Arc::new(RecordingEmail::default());
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
    let auth = Arc::new(AuthService::new(
        Arc::new(store.clone()),
        verification.clone(),
        tokens,
        AuthServiceConfig {
            bcrypt_cost: 4,
            ..Default::default()
        },
    ));
    App {
        store,
        email,
        verification,
        auth,
    }
}

#[tokio::test]
async fn test_full_registration_flow() {
    let app = app();

    app.auth
        .register_client("ana@example.com", "Ana", "password123")
        .await
        .unwrap();
    assert!(app.auth.login("ana@example.com", "password123").await.is_err());

    let code = app.email.latest("ana@example.com");
    let view = app
        .auth
        .verify_code("ana@example.com", &code, AccountKind::Cliente)
        .await
        .unwrap();

    assert_eq!(view.email, "ana@example.com");
    assert_eq!(app.store.account_count(AccountKind::Cliente).await, 1);
    assert!(app
        .store
        .codes_for("ana@example.com", AccountKind::Cliente)
        .await
        .is_empty());
    assert!(app.auth.login("ana@example.com", "password123").await.is_ok());
}

#[tokio::test]
async fn test_same_email_may_register_as_both_kinds() {
    let app = app();

    app.auth
        .register_client("dual@example.com", "Dual", "password123")
        .await
        .unwrap();
    app.auth
        .register_company("dual@example.com", "Dual SA", "password123", None)
        .await
        .unwrap();

    assert_eq!(app.email.codes("dual@example.com").len(), 2);
}

#[tokio::test]
async fn test_resend_after_expiry_unlocks_registration() {
    let app = app();
    app.auth
        .register_client("ana@example.com", "Ana", "password123")
        .await
        .unwrap();
    let first = app.email.latest("ana@example.com");

    app.store
        .age_codes("ana@example.com", AccountKind::Cliente, Duration::seconds(61))
        .await;
    assert!(matches!(
        app.auth
            .verify_code("ana@example.com", &first, AccountKind::Cliente)
            .await,
        Err(DomainError::Auth(AuthError::InvalidOrExpiredCode))
    ));

    app.auth
        .resend_code("ana@example.com", AccountKind::Cliente)
        .await
        .unwrap();
    let second = app.email.latest("ana@example.com");
    app.auth
        .verify_code("ana@example.com", &second, AccountKind::Cliente)
        .await
        .unwrap();

    assert!(app.auth.login("ana@example.com", "password123").await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verification_has_one_winner() {
    let app = app();
    app.auth
        .register_client("race@example.com", "Race", "password123")
        .await
        .unwrap();
    let code = app.email.latest("race@example.com");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let verification = app.verification.clone();
            let code = code.clone();
            tokio::spawn(async move {
                verification
                    .verify_code("race@example.com", &code, AccountKind::Cliente)
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(DomainError::Auth(AuthError::InvalidOrExpiredCode)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(app.store.account_count(AccountKind::Cliente).await, 1);
}
