use std::sync::Arc;

use chrono::Duration;

use super::mocks::MockEmailService;
use crate::domain::entities::{AccountKind, PendingAccount};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{AccountRepository, InMemoryStore};
use crate::services::verification::{VerificationService, VerificationServiceConfig};

const EMAIL: &str = "ana@example.com";

fn setup() -> (VerificationService, InMemoryStore, Arc<MockEmailService>) {
    let store = InMemoryStore::new();
    let email = Arc::new(MockEmailService::new());
    let service = VerificationService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        email.clone(),
        VerificationServiceConfig::default(),
    );
    (service, store, email)
}

fn client() -> PendingAccount {
    PendingAccount::Cliente {
        name: "Ana".into(),
        password_hash: "$2b$04$hash".into(),
    }
}

fn assert_auth(result: Result<impl std::fmt::Debug, DomainError>, expected: AuthError) {
    match result {
        Err(DomainError::Auth(actual)) => assert_eq!(actual, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[tokio::test]
async fn test_issue_code_sends_email_with_configured_window() {
    let (service, _store, email) = setup();
    let code = service.issue_code("  Ana@Example.com ", client()).await.unwrap();

    assert_eq!(code.email, EMAIL);
    assert_eq!(email.last_code(EMAIL), Some(code.code.clone()));
    assert_eq!(*email.expiry_seen.lock().unwrap(), Some(60));
}

#[tokio::test]
async fn test_duplicate_pending_registration_is_rejected() {
    let (service, store, email) = setup();
    service.issue_code(EMAIL, client()).await.unwrap();

    assert_auth(
        service.issue_code(EMAIL, client()).await,
        AuthError::DuplicatePendingRequest,
    );
    assert_eq!(email.count(), 1);
    assert_eq!(store.codes_for(EMAIL, AccountKind::Cliente).await.len(), 1);
}

#[tokio::test]
async fn test_same_email_may_register_as_other_kind() {
    let (service, _store, _email) = setup();
    service.issue_code(EMAIL, client()).await.unwrap();
    let company = PendingAccount::Empresa {
        name: "Ana SL".into(),
        password_hash: "hash".into(),
        logo: None,
    };
    assert!(service.issue_code(EMAIL, company).await.is_ok());
}

#[tokio::test]
async fn test_issue_rejects_registered_email() {
    let (service, _store, _email) = setup();
    let code = service.issue_code(EMAIL, client()).await.unwrap();
    service.verify_code(EMAIL, &code.code, AccountKind::Cliente).await.unwrap();

    assert_auth(
        service.issue_code(EMAIL, client()).await,
        AuthError::EmailAlreadyRegistered,
    );
}

#[tokio::test]
async fn test_issue_rejects_malformed_email() {
    let (service, _store, _email) = setup();
    assert!(matches!(
        service.issue_code("not-an-email", client()).await,
        Err(DomainError::ValidationErr(_))
    ));
}

#[tokio::test]
async fn test_failed_email_invalidates_code() {
    let (service, store, email) = setup();
    email.set_failing(true);

    assert_auth(
        service.issue_code(EMAIL, client()).await,
        AuthError::VerificationEmailFailed,
    );
    let codes = store.codes_for(EMAIL, AccountKind::Cliente).await;
    assert_eq!(codes.len(), 1);
    assert!(codes[0].is_used);

    // The user can try again straight away
    email.set_failing(false);
    assert!(service.issue_code(EMAIL, client()).await.is_ok());
}

#[tokio::test]
async fn test_verify_creates_exactly_one_account_and_purges_codes() {
    let (service, store, _email) = setup();
    let code = service.issue_code(EMAIL, client()).await.unwrap();

    let account = service
        .verify_code(EMAIL, &code.code, AccountKind::Cliente)
        .await
        .unwrap();

    assert!(account.is_verified);
    assert_eq!(account.name, "Ana");
    assert_eq!(account.password_hash, "$2b$04$hash");
    assert_eq!(store.account_count(AccountKind::Cliente).await, 1);
    assert!(store.codes_for(EMAIL, AccountKind::Cliente).await.is_empty());
}

#[tokio::test]
async fn test_code_is_single_use() {
    let (service, _store, _email) = setup();
    let code = service.issue_code(EMAIL, client()).await.unwrap();
    service.verify_code(EMAIL, &code.code, AccountKind::Cliente).await.unwrap();

    assert_auth(
        service.verify_code(EMAIL, &code.code, AccountKind::Cliente).await,
        AuthError::InvalidOrExpiredCode,
    );
}

#[tokio::test]
async fn test_wrong_code_and_wrong_kind_are_rejected() {
    let (service, store, _email) = setup();
    let code = service.issue_code(EMAIL, client()).await.unwrap();
    let wrong = if code.code == "123456" { "654321" } else { "123456" };

    assert_auth(
        service.verify_code(EMAIL, wrong, AccountKind::Cliente).await,
        AuthError::InvalidOrExpiredCode,
    );
    assert_auth(
        service.verify_code(EMAIL, &code.code, AccountKind::Empresa).await,
        AuthError::InvalidOrExpiredCode,
    );
    assert_auth(
        service.verify_code(EMAIL, "12ab56", AccountKind::Cliente).await,
        AuthError::InvalidOrExpiredCode,
    );
    assert_eq!(store.account_count(AccountKind::Cliente).await, 0);
}

#[tokio::test]
async fn test_expired_code_is_rejected() {
    let (service, store, _email) = setup();
    let code = service.issue_code(EMAIL, client()).await.unwrap();
    store.age_codes(EMAIL, AccountKind::Cliente, Duration::seconds(61)).await;

    assert_auth(
        service.verify_code(EMAIL, &code.code, AccountKind::Cliente).await,
        AuthError::InvalidOrExpiredCode,
    );
}

#[tokio::test]
async fn test_corrupt_payload_fails_closed_without_writes() {
    let (service, store, _email) = setup();
    let code = service.issue_code(EMAIL, client()).await.unwrap();
    store
        .overwrite_payloads(EMAIL, AccountKind::Cliente, r#"{"kind":"empresa","name":"x","password_hash":"y"}"#)
        .await;

    assert_auth(
        service.verify_code(EMAIL, &code.code, AccountKind::Cliente).await,
        AuthError::CorruptPendingState,
    );
    assert_eq!(store.account_count(AccountKind::Cliente).await, 0);
    let codes = store.codes_for(EMAIL, AccountKind::Cliente).await;
    assert_eq!(codes.len(), 1);
    assert!(!codes[0].is_used);
}

#[tokio::test]
async fn test_resend_without_registration_is_silent_noop() {
    let (service, store, email) = setup();
    let result = service.resend_code(EMAIL, AccountKind::Cliente).await.unwrap();

    assert!(result.is_none());
    assert_eq!(email.count(), 0);
    assert!(store.codes_for(EMAIL, AccountKind::Cliente).await.is_empty());
}

#[tokio::test]
async fn test_resend_invalidates_old_code_and_keeps_payload() {
    let (service, store, email) = setup();
    let first = service.issue_code(EMAIL, client()).await.unwrap();
    store.set_code(first.id, "111111").await;

    let second = service
        .resend_code(EMAIL, AccountKind::Cliente)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.pending_payload, first.pending_payload);
    assert_eq!(email.last_code(EMAIL), Some(second.code.clone()));
    store.set_code(second.id, "222222").await;

    assert_auth(
        service.verify_code(EMAIL, "111111", AccountKind::Cliente).await,
        AuthError::InvalidOrExpiredCode,
    );
    let account = service
        .verify_code(EMAIL, "222222", AccountKind::Cliente)
        .await
        .unwrap();
    assert_eq!(account.name, "Ana");
}

#[tokio::test]
async fn test_resend_revives_expired_registration() {
    let (service, store, _email) = setup();
    service.issue_code(EMAIL, client()).await.unwrap();
    store.age_codes(EMAIL, AccountKind::Cliente, Duration::seconds(61)).await;

    let fresh = service
        .resend_code(EMAIL, AccountKind::Cliente)
        .await
        .unwrap()
        .unwrap();
    assert!(service
        .verify_code(EMAIL, &fresh.code, AccountKind::Cliente)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_resend_email_failure_surfaces() {
    let (service, _store, email) = setup();
    service.issue_code(EMAIL, client()).await.unwrap();
    email.set_failing(true);

    assert_auth(
        service.resend_code(EMAIL, AccountKind::Cliente).await,
        AuthError::VerificationEmailFailed,
    );
}

#[tokio::test]
async fn test_cleanup_expired_removes_only_expired() {
    let (service, store, _email) = setup();
    service.issue_code(EMAIL, client()).await.unwrap();
    service.issue_code("bob@example.com", client()).await.unwrap();
    store.age_codes(EMAIL, AccountKind::Cliente, Duration::seconds(120)).await;

    assert_eq!(service.cleanup_expired().await.unwrap(), 1);
    assert_eq!(store.codes_for("bob@example.com", AccountKind::Cliente).await.len(), 1);
}

#[tokio::test]
async fn test_verified_account_is_findable_by_email() {
    let (service, store, _email) = setup();
    let code = service.issue_code(EMAIL, client()).await.unwrap();
    let account = service
        .verify_code(EMAIL, &code.code, AccountKind::Cliente)
        .await
        .unwrap();

    let found = store
        .find_by_email(AccountKind::Cliente, EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, account.id);
}
