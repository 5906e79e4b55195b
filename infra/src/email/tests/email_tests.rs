use std::sync::Arc;

use mp_core::services::verification::EmailServiceTrait;
use mp_shared::config::EmailConfig;

use crate::email::templates::{describe_window, verification_email};
use crate::email::{create_email_service, EmailService, EmailServiceAdapter, MockEmailService};

#[test]
fn test_window_wording() {
    assert_eq!(describe_window(60), "1 minuto");
    assert_eq!(describe_window(300), "5 minutos");
    assert_eq!(describe_window(45), "45 segundos");
    assert_eq!(describe_window(90), "90 segundos");
}

#[test]
fn test_verification_copy_uses_enforced_window() {
    let content = verification_email("123456", 60);
    assert!(content.text.contains("123456"));
    assert!(content.text.contains("1 minuto"));
    assert!(content.html.contains("123456"));
}

#[tokio::test]
async fn test_mock_records_codes() {
    let mock = MockEmailService::new();
    mock.send_verification_code("ana@example.com", "654321", 60)
        .await
        .unwrap();

    assert_eq!(mock.last_code_for("ana@example.com").as_deref(), Some("654321"));
    assert_eq!(mock.get_message_count(), 1);
}

#[tokio::test]
async fn test_mock_failure_simulation() {
    let mock = MockEmailService::failing();
    assert!(mock.send_welcome("ana@example.com", "Ana").await.is_err());
    assert_eq!(mock.get_message_count(), 0);

    mock.set_simulate_failure(false);
    assert!(mock.send_welcome("ana@example.com", "Ana").await.is_ok());
}

#[tokio::test]
async fn test_adapter_maps_errors_to_strings() {
    let adapter = EmailServiceAdapter::new(Arc::new(MockEmailService::failing()));
    let err = adapter
        .send_verification_code("ana@example.com", "123456", 60)
        .await
        .unwrap_err();
    assert!(err.contains("Simulated"));
}

#[test]
fn test_factory_falls_back_to_mock() {
    let unknown = EmailConfig {
        provider: "carrier-pigeon".to_string(),
        ..EmailConfig::default()
    };
    assert_eq!(create_email_service(&unknown).provider_name(), "Mock");

    let unconfigured = EmailConfig {
        provider: "brevo".to_string(),
        ..EmailConfig::default()
    };
    assert_eq!(create_email_service(&unconfigured).provider_name(), "Mock");
}
