//! Mock Email Service Implementation
//!
//! Logs messages instead of sending them and remembers the last code sent to
//! each address, which lets local clients and tests complete registration.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use mp_shared::utils::mask_email;

use super::{templates, EmailContent, EmailService};
use crate::InfrastructureError;

/// Mock email service for development and testing
#[derive(Clone, Default)]
pub struct MockEmailService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures
    simulate_failure: Arc<AtomicBool>,
    /// Last verification code per recipient
    codes: Arc<Mutex<HashMap<String, String>>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails every send
    pub fn failing() -> Self {
        let service = Self::default();
        service.set_simulate_failure(true);
        service
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Last verification code sent to the address
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.codes
            .lock()
            .ok()
            .and_then(|codes| codes.get(email).cloned())
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, to: &str, content: &EmailContent) -> Result<String, InfrastructureError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                email = %mask_email(to),
                "Mock email service simulating failure"
            );
            return Err(InfrastructureError::Email(
                "Simulated email sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            target: "email_service",
            provider = "mock",
            email = %mask_email(to),
            message_id = %message_id,
            count = count,
            subject = %content.subject,
            "Mock email sent"
        );

        Ok(message_id)
    }

    async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        expires_in_seconds: i64,
    ) -> Result<String, InfrastructureError> {
        let content = templates::verification_email(code, expires_in_seconds);
        let message_id = self.send_email(to, &content).await?;

        if let Ok(mut codes) = self.codes.lock() {
            codes.insert(to.to_string(), code.to_string());
        }
        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
