//! Brevo Email Service Implementation
//!
//! Sends transactional email through the Brevo HTTP API.
//!
//! - Exponential backoff on rate limiting (429) and server errors (5xx)
//! - No retry on other client errors
//! - Recipient addresses are masked in logs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use mp_shared::config::EmailConfig;
use mp_shared::utils::mask_email;

use super::{EmailContent, EmailService};
use crate::InfrastructureError;

#[derive(Debug, Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Request body for `POST /v3/smtp/email`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: String,
}

/// Brevo email service implementation
pub struct BrevoEmailService {
    client: reqwest::Client,
    config: EmailConfig,
}

impl BrevoEmailService {
    /// Create a new Brevo email service
    pub fn new(config: EmailConfig) -> Result<Self, InfrastructureError> {
        if !config.is_configured() {
            return Err(InfrastructureError::Config(
                "EMAIL_API_KEY and EMAIL_SENDER must be set for Brevo".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            sender = %mask_email(&config.sender_email),
            "Brevo email service initialized"
        );

        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, to: &'a str, content: &'a EmailContent) -> SendRequest<'a> {
        SendRequest {
            sender: Contact {
                email: &self.config.sender_email,
                name: Some(self.config.sender_name.as_str()),
            },
            to: vec![Contact {
                email: to,
                name: None,
            }],
            subject: &content.subject,
            html_content: &content.html,
            text_content: &content.text,
        }
    }

    /// Whether a failed status is worth another attempt
    fn is_retryable(status: reqwest::StatusCode) -> bool {
        status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
    }

    async fn send_with_retry(
        &self,
        to: &str,
        content: &EmailContent,
    ) -> Result<String, InfrastructureError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);
        let body = self.request_body(to, content);

        loop {
            attempts += 1;
            debug!(
                attempt = attempts,
                max_attempts = max_attempts,
                email = %mask_email(to),
                "Sending email"
            );

            let result = self
                .client
                .post(&self.config.api_url)
                .header("api-key", &self.config.api_key)
                .header("accept", "application/json")
                .json(&body)
                .send()
                .await;

            let retryable = match result {
                Ok(response) if response.status().is_success() => {
                    let parsed: SendResponse = response.json().await?;
                    info!(
                        email = %mask_email(to),
                        message_id = %parsed.message_id,
                        "Email sent"
                    );
                    return Ok(parsed.message_id);
                }
                Ok(response) => {
                    let status = response.status();
                    let detail = response.text().await.unwrap_or_default();
                    error!(
                        status = %status,
                        attempt = attempts,
                        detail = %detail,
                        "Email provider rejected request"
                    );
                    if !Self::is_retryable(status) {
                        return Err(InfrastructureError::Email(format!(
                            "Provider returned {}: {}",
                            status, detail
                        )));
                    }
                    format!("provider returned {}", status)
                }
                Err(e) => {
                    error!(error = %e, attempt = attempts, "Email request failed");
                    e.to_string()
                }
            };

            if attempts >= max_attempts {
                return Err(InfrastructureError::Email(format!(
                    "Failed to send email after {} attempts: {}",
                    max_attempts, retryable
                )));
            }

            warn!(delay_ms = delay.as_millis() as u64, "Retrying email delivery");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

#[async_trait]
impl EmailService for BrevoEmailService {
    async fn send_email(&self, to: &str, content: &EmailContent) -> Result<String, InfrastructureError> {
        self.send_with_retry(to, content).await
    }

    fn provider_name(&self) -> &str {
        "Brevo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> EmailConfig {
        EmailConfig {
            provider: "brevo".to_string(),
            api_key: "test-key".to_string(),
            ..EmailConfig::default()
        }
    }

    #[test]
    fn test_requires_credentials() {
        assert!(BrevoEmailService::new(EmailConfig::default()).is_err());
        assert!(BrevoEmailService::new(configured()).is_ok());
    }

    #[test]
    fn test_request_body_shape() {
        let service = BrevoEmailService::new(configured()).unwrap();
        let content = EmailContent {
            subject: "Hola".to_string(),
            html: "<p>x</p>".to_string(),
            text: "x".to_string(),
        };

        let body = serde_json::to_value(service.request_body("ana@example.com", &content)).unwrap();

        assert_eq!(body["sender"]["email"], "no-reply@mercado.local");
        assert_eq!(body["to"][0]["email"], "ana@example.com");
        assert!(body["to"][0].get("name").is_none());
        assert_eq!(body["htmlContent"], "<p>x</p>");
        assert_eq!(body["textContent"], "x");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(BrevoEmailService::is_retryable(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(BrevoEmailService::is_retryable(reqwest::StatusCode::BAD_GATEWAY));
        assert!(!BrevoEmailService::is_retryable(reqwest::StatusCode::BAD_REQUEST));
        assert!(!BrevoEmailService::is_retryable(reqwest::StatusCode::UNAUTHORIZED));
    }
}
