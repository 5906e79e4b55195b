//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository and notifier traits for the
//! Mercado backend.
//!
//! ## Architecture
//!
//! - **Database**: MySQL repositories using SQLx, with embedded migrations
//! - **Email**: transactional email via the Brevo HTTP API, plus a mock for
//!   development and tests

// Re-export core types for convenience
pub use mp_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Email module - outbound transactional email
pub mod email;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email delivery error
    #[error("Email service error: {0}")]
    Email(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Internal {
            message: error.to_string(),
        }
    }
}
