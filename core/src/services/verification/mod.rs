//! Verification engine for email-based registration
//!
//! This module owns the pending-registration lifecycle:
//! - Code issuance for a parked registration
//! - Verification, which promotes the registration to an account
//! - Resend, which supersedes live codes and carries the registration forward
//! - Sweeping of expired codes

mod config;
mod service;
mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::EmailServiceTrait;
