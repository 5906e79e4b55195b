//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - JWT access and refresh token generation
//! - Verification against issuer, audience, type and the revocation denylist
//! - Revocation on logout and refresh rotation

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::TokenService;
