//! Authentication service module
//!
//! Login, registration intake, verification, refresh rotation and logout.

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
