//! Request and response bodies

pub mod auth;
pub mod catalog;
pub mod error;
pub mod order;

pub use error::ErrorResponseExt;
pub use mp_shared::ErrorResponse;

use serde::{Deserialize, Serialize};

/// Body of endpoints that only report an outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
