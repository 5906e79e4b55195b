//! Type definitions shared by the HTTP layer
//!
//! - `language` - Accept-Language negotiation
//! - `response` - Health check payload

pub mod language;
pub mod response;

pub use language::Language;
pub use response::HealthResponse;
