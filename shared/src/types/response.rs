//! API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body returned by `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Service name
    pub service: String,

    /// Server version
    pub version: String,

    /// Whether the database answered the probe
    pub database: bool,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(service: impl Into<String>, version: impl Into<String>, database: bool) -> Self {
        Self {
            status: if database { "healthy" } else { "degraded" }.to_string(),
            service: service.into(),
            version: version.into(),
            database,
            timestamp: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.database
    }
}
