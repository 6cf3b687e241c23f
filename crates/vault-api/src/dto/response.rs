//! Response DTOs.

use serde::Serialize;

/// Simple message response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response to a successful create or update.
#[derive(Debug, Clone, Serialize)]
pub struct WriteFileResponse {
    /// Canonical outcome message.
    pub message: String,
    /// Version id assigned to the stored object.
    pub version_id: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
