//! The stored JSON envelope.
//!
//! File content never hits the store raw: every version is a JSON document
//! carrying the declared content type, the original filename, and the
//! base64-encoded bytes. The same envelope shape is accepted over the API
//! and expected from direct staged uploads.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use vault_core::error::AppError;
use vault_core::result::AppResult;

/// Metadata key stamped on every stored envelope object.
pub const ENCODED_CONTENT_TYPE_KEY: &str = "encoded_content_type";

/// Metadata value marking an object as a JSON envelope.
pub const ENCODED_CONTENT_TYPE: &str = "application/json";

/// JSON document stored as the body of every version object.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilePayload {
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub filename: String,
    /// Base64-encoded file bytes.
    #[serde(default)]
    pub file: String,
}

impl FilePayload {
    /// Names of required fields that are absent or empty.
    pub fn missing_parameters(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.content_type.is_empty() {
            missing.push("content_type");
        }
        if self.filename.is_empty() {
            missing.push("filename");
        }
        if self.file.is_empty() {
            missing.push("file");
        }
        missing
    }

    /// Reject envelopes with missing fields or non-base64 content.
    pub fn validate(&self) -> AppResult<()> {
        let missing = self.missing_parameters();
        if !missing.is_empty() {
            return Err(AppError::validation(format!(
                "'{}' parameter(s) is/are missing.",
                missing.join(", ")
            )));
        }
        if BASE64.decode(&self.file).is_err() {
            return Err(AppError::validation(
                "The 'file' parameter must be base64 encoded.",
            ));
        }
        Ok(())
    }
}
