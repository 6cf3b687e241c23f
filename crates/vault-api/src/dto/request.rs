//! Request DTOs.

use serde::Deserialize;
use validator::Validate;

use vault_registry::envelope::FilePayload;

/// Body of a create or update request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WriteFileRequest {
    /// Declared MIME type of the decoded file.
    #[validate(length(min = 1, message = "content_type must not be empty"))]
    #[serde(default)]
    pub content_type: String,
    /// Original filename, extension included.
    #[validate(length(min = 1, message = "filename must not be empty"))]
    #[serde(default)]
    pub filename: String,
    /// Base64-encoded file bytes.
    #[validate(length(min = 1, message = "file must not be empty"))]
    #[serde(default)]
    pub file: String,
}

impl From<WriteFileRequest> for FilePayload {
    fn from(req: WriteFileRequest) -> Self {
        Self {
            content_type: req.content_type,
            filename: req.filename,
            file: req.file,
        }
    }
}

/// Body of an update request; the filename comes from the route path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFileRequest {
    /// Declared MIME type of the decoded file.
    #[validate(length(min = 1, message = "content_type must not be empty"))]
    #[serde(default)]
    pub content_type: String,
    /// Base64-encoded file bytes.
    #[validate(length(min = 1, message = "file must not be empty"))]
    #[serde(default)]
    pub file: String,
}

impl UpdateFileRequest {
    /// Build the stored envelope with the path-supplied filename.
    pub fn into_payload(self, filename: &str) -> FilePayload {
        FilePayload {
            content_type: self.content_type,
            filename: filename.to_string(),
            file: self.file,
        }
    }
}

/// `?version_id=` query on get, delete, and archive routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionQuery {
    pub version_id: Option<String>,
}
