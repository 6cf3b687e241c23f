//! Object-store value types: storage classes, metadata, listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage tier of a stored object version.
///
/// `Glacier` and `GlacierIr` are both archived tiers; the registry only
/// ever *writes* `GlacierIr`, but objects archived out-of-band may carry
/// either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageClass {
    /// Regular, immediately readable storage.
    Standard,
    /// Deep archive tier; reads require an explicit restore.
    Glacier,
    /// Instant-retrieval archive tier.
    GlacierIr,
}

impl StorageClass {
    /// Whether this class counts as archived for registry purposes.
    pub fn is_archived(self) -> bool {
        matches!(self, Self::Glacier | Self::GlacierIr)
    }

    /// Parse a provider-reported storage class string.
    ///
    /// Unknown classes (e.g. intelligent tiering variants) are treated as
    /// active storage.
    pub fn from_provider(s: &str) -> Self {
        match s {
            "GLACIER" => Self::Glacier,
            "GLACIER_IR" => Self::GlacierIr,
            _ => Self::Standard,
        }
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "STANDARD"),
            Self::Glacier => write!(f, "GLACIER"),
            Self::GlacierIr => write!(f, "GLACIER_IR"),
        }
    }
}

/// Metadata about a stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Full object key within the bucket.
    pub key: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modified timestamp.
    pub last_modified: DateTime<Utc>,
    /// Storage tier.
    pub storage_class: StorageClass,
    /// Store-native version identifier of the live object, if the store
    /// reports one.
    pub store_version: Option<String>,
}

/// Result of a prefix listing.
#[derive(Debug, Clone, Default)]
pub struct ObjectListing {
    /// Live objects under the prefix.
    pub objects: Vec<ObjectMeta>,
    /// Common prefixes (one level below the delimiter), when a delimiter
    /// was supplied.
    pub common_prefixes: Vec<String>,
}

impl ObjectListing {
    /// Whether the listing found nothing at all.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.common_prefixes.is_empty()
    }
}

/// A scoped, time-limited credential for uploading directly to the
/// staging area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTicket {
    /// URL to upload to.
    pub url: String,
    /// HTTP method the upload must use.
    pub method: String,
    /// Object key the upload will land under.
    pub key: String,
    /// Seconds until the ticket expires.
    pub expires_in_seconds: u64,
}
