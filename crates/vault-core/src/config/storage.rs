//! Object-store and registry configuration.

use serde::{Deserialize, Serialize};

/// Object-store connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Main bucket holding all file versions.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Staging bucket for large-payload ingestion.
    #[serde(default = "default_staging_bucket")]
    pub staging_bucket: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint URL (for S3-compatible services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// Access key ID. Empty means the SDK default credential chain.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            staging_bucket: default_staging_bucket(),
            region: default_region(),
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

/// Registry behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Content length at or above which `get` answers with a presigned
    /// URL instead of inline bytes.
    #[serde(default = "default_inline_threshold")]
    pub inline_threshold_bytes: u64,
    /// Lifetime of presigned download URLs in seconds.
    #[serde(default = "default_presign_ttl")]
    pub download_ttl_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            inline_threshold_bytes: default_inline_threshold(),
            download_ttl_seconds: default_presign_ttl(),
        }
    }
}

/// Staging-area configuration for large-payload ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Maximum accepted staged payload size in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_size_mb: u64,
    /// Lifetime of upload tickets in seconds.
    #[serde(default = "default_presign_ttl")]
    pub upload_ttl_seconds: u64,
    /// Interval between verifier sweeps of the staging bucket, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl StagingConfig {
    /// Maximum accepted staged payload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1_048_576
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: default_max_upload_mb(),
            upload_ttl_seconds: default_presign_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_bucket() -> String {
    "contract-vault-files".to_string()
}

fn default_staging_bucket() -> String {
    "contract-vault-staging".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_inline_threshold() -> u64 {
    6_290_000 // just under 6 MiB
}

fn default_presign_ttl() -> u64 {
    300
}

fn default_max_upload_mb() -> u64 {
    100
}

fn default_sweep_interval() -> u64 {
    60
}
