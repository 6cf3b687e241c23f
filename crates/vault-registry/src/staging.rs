//! Presigned direct uploads into the staging bucket.
//!
//! Large files bypass the API body limit: the client asks for an upload
//! ticket, PUTs the envelope straight to the staging store, and the
//! verifier later promotes or rejects the staged object.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use vault_core::config::storage::StagingConfig;
use vault_core::result::AppResult;
use vault_core::traits::store::ObjectStore;
use vault_core::types::object::UploadTicket;

use crate::key;

/// Issues upload tickets against the staging store.
#[derive(Debug, Clone)]
pub struct StagingService {
    staging: Arc<dyn ObjectStore>,
    config: StagingConfig,
}

impl StagingService {
    pub fn new(staging: Arc<dyn ObjectStore>, config: StagingConfig) -> Self {
        Self { staging, config }
    }

    /// Presign a direct upload for one new version of a file.
    ///
    /// No existence check happens here; create-vs-update semantics are
    /// enforced when the verifier promotes the staged object.
    pub async fn request_upload(
        &self,
        contract_number: &str,
        filename: &str,
    ) -> AppResult<UploadTicket> {
        key::validate_contract_number(contract_number)?;
        let stem = key::validate_stem(filename)?;

        let version_id = key::derive_version_id(chrono::Utc::now());
        let object_key = key::object_key(contract_number, stem, &version_id);
        let ticket = self
            .staging
            .presign_put(
                &object_key,
                Duration::from_secs(self.config.upload_ttl_seconds),
            )
            .await?;
        info!(key = %object_key, "Issued staging upload ticket");
        Ok(ticket)
    }
}
