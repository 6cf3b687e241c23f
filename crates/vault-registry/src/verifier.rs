//! Verification of staged direct uploads.
//!
//! Objects written through presigned tickets never touched the API, so
//! every envelope check runs again here. Valid objects are promoted into
//! the main store; invalid ones are deleted and the uploader is notified.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use vault_core::config::storage::StagingConfig;
use vault_core::result::AppResult;
use vault_core::traits::notify::Notifier;
use vault_core::traits::store::ObjectStore;

use crate::envelope::{FilePayload, ENCODED_CONTENT_TYPE, ENCODED_CONTENT_TYPE_KEY};
use crate::key::{self, ParsedKey};

/// What happened to one staged object.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// The envelope was valid and now lives in the main store.
    Promoted { key: String },
    /// The object was deleted and a rejection notice published.
    Rejected { key: String, reason: String },
}

/// Checks staged objects and promotes or rejects them.
#[derive(Debug, Clone)]
pub struct StagingVerifier {
    staging: Arc<dyn ObjectStore>,
    main: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
    config: StagingConfig,
}

impl StagingVerifier {
    pub fn new(
        staging: Arc<dyn ObjectStore>,
        main: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
        config: StagingConfig,
    ) -> Self {
        Self {
            staging,
            main,
            notifier,
            config,
        }
    }

    /// Verify one staged object by key.
    pub async fn verify(&self, object_key: &str) -> AppResult<VerifyOutcome> {
        let parsed = key::parse_key(object_key)?;
        let (bytes, meta) = self.staging.get(object_key).await?;

        if meta.size > self.config.max_upload_size_bytes() {
            return self
                .reject(object_key, &parsed, "exceeds the maximum allowed size.")
                .await;
        }

        let payload: FilePayload = match serde_json::from_slice(&bytes) {
            Ok(payload) => payload,
            Err(_) => {
                return self
                    .reject(object_key, &parsed, "has invalid json format.")
                    .await;
            }
        };

        let missing = payload.missing_parameters();
        if !missing.is_empty() {
            let reason = format!(
                "has these parameter(s) missing: '{}'.",
                missing.join(", ")
            );
            return self.reject(object_key, &parsed, &reason).await;
        }

        let metadata = HashMap::from([(
            ENCODED_CONTENT_TYPE_KEY.to_string(),
            ENCODED_CONTENT_TYPE.to_string(),
        )]);
        self.main.put(object_key, bytes, metadata).await?;
        self.staging.delete(object_key, None).await?;
        info!(key = %object_key, "Promoted staged upload");
        Ok(VerifyOutcome::Promoted {
            key: object_key.to_string(),
        })
    }

    /// Sweep the whole staging prefix, verifying every object found.
    /// Returns how many objects were processed; individual failures are
    /// logged and do not stop the sweep.
    pub async fn sweep(&self) -> AppResult<usize> {
        let listing = self.staging.list("", None).await?;
        let mut processed = 0;
        for meta in listing.objects {
            // A key that never came from an upload ticket has no owner to
            // notify and would otherwise sit in staging forever.
            if key::parse_key(&meta.key).is_err() {
                warn!(key = %meta.key, "Deleting staged object with malformed key");
                match self.staging.delete(&meta.key, None).await {
                    Ok(()) => processed += 1,
                    Err(e) => {
                        warn!(key = %meta.key, error = %e, "Failed to delete malformed staged object");
                    }
                }
                continue;
            }
            match self.verify(&meta.key).await {
                Ok(outcome) => {
                    processed += 1;
                    if let VerifyOutcome::Rejected { key, reason } = outcome {
                        warn!(key = %key, reason = %reason, "Rejected staged upload");
                    }
                }
                Err(e) => {
                    warn!(key = %meta.key, error = %e, "Failed to verify staged upload");
                }
            }
        }
        Ok(processed)
    }

    /// Delete a bad staged object and publish a rejection notice. The
    /// notice is best-effort; a publish failure never resurrects the
    /// object.
    async fn reject(
        &self,
        object_key: &str,
        parsed: &ParsedKey,
        reason: &str,
    ) -> AppResult<VerifyOutcome> {
        self.staging.delete(object_key, None).await?;

        let subject = format!("{} - {}", parsed.contract_number, parsed.filename_stem);
        let message = format!(
            "The filename: {} of the contract number: {} {}",
            parsed.filename_stem, parsed.contract_number, reason
        );
        if let Err(e) = self.notifier.publish(&subject, &message).await {
            warn!(key = %object_key, error = %e, "Failed to publish rejection notice");
        }
        Ok(VerifyOutcome::Rejected {
            key: object_key.to_string(),
            reason: reason.to_string(),
        })
    }
}
