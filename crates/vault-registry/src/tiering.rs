//! Storage tiering: moving versions from active storage to the archive
//! tier.
//!
//! An archive transition is a copy of the object onto its own key with the
//! archive storage class, followed by deletion of the superseded store
//! version. The object key never changes, so archived versions stay
//! visible to listings and version history.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::store::ObjectStore;
use vault_core::types::object::{ObjectMeta, StorageClass};

use crate::key;
use crate::resolver::VersionResolver;

/// Target class for archive transitions.
const ARCHIVE_CLASS: StorageClass = StorageClass::GlacierIr;

/// Outcome of archiving a single version.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivedVersion {
    pub version_id: String,
    /// Store-native version id of the archived copy, when the store
    /// reports one.
    pub store_version: Option<String>,
}

/// Point at which a bulk archive run stopped.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveFailure {
    /// Version id (or object key, for contract-wide runs) that failed.
    pub target: String,
    pub message: String,
}

/// Aggregate outcome of a bulk archive run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveReport {
    /// Version ids (or keys) transitioned by this run.
    pub archived: Vec<String>,
    /// Version ids (or keys) that were already archived.
    pub skipped: Vec<String>,
    /// Set when the run aborted partway.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<ArchiveFailure>,
}

impl ArchiveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// Executes archive transitions against the object store.
#[derive(Debug, Clone)]
pub struct TieringEngine {
    store: Arc<dyn ObjectStore>,
    resolver: VersionResolver,
}

impl TieringEngine {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        let resolver = VersionResolver::new(Arc::clone(&store));
        Self { store, resolver }
    }

    /// Archive one specific version of a file.
    ///
    /// Already-archived versions are a conflict here; bulk runs treat the
    /// same condition as a skip.
    pub async fn archive_version(
        &self,
        contract_number: &str,
        stem: &str,
        version_id: &str,
    ) -> AppResult<ArchivedVersion> {
        let object_key = key::object_key(contract_number, stem, version_id);
        let meta = self.store.head(&object_key).await.map_err(|e| {
            if e.kind == ErrorKind::NotFound {
                AppError::not_found("File not found.")
            } else {
                e
            }
        })?;
        self.transition(&object_key, version_id, &meta).await
    }

    /// Archive every active version of one file, oldest first.
    ///
    /// A store failure aborts the run; the report records how far it got.
    pub async fn archive_all_versions(
        &self,
        contract_number: &str,
        stem: &str,
    ) -> AppResult<ArchiveReport> {
        let versions = self.resolver.record_versions(contract_number, stem).await?;
        if versions.is_empty() {
            return Err(AppError::not_found("File not found."));
        }

        let mut report = ArchiveReport::default();
        for (version_id, meta) in versions {
            let object_key = key::object_key(contract_number, stem, &version_id);
            self.archive_into_report(&object_key, &version_id, &meta, &mut report)
                .await;
            if !report.is_complete() {
                break;
            }
        }
        Ok(report)
    }

    /// Archive every active version of every file in a contract.
    pub async fn archive_contract(&self, contract_number: &str) -> AppResult<ArchiveReport> {
        let prefix = key::contract_prefix(contract_number);
        let listing = self.store.list(&prefix, None).await?;
        if listing.is_empty() {
            return Err(AppError::not_found("Contract Number not found."));
        }

        let mut report = ArchiveReport::default();
        for listed in listing.objects {
            let object_key = listed.key.clone();
            // Listings do not carry store-native version ids, so re-head
            // each object before transitioning it.
            let meta = match self.store.head(&object_key).await {
                Ok(meta) => meta,
                Err(e) if e.kind == ErrorKind::NotFound => continue,
                Err(e) => {
                    report.failed = Some(ArchiveFailure {
                        target: object_key,
                        message: e.message,
                    });
                    break;
                }
            };
            self.archive_into_report(&object_key, &object_key, &meta, &mut report)
                .await;
            if !report.is_complete() {
                break;
            }
        }
        Ok(report)
    }

    /// Run one transition as part of a bulk pass, folding the outcome
    /// into the report. Already-archived targets become skips.
    async fn archive_into_report(
        &self,
        object_key: &str,
        target: &str,
        meta: &ObjectMeta,
        report: &mut ArchiveReport,
    ) {
        if meta.storage_class.is_archived() {
            report.skipped.push(target.to_string());
            return;
        }
        match self.transition(object_key, target, meta).await {
            Ok(_) => report.archived.push(target.to_string()),
            // Raced with another archiver between listing and copy.
            Err(e) if e.kind == ErrorKind::Conflict => report.skipped.push(target.to_string()),
            Err(e) => {
                report.failed = Some(ArchiveFailure {
                    target: target.to_string(),
                    message: e.message,
                });
            }
        }
    }

    async fn transition(
        &self,
        object_key: &str,
        version_id: &str,
        meta: &ObjectMeta,
    ) -> AppResult<ArchivedVersion> {
        match meta.storage_class {
            StorageClass::Glacier => Err(AppError::conflict(
                "The file is already on Glacier storage.",
            )),
            StorageClass::GlacierIr => Err(AppError::conflict(
                "The file is already on Glacier Instant Retrieval storage.",
            )),
            StorageClass::Standard => {
                let store_version = self
                    .store
                    .copy(object_key, object_key, ARCHIVE_CLASS)
                    .await?;
                // On an unversioned store the copy replaces the object in
                // place and there is no superseded version to remove.
                if let Some(old_version) = meta.store_version.as_deref() {
                    self.store.delete(object_key, Some(old_version)).await?;
                }
                info!(key = %object_key, class = %ARCHIVE_CLASS, "Archived object");
                Ok(ArchivedVersion {
                    version_id: version_id.to_string(),
                    store_version,
                })
            }
        }
    }
}
