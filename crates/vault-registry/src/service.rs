//! Lifecycle operations over the versioned file registry.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use vault_core::config::storage::RegistryConfig;
use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::store::ObjectStore;

use crate::envelope::{FilePayload, ENCODED_CONTENT_TYPE, ENCODED_CONTENT_TYPE_KEY};
use crate::key;
use crate::resolver::{FileSummary, VersionInfo, VersionResolver};
use crate::tiering::{ArchiveReport, ArchivedVersion, TieringEngine};

/// Response to a successful write.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedVersion {
    pub version_id: String,
}

/// How a file read is fulfilled: inline for small objects, a presigned
/// URL once the envelope exceeds the configured threshold.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FileContent {
    Inline {
        content_type: String,
        filename: String,
        encoded_file: String,
    },
    Presigned {
        presigned_url: String,
    },
}

/// The file registry: every lifecycle operation the API exposes.
///
/// Stateless over an [`ObjectStore`]; each call re-reads the store, so
/// concurrent instances (or restarts) never disagree.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    store: Arc<dyn ObjectStore>,
    resolver: VersionResolver,
    tiering: TieringEngine,
    config: RegistryConfig,
}

impl FileRegistry {
    pub fn new(store: Arc<dyn ObjectStore>, config: RegistryConfig) -> Self {
        let resolver = VersionResolver::new(Arc::clone(&store));
        let tiering = TieringEngine::new(Arc::clone(&store));
        Self {
            store,
            resolver,
            tiering,
            config,
        }
    }

    /// Store the first version of a new file.
    pub async fn create(
        &self,
        contract_number: &str,
        payload: FilePayload,
    ) -> AppResult<CreatedVersion> {
        key::validate_contract_number(contract_number)?;
        payload.validate()?;
        let stem = key::validate_stem(&payload.filename)?.to_string();

        let existing = self.record_version_ids(contract_number, &stem).await?;
        if !existing.is_empty() {
            return Err(AppError::conflict(
                "A filename already exists in that contract_number.",
            ));
        }
        self.write_version(contract_number, &stem, &payload, &existing)
            .await
    }

    /// Store a new version of an existing file.
    pub async fn update(
        &self,
        contract_number: &str,
        payload: FilePayload,
    ) -> AppResult<CreatedVersion> {
        key::validate_contract_number(contract_number)?;
        payload.validate()?;
        let stem = key::validate_stem(&payload.filename)?.to_string();

        let existing = self.record_version_ids(contract_number, &stem).await?;
        if existing.is_empty() {
            return Err(AppError::not_found("Filename not found."));
        }
        self.write_version(contract_number, &stem, &payload, &existing)
            .await
    }

    /// Fetch a file version, the latest when `version_id` is `None`.
    pub async fn get(
        &self,
        contract_number: &str,
        filename: &str,
        version_id: Option<&str>,
    ) -> AppResult<FileContent> {
        key::validate_contract_number(contract_number)?;
        let stem = key::validate_stem(filename)?;

        let version = match version_id {
            Some(v) => v.to_string(),
            None => self.resolver.resolve_latest(contract_number, stem).await?,
        };
        let object_key = key::object_key(contract_number, stem, &version);
        let meta = self.store.head(&object_key).await.map_err(|e| {
            if e.kind == ErrorKind::NotFound {
                AppError::not_found("File not found.")
            } else {
                e
            }
        })?;
        if meta.storage_class.is_archived() {
            return Err(AppError::conflict(
                "File is in Glacier storage, you must restore it first.",
            ));
        }

        if meta.size >= self.config.inline_threshold_bytes {
            let url = self
                .store
                .presign_get(
                    &object_key,
                    Duration::from_secs(self.config.download_ttl_seconds),
                )
                .await?;
            return Ok(FileContent::Presigned { presigned_url: url });
        }

        let (bytes, _) = self.store.get(&object_key).await?;
        let stored: FilePayload = serde_json::from_slice(&bytes)?;
        Ok(FileContent::Inline {
            content_type: stored.content_type,
            filename: stored.filename,
            encoded_file: stored.file,
        })
    }

    /// Latest-version summaries of every file in a contract.
    pub async fn list(&self, contract_number: &str) -> AppResult<Vec<FileSummary>> {
        key::validate_contract_number(contract_number)?;
        self.resolver.list_current_files(contract_number).await
    }

    /// Full version history of one file, newest first.
    pub async fn list_versions(
        &self,
        contract_number: &str,
        filename: &str,
    ) -> AppResult<Vec<VersionInfo>> {
        key::validate_contract_number(contract_number)?;
        let stem = key::validate_stem(filename)?;
        self.resolver.list_versions(contract_number, stem).await
    }

    /// Delete one version of a file, the latest when `version_id` is
    /// `None`.
    pub async fn delete(
        &self,
        contract_number: &str,
        filename: &str,
        version_id: Option<&str>,
    ) -> AppResult<()> {
        key::validate_contract_number(contract_number)?;
        let stem = key::validate_stem(filename)?;

        let version = match version_id {
            Some(v) => v.to_string(),
            None => self.resolver.resolve_latest(contract_number, stem).await?,
        };
        let object_key = key::object_key(contract_number, stem, &version);
        self.store.head(&object_key).await.map_err(|e| {
            if e.kind == ErrorKind::NotFound {
                AppError::not_found("File not found.")
            } else {
                e
            }
        })?;
        self.store.delete(&object_key, None).await?;
        info!(key = %object_key, "Deleted object");
        Ok(())
    }

    /// Archive one specific version of a file.
    pub async fn dismiss_version(
        &self,
        contract_number: &str,
        filename: &str,
        version_id: &str,
    ) -> AppResult<ArchivedVersion> {
        key::validate_contract_number(contract_number)?;
        let stem = key::validate_stem(filename)?;
        self.tiering
            .archive_version(contract_number, stem, version_id)
            .await
    }

    /// Archive every active version of one file.
    pub async fn dismiss_file(
        &self,
        contract_number: &str,
        filename: &str,
    ) -> AppResult<ArchiveReport> {
        key::validate_contract_number(contract_number)?;
        let stem = key::validate_stem(filename)?;
        let report = self
            .tiering
            .archive_all_versions(contract_number, stem)
            .await?;
        Self::complete_or_fail(report)
    }

    /// Archive every active version of every file in a contract.
    pub async fn dismiss_contract(&self, contract_number: &str) -> AppResult<ArchiveReport> {
        key::validate_contract_number(contract_number)?;
        let report = self.tiering.archive_contract(contract_number).await?;
        Self::complete_or_fail(report)
    }

    /// Turn a partial bulk-archive report into an error carrying the
    /// progress made before the abort.
    fn complete_or_fail(report: ArchiveReport) -> AppResult<ArchiveReport> {
        match &report.failed {
            None => Ok(report),
            Some(failure) => {
                let message = format!(
                    "Archival stopped at '{}': {}",
                    failure.target, failure.message
                );
                Err(AppError::internal(message).with_details(serde_json::to_value(&report)?))
            }
        }
    }

    async fn record_version_ids(
        &self,
        contract_number: &str,
        stem: &str,
    ) -> AppResult<HashSet<String>> {
        let prefix = key::record_prefix(contract_number, stem);
        let listing = self.store.list(&prefix, None).await?;
        Ok(listing
            .objects
            .into_iter()
            .filter_map(|meta| key::parse_key(&meta.key).ok())
            .map(|parsed| parsed.version_id)
            .collect())
    }

    async fn write_version(
        &self,
        contract_number: &str,
        stem: &str,
        payload: &FilePayload,
        taken: &HashSet<String>,
    ) -> AppResult<CreatedVersion> {
        let base = key::derive_version_id(Utc::now());
        let version_id = key::next_available(&base, taken)?;
        let object_key = key::object_key(contract_number, stem, &version_id);

        let body = serde_json::to_vec(payload)?;
        let metadata = HashMap::from([(
            ENCODED_CONTENT_TYPE_KEY.to_string(),
            ENCODED_CONTENT_TYPE.to_string(),
        )]);
        self.store.put(&object_key, body.into(), metadata).await?;
        info!(key = %object_key, "Stored file version");
        Ok(CreatedVersion { version_id })
    }
}
