//! Version resolution over live store listings.
//!
//! The store is the only source of truth: "latest" is recomputed from a
//! prefix listing on every call, never cached. Objects under a record
//! prefix whose version id does not parse are logged and ignored so one
//! foreign object cannot break an entire record.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::warn;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::store::ObjectStore;
use vault_core::types::object::ObjectMeta;

use crate::key;

/// One entry in a version history listing.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub is_latest: bool,
    pub archived: bool,
}

/// Latest-version summary of one file within a contract.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub filename: String,
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub archived: bool,
}

/// A version id paired with the metadata of its object.
pub(crate) type VersionEntry = (String, ObjectMeta);

/// Resolves version ids and file summaries from store listings.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    store: Arc<dyn ObjectStore>,
}

impl VersionResolver {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// All parseable versions of one file, oldest first.
    ///
    /// Ties within one second fall back to full-id order, which the
    /// zero-padded collision suffix makes chronological.
    pub(crate) async fn record_versions(
        &self,
        contract_number: &str,
        stem: &str,
    ) -> AppResult<Vec<VersionEntry>> {
        let prefix = key::record_prefix(contract_number, stem);
        let listing = self.store.list(&prefix, None).await?;

        let mut entries: Vec<(NaiveDateTime, VersionEntry)> = Vec::new();
        for meta in listing.objects {
            let Ok(parsed) = key::parse_key(&meta.key) else {
                warn!(key = %meta.key, "Skipping object with malformed key");
                continue;
            };
            let Some(ts) = key::parse_version_timestamp(&parsed.version_id) else {
                warn!(key = %meta.key, "Skipping object with unparseable version id");
                continue;
            };
            entries.push((ts, (parsed.version_id, meta)));
        }
        entries.sort_by(|a, b| (a.0, &a.1 .0).cmp(&(b.0, &b.1 .0)));
        Ok(entries.into_iter().map(|(_, entry)| entry).collect())
    }

    /// Version id of the newest version of a file.
    pub async fn resolve_latest(&self, contract_number: &str, stem: &str) -> AppResult<String> {
        let versions = self.record_versions(contract_number, stem).await?;
        versions
            .into_iter()
            .next_back()
            .map(|(version_id, _)| version_id)
            .ok_or_else(|| AppError::not_found("File not found."))
    }

    /// Full version history of a file, newest first.
    pub async fn list_versions(
        &self,
        contract_number: &str,
        stem: &str,
    ) -> AppResult<Vec<VersionInfo>> {
        let mut versions = self.record_versions(contract_number, stem).await?;
        if versions.is_empty() {
            return Err(AppError::not_found("Filename not found."));
        }
        versions.reverse();
        Ok(versions
            .into_iter()
            .enumerate()
            .map(|(i, (version_id, meta))| VersionInfo {
                version_id,
                last_modified: meta.last_modified,
                size: meta.size,
                is_latest: i == 0,
                archived: meta.storage_class.is_archived(),
            })
            .collect())
    }

    /// Latest-version summaries of every file in a contract, sorted by
    /// filename.
    pub async fn list_current_files(
        &self,
        contract_number: &str,
    ) -> AppResult<Vec<FileSummary>> {
        let prefix = key::contract_prefix(contract_number);
        let listing = self.store.list(&prefix, Some("/")).await?;
        if listing.common_prefixes.is_empty() {
            return Err(AppError::not_found("Contract Number not found."));
        }

        let mut summaries = Vec::with_capacity(listing.common_prefixes.len());
        for record_prefix in &listing.common_prefixes {
            let Some(stem) = record_prefix
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix('/'))
            else {
                warn!(prefix = %record_prefix, "Skipping unexpected common prefix");
                continue;
            };
            let versions = self.record_versions(contract_number, stem).await?;
            let Some((version_id, meta)) = versions.into_iter().next_back() else {
                // A record folder with no parseable versions has nothing
                // current to report.
                continue;
            };
            summaries.push(FileSummary {
                filename: stem.to_string(),
                version_id,
                last_modified: meta.last_modified,
                size: meta.size,
                archived: meta.storage_class.is_archived(),
            });
        }
        if summaries.is_empty() {
            return Err(AppError::not_found("Contract Number not found."));
        }
        summaries.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(summaries)
    }
}
