//! S3-compatible object storage provider (requires the `s3` feature).
//!
//! Works against AWS S3 and S3-compatible services (MinIO, etc.) via a
//! custom endpoint. The bucket is expected to have native versioning
//! enabled — the tiering engine relies on per-version deletes.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{MetadataDirective, StorageClass as S3StorageClass};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use vault_core::config::storage::StorageConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::store::ObjectStore;
use vault_core::types::object::{ObjectListing, ObjectMeta, StorageClass, UploadTicket};

/// S3-backed object store.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3 object store over the given bucket.
    ///
    /// Empty `access_key` means the SDK default credential chain; explicit
    /// credentials switch to path-style addressing for compatibility with
    /// non-AWS services.
    pub async fn new(cfg: &StorageConfig, bucket: impl Into<String>) -> AppResult<Self> {
        let bucket = bucket.into();
        let region = Region::new(cfg.region.clone());
        tracing::info!(bucket = %bucket, region = %cfg.region, "Initializing S3 object store");

        let client = if cfg.access_key.is_empty() {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            Client::new(&shared)
        } else {
            let credentials = Credentials::new(
                cfg.access_key.clone(),
                cfg.secret_key.clone(),
                None,
                None,
                "vault-config",
            );
            let mut builder = aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .credentials_provider(credentials)
                .region(region)
                .force_path_style(true);
            if !cfg.endpoint.is_empty() {
                builder = builder.endpoint_url(&cfg.endpoint);
            }
            Client::from_conf(builder.build())
        };

        Ok(Self { client, bucket })
    }

    fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> DateTime<Utc> {
        DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()).unwrap_or_else(Utc::now)
    }

    fn to_s3_class(class: StorageClass) -> S3StorageClass {
        match class {
            StorageClass::Standard => S3StorageClass::Standard,
            StorageClass::Glacier => S3StorageClass::Glacier,
            StorageClass::GlacierIr => S3StorageClass::GlacierIr,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn put(
        &self,
        key: &str,
        data: Bytes,
        metadata: HashMap<String, String>,
    ) -> AppResult<Option<String>> {
        let out = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .set_metadata(Some(metadata))
            .send()
            .await
            .map_err(|e| AppError::storage(format!("s3 put {key} failed: {e}")))?;
        Ok(out.version_id().map(String::from))
    }

    async fn get(&self, key: &str) -> AppResult<(Bytes, ObjectMeta)> {
        let out = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(out) => out,
            Err(err) => {
                let svc = err.into_service_error();
                if svc.is_no_such_key() {
                    return Err(AppError::not_found(format!("s3 object {key} not found")));
                }
                return Err(AppError::storage(format!("s3 get {key} failed: {svc}")));
            }
        };

        let meta = ObjectMeta {
            key: key.to_string(),
            size: out.content_length().unwrap_or(0).max(0) as u64,
            last_modified: out.last_modified().map(Self::to_chrono).unwrap_or_else(Utc::now),
            storage_class: out
                .storage_class()
                .map(|c| StorageClass::from_provider(c.as_str()))
                .unwrap_or(StorageClass::Standard),
            store_version: out.version_id().map(String::from),
        };
        let data = out
            .body
            .collect()
            .await
            .map_err(|e| AppError::storage(format!("s3 get {key} body read failed: {e}")))?
            .into_bytes();
        Ok((data, meta))
    }

    async fn head(&self, key: &str) -> AppResult<ObjectMeta> {
        let out = match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(out) => out,
            Err(err) => {
                let svc = err.into_service_error();
                if svc.is_not_found() {
                    return Err(AppError::not_found(format!("s3 object {key} not found")));
                }
                return Err(AppError::storage(format!("s3 head {key} failed: {svc}")));
            }
        };

        Ok(ObjectMeta {
            key: key.to_string(),
            size: out.content_length().unwrap_or(0).max(0) as u64,
            last_modified: out.last_modified().map(Self::to_chrono).unwrap_or_else(Utc::now),
            storage_class: out
                .storage_class()
                .map(|c| StorageClass::from_provider(c.as_str()))
                .unwrap_or(StorageClass::Standard),
            store_version: out.version_id().map(String::from),
        })
    }

    async fn list(&self, prefix: &str, delimiter: Option<&str>) -> AppResult<ObjectListing> {
        let mut listing = ObjectListing::default();
        let mut token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if let Some(delim) = delimiter {
                req = req.delimiter(delim);
            }
            if let Some(t) = &token {
                req = req.continuation_token(t);
            }
            let out = req
                .send()
                .await
                .map_err(|e| AppError::storage(format!("s3 list {prefix} failed: {e}")))?;

            for obj in out.contents() {
                let Some(key) = obj.key() else { continue };
                listing.objects.push(ObjectMeta {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0).max(0) as u64,
                    last_modified: obj
                        .last_modified()
                        .map(Self::to_chrono)
                        .unwrap_or_else(Utc::now),
                    storage_class: obj
                        .storage_class()
                        .map(|c| StorageClass::from_provider(c.as_str()))
                        .unwrap_or(StorageClass::Standard),
                    store_version: None,
                });
            }
            for cp in out.common_prefixes() {
                if let Some(p) = cp.prefix() {
                    listing.common_prefixes.push(p.to_string());
                }
            }

            token = out.next_continuation_token().map(String::from);
            if token.is_none() {
                break;
            }
        }

        Ok(listing)
    }

    async fn delete(&self, key: &str, store_version: Option<&str>) -> AppResult<()> {
        let mut req = self.client.delete_object().bucket(&self.bucket).key(key);
        if let Some(v) = store_version {
            req = req.version_id(v);
        }
        req.send()
            .await
            .map_err(|e| AppError::storage(format!("s3 delete {key} failed: {e}")))?;
        Ok(())
    }

    async fn copy(
        &self,
        src: &str,
        dst: &str,
        storage_class: StorageClass,
    ) -> AppResult<Option<String>> {
        let out = self
            .client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, src))
            .key(dst)
            .storage_class(Self::to_s3_class(storage_class))
            .metadata_directive(MetadataDirective::Copy)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("s3 copy {src} -> {dst} failed: {e}")))?;
        Ok(out.version_id().map(String::from))
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| AppError::configuration(format!("invalid presign ttl: {e}")))?;
        let req = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::storage(format!("s3 presign get {key} failed: {e}")))?;
        Ok(req.uri().to_string())
    }

    async fn presign_put(&self, key: &str, ttl: Duration) -> AppResult<UploadTicket> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| AppError::configuration(format!("invalid presign ttl: {e}")))?;
        let req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::storage(format!("s3 presign put {key} failed: {e}")))?;
        Ok(UploadTicket {
            url: req.uri().to_string(),
            method: req.method().to_string(),
            key: key.to_string(),
            expires_in_seconds: ttl.as_secs(),
        })
    }
}
