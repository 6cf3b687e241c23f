//! In-memory versioned object store.
//!
//! Models exactly the slice of a versioned blob store the registry relies
//! on: per-key version stacks with store-native version ids, where the
//! newest entry is the live version. Used by every test suite in place of
//! a real bucket.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::store::ObjectStore;
use vault_core::types::object::{ObjectListing, ObjectMeta, StorageClass, UploadTicket};

/// One stored version record of a key.
#[derive(Debug, Clone)]
struct StoredVersion {
    store_version: String,
    data: Bytes,
    metadata: HashMap<String, String>,
    storage_class: StorageClass,
    last_modified: DateTime<Utc>,
}

/// In-memory versioned object store.
///
/// Keys map to a stack of version records; the last entry is live. A
/// `copy` pushes a new record, a versioned `delete` removes exactly one —
/// the same two-step dance the tiering engine performs against S3.
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    bucket: String,
    objects: Arc<RwLock<BTreeMap<String, Vec<StoredVersion>>>>,
    counter: Arc<AtomicU64>,
}

impl MemoryObjectStore {
    /// Create an empty in-memory store under a bucket name (used only in
    /// the fake presigned URLs it hands out).
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    fn next_version(&self) -> String {
        format!("mv-{:06}", self.counter.fetch_add(1, Ordering::SeqCst))
    }

    fn meta_of(key: &str, v: &StoredVersion) -> ObjectMeta {
        ObjectMeta {
            key: key.to_string(),
            size: v.data.len() as u64,
            last_modified: v.last_modified,
            storage_class: v.storage_class,
            store_version: Some(v.store_version.clone()),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(
        &self,
        key: &str,
        data: Bytes,
        metadata: HashMap<String, String>,
    ) -> AppResult<Option<String>> {
        let store_version = self.next_version();
        let mut objects = self.objects.write().await;
        objects.entry(key.to_string()).or_default().push(StoredVersion {
            store_version: store_version.clone(),
            data,
            metadata,
            storage_class: StorageClass::Standard,
            last_modified: Utc::now(),
        });
        Ok(Some(store_version))
    }

    async fn get(&self, key: &str) -> AppResult<(Bytes, ObjectMeta)> {
        let objects = self.objects.read().await;
        let live = objects
            .get(key)
            .and_then(|versions| versions.last())
            .ok_or_else(|| AppError::not_found(format!("object {key} not found")))?;
        Ok((live.data.clone(), Self::meta_of(key, live)))
    }

    async fn head(&self, key: &str) -> AppResult<ObjectMeta> {
        let objects = self.objects.read().await;
        let live = objects
            .get(key)
            .and_then(|versions| versions.last())
            .ok_or_else(|| AppError::not_found(format!("object {key} not found")))?;
        Ok(Self::meta_of(key, live))
    }

    async fn list(&self, prefix: &str, delimiter: Option<&str>) -> AppResult<ObjectListing> {
        let objects = self.objects.read().await;
        let mut listing = ObjectListing::default();
        for (key, versions) in objects.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            let Some(live) = versions.last() else { continue };
            if let Some(delim) = delimiter {
                let rest = &key[prefix.len()..];
                if let Some(idx) = rest.find(delim) {
                    let common = format!("{prefix}{}", &rest[..idx + delim.len()]);
                    if listing.common_prefixes.last() != Some(&common) {
                        listing.common_prefixes.push(common);
                    }
                    continue;
                }
            }
            listing.objects.push(Self::meta_of(key, live));
        }
        Ok(listing)
    }

    async fn delete(&self, key: &str, store_version: Option<&str>) -> AppResult<()> {
        let mut objects = self.objects.write().await;
        if let Some(versions) = objects.get_mut(key) {
            match store_version {
                Some(v) => versions.retain(|sv| sv.store_version != v),
                None => {
                    versions.pop();
                }
            }
            if versions.is_empty() {
                objects.remove(key);
            }
        }
        // Deleting a missing key is a silent success, as on S3.
        Ok(())
    }

    async fn copy(
        &self,
        src: &str,
        dst: &str,
        storage_class: StorageClass,
    ) -> AppResult<Option<String>> {
        let store_version = self.next_version();
        let mut objects = self.objects.write().await;
        let live = objects
            .get(src)
            .and_then(|versions| versions.last())
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("object {src} not found")))?;
        objects.entry(dst.to_string()).or_default().push(StoredVersion {
            store_version: store_version.clone(),
            data: live.data,
            metadata: live.metadata,
            storage_class,
            last_modified: Utc::now(),
        });
        Ok(Some(store_version))
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.head(key).await?;
        Ok(format!(
            "memory://{}/{}?expires_in={}",
            self.bucket,
            key,
            ttl.as_secs()
        ))
    }

    async fn presign_put(&self, key: &str, ttl: Duration) -> AppResult<UploadTicket> {
        Ok(UploadTicket {
            url: format!("memory://{}/{}", self.bucket, key),
            method: "PUT".to_string(),
            key: key.to_string(),
            expires_in_seconds: ttl.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryObjectStore::new("test-bucket");
        let data = Bytes::from("hello world");
        store
            .put("a/b/c.txt", data.clone(), HashMap::new())
            .await
            .unwrap();

        let (read_back, meta) = store.get("a/b/c.txt").await.unwrap();
        assert_eq!(read_back, data);
        assert_eq!(meta.size, 11);
        assert_eq!(meta.storage_class, StorageClass::Standard);

        store.delete("a/b/c.txt", None).await.unwrap();
        assert!(store.get("a/b/c.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_copy_changes_class_and_version() {
        let store = MemoryObjectStore::new("test-bucket");
        store
            .put("k", Bytes::from("payload"), HashMap::new())
            .await
            .unwrap();
        let before = store.head("k").await.unwrap();

        let new_version = store
            .copy("k", "k", StorageClass::GlacierIr)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(Some(new_version.clone()), before.store_version);

        store
            .delete("k", before.store_version.as_deref())
            .await
            .unwrap();

        let after = store.head("k").await.unwrap();
        assert_eq!(after.storage_class, StorageClass::GlacierIr);
        assert_eq!(after.store_version, Some(new_version));

        let (data, _) = store.get("k").await.unwrap();
        assert_eq!(data, Bytes::from("payload"));
    }

    #[tokio::test]
    async fn test_list_with_delimiter() {
        let store = MemoryObjectStore::new("test-bucket");
        for key in [
            "c1/report/20240101_000000.txt",
            "c1/report/20240102_000000.txt",
            "c1/invoice/20240101_000000.txt",
            "c2/other/20240101_000000.txt",
        ] {
            store.put(key, Bytes::from("x"), HashMap::new()).await.unwrap();
        }

        let listing = store.list("c1/", Some("/")).await.unwrap();
        assert_eq!(listing.common_prefixes, vec!["c1/invoice/", "c1/report/"]);
        assert!(listing.objects.is_empty());

        let flat = store.list("c1/", None).await.unwrap();
        assert_eq!(flat.objects.len(), 3);

        let report = store.list("c1/report/", None).await.unwrap();
        assert_eq!(report.objects.len(), 2);
    }

    #[tokio::test]
    async fn test_presign() {
        let store = MemoryObjectStore::new("test-bucket");
        store.put("k", Bytes::from("x"), HashMap::new()).await.unwrap();

        let url = store
            .presign_get("k", Duration::from_secs(300))
            .await
            .unwrap();
        assert!(url.starts_with("memory://test-bucket/k"));

        // presign_get on a missing key fails, presign_put does not need
        // the key to exist yet
        assert!(store.presign_get("nope", Duration::from_secs(1)).await.is_err());
        let ticket = store
            .presign_put("nope", Duration::from_secs(300))
            .await
            .unwrap();
        assert_eq!(ticket.method, "PUT");
    }
}
