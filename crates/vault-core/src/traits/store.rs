//! Object store trait for pluggable versioned blob-store backends.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;
use crate::types::object::{ObjectListing, ObjectMeta, StorageClass, UploadTicket};

/// Trait for versioned blob-store backends.
///
/// The registry treats the store as the sole owner of object bytes and
/// metadata; every operation re-derives truth from a live call, never from
/// cached state. The [`ObjectStore`] trait is defined here in `vault-core`
/// and implemented in `vault-storage`.
///
/// Consistency contract: a single `put`/`delete`/`copy` is atomic per key.
/// Nothing spanning multiple keys or multiple versions is.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// Write an object, returning the store-native version id of the new
    /// live version (if the store reports one).
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        metadata: HashMap<String, String>,
    ) -> AppResult<Option<String>>;

    /// Read the live version of an object. Fails with `NotFound` if the
    /// key has no live version.
    async fn get(&self, key: &str) -> AppResult<(Bytes, ObjectMeta)>;

    /// Fetch metadata of the live version without the body. Fails with
    /// `NotFound` if the key has no live version.
    async fn head(&self, key: &str) -> AppResult<ObjectMeta>;

    /// List live objects under a prefix. With a delimiter, keys below the
    /// first delimiter occurrence collapse into `common_prefixes`.
    async fn list(&self, prefix: &str, delimiter: Option<&str>) -> AppResult<ObjectListing>;

    /// Delete an object. With a store-native version id, removes exactly
    /// that version record; without one, removes the live version.
    async fn delete(&self, key: &str, store_version: Option<&str>) -> AppResult<()>;

    /// Copy the live version of `src` to `dst` with the given storage
    /// class, carrying the source metadata over unchanged. Returns the
    /// store-native version id of the copy. `src == dst` is the storage-
    /// class transition used by the tiering engine.
    async fn copy(
        &self,
        src: &str,
        dst: &str,
        storage_class: StorageClass,
    ) -> AppResult<Option<String>>;

    /// Produce a time-limited direct-download URL for the live version.
    async fn presign_get(&self, key: &str, ttl: Duration) -> AppResult<String>;

    /// Produce a time-limited direct-upload ticket for the given key.
    async fn presign_put(&self, key: &str, ttl: Duration) -> AppResult<UploadTicket>;
}
