//! Provider trait definitions
//!
//! `FileStore` is the contract a storage backend implements. The two
//! smaller traits are the narrow interfaces a provider consumes from the
//! host: browser-facing download URLs and read-access validation. A
//! provider calls them but never implements them.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageResult;
use crate::file::{FileBody, ListOptions, ListPage, StoredFile};

/// A storage backend holding binary files with attached metadata.
///
/// Implementations block the caller for the duration of the remote
/// round-trip and perform no internal scheduling or retries; transient
/// failures surface as classified [`crate::StorageError`] values.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Provider name, recorded in the `origin` metadata of every write
    fn name(&self) -> &str;

    /// Whether this provider is the registry default
    fn is_default(&self) -> bool;

    /// Store raw bytes under a freshly minted key. Title and size
    /// metadata are not recorded; the MIME type defaults to a generic
    /// binary type.
    async fn store_bytes(&self, data: Bytes) -> StorageResult<String>;

    /// Store a byte stream under a freshly minted key. A read failure on
    /// the input stream is a transport-level error, not a store error.
    async fn store_stream(&self, stream: FileBody) -> StorageResult<String>;

    /// Store a named file with its full metadata set. `file.content`
    /// must be populated.
    async fn store_file(&self, file: &StoredFile) -> StorageResult<String>;

    /// Look up a file by key. Returns `Ok(None)` for blank keys (without
    /// contacting the store) and for objects whose metadata set is
    /// empty. With `with_content`, the object bytes are downloaded in
    /// the same logical operation.
    async fn fetch(&self, key: &str, with_content: bool) -> StorageResult<Option<StoredFile>>;

    /// Stream the content of an object.
    async fn open_stream(&self, key: &str) -> StorageResult<FileBody>;

    /// Delete an object. Blank keys and already-absent keys are success.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List objects in the backing store.
    async fn list(&self, options: ListOptions) -> StorageResult<ListPage>;

    /// Probe the store with a minimal call. Never errors; every failure
    /// degrades to `false`.
    async fn health_check(&self) -> bool;

    /// Front-office download URL for a key
    fn download_url_fo(&self, key: &str, extra: Option<&HashMap<String, String>>) -> String;

    /// Back-office download URL for a key
    fn download_url_bo(&self, key: &str, extra: Option<&HashMap<String, String>>) -> String;

    /// Validate that a principal may read a key
    fn check_access(&self, key: &str, principal: &str) -> StorageResult<()>;
}

/// Maps a storage key to a browser-facing URL. Implemented by the host;
/// front-office and back-office surfaces produce different URLs and may
/// embed extra query data.
pub trait DownloadUrlProvider: Send + Sync {
    fn front_office_url(
        &self,
        key: &str,
        store: &str,
        extra: Option<&HashMap<String, String>>,
    ) -> String;

    fn back_office_url(
        &self,
        key: &str,
        store: &str,
        extra: Option<&HashMap<String, String>>,
    ) -> String;
}

/// Validates that a principal may read a key. Implemented by the host.
pub trait AccessPolicy: Send + Sync {
    fn check_read(&self, key: &str, principal: &str) -> StorageResult<()>;
}
