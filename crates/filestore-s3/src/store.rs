//! S3-backed file store
//!
//! Implements the host file-store contract over an S3-compatible bucket.
//! Object metadata carries the host's descriptive fields; keys are
//! minted from the configured path template. All SDK failures cross the
//! [`classify`] boundary and surface as [`StorageError`] kinds.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ChecksumMode;
use aws_sdk_s3::Client;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::OnceCell;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};

use filestore_core::{
    AccessPolicy, DownloadUrlProvider, FileBody, FileStore, ListOptions, ListPage, ObjectSummary,
    StorageError, StorageResult, StoredFile,
};

use crate::client::build_client;
use crate::config::{ConnectionProfile, S3StorageSettings};
use crate::metadata::FileMetadata;
use crate::path;

/// MIME type recorded when the caller provides no name context
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// File-store provider backed by an S3-compatible bucket.
///
/// Each instance owns its connection profile and its lazily built
/// client; nothing is shared across instances.
pub struct S3FileStore {
    name: String,
    default_store: bool,
    profile: ConnectionProfile,
    client: OnceCell<Client>,
    download_urls: Arc<dyn DownloadUrlProvider>,
    access_policy: Option<Arc<dyn AccessPolicy>>,
}

impl S3FileStore {
    pub fn new(
        name: impl Into<String>,
        default_store: bool,
        settings: S3StorageSettings,
        download_urls: Arc<dyn DownloadUrlProvider>,
        access_policy: Option<Arc<dyn AccessPolicy>>,
    ) -> Self {
        Self {
            name: name.into(),
            default_store,
            profile: ConnectionProfile::from(settings),
            client: OnceCell::new(),
            download_urls,
            access_policy,
        }
    }

    /// The lazily built client. The cell resolves a concurrent first-use
    /// race to a single winner and caches nothing on failure, so a
    /// misconfigured adapter re-attempts construction on its next
    /// operation instead of staying poisoned.
    async fn client(&self) -> StorageResult<&Client> {
        self.client
            .get_or_try_init(|| build_client(&self.profile))
            .await
    }

    /// Mint a fresh storage key from the configured template, prefixed
    /// with the base path.
    fn mint_key(&self) -> String {
        let resolved = path::resolve(&self.profile.default_path, &self.profile.site_code);
        normalize_key(&format!("{}/{}", self.profile.base_path, resolved))
    }

    async fn put(&self, key: &str, meta: &FileMetadata, body: Bytes) -> StorageResult<()> {
        let client = self.client().await?;
        debug!("PUT {} ({} bytes, {})", key, body.len(), meta.mime_type);
        client
            .put_object()
            .bucket(&self.profile.bucket)
            .key(key)
            .set_metadata(Some(meta.encode()))
            .checksum_algorithm(self.profile.checksum_algorithm.clone())
            .content_type(&meta.mime_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| classify(e, key))?;
        Ok(())
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_default(&self) -> bool {
        self.default_store
    }

    async fn store_bytes(&self, data: Bytes) -> StorageResult<String> {
        let key = self.mint_key();
        let meta = FileMetadata {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            size: data.len() as u64,
            title: String::new(),
            origin: self.name.clone(),
        };
        self.put(&key, &meta, data).await?;
        Ok(key)
    }

    async fn store_stream(&self, mut stream: FileBody) -> StorageResult<String> {
        let key = self.mint_key();
        let mut buf = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StorageError::Stream {
                key: key.clone(),
                message: e.to_string(),
            })?;
            buf.extend_from_slice(&chunk);
        }
        let meta = FileMetadata {
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            size: buf.len() as u64,
            title: String::new(),
            origin: self.name.clone(),
        };
        self.put(&key, &meta, Bytes::from(buf)).await?;
        Ok(key)
    }

    async fn store_file(&self, file: &StoredFile) -> StorageResult<String> {
        let Some(content) = file.content.clone() else {
            return Err(StorageError::BadRequest {
                key: file.title.clone(),
                message: "file has no content to store".to_string(),
            });
        };
        let key = self.mint_key();
        let meta = FileMetadata {
            mime_type: if file.mime_type.is_empty() {
                DEFAULT_MIME_TYPE.to_string()
            } else {
                file.mime_type.clone()
            },
            size: if file.size > 0 {
                file.size
            } else {
                content.len() as u64
            },
            title: file.title.clone(),
            origin: self.name.clone(),
        };
        self.put(&key, &meta, content).await?;
        Ok(key)
    }

    async fn fetch(&self, key: &str, with_content: bool) -> StorageResult<Option<StoredFile>> {
        if key.trim().is_empty() {
            debug!("blank key, nothing to fetch");
            return Ok(None);
        }

        let client = self.client().await?;
        debug!("HEAD {}", key);
        let head = client
            .head_object()
            .bucket(&self.profile.bucket)
            .key(key)
            .checksum_mode(ChecksumMode::Enabled)
            .send()
            .await
            .map_err(|e| classify(e, key))?;

        // Objects written by other tools carry no metadata; the contract
        // reads a wholly empty map as "absent", not as empty fields.
        let Some(meta) = head.metadata().and_then(FileMetadata::decode) else {
            return Ok(None);
        };

        let mut file = meta.into_file(key);
        if with_content {
            debug!("GET {}", key);
            let object = client
                .get_object()
                .bucket(&self.profile.bucket)
                .key(key)
                .checksum_mode(ChecksumMode::Enabled)
                .send()
                .await
                .map_err(|e| classify(e, key))?;
            let data = object
                .body
                .collect()
                .await
                .map_err(|e| StorageError::Stream {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
            file.content = Some(data.into_bytes());
        }

        Ok(Some(file))
    }

    async fn open_stream(&self, key: &str) -> StorageResult<FileBody> {
        if key.trim().is_empty() {
            return Err(StorageError::NotFound {
                key: key.to_string(),
            });
        }
        let client = self.client().await?;
        debug!("GET {} (stream)", key);
        let object = client
            .get_object()
            .bucket(&self.profile.bucket)
            .key(key)
            .checksum_mode(ChecksumMode::Enabled)
            .send()
            .await
            .map_err(|e| classify(e, key))?;
        let reader = object.body.into_async_read();
        Ok(Box::pin(ReaderStream::new(reader)))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if key.trim().is_empty() {
            debug!("blank key, nothing to delete");
            return Ok(());
        }
        let client = self.client().await?;
        debug!("DELETE {}", key);
        // Deleting an absent key succeeds; the store's delete is
        // idempotent.
        client
            .delete_object()
            .bucket(&self.profile.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(e, key))?;
        Ok(())
    }

    async fn list(&self, options: ListOptions) -> StorageResult<ListPage> {
        let client = self.client().await?;
        let prefix = options.prefix.unwrap_or_default();
        debug!("LIST prefix={}", prefix);

        let mut request = client.list_objects_v2().bucket(&self.profile.bucket);
        if !prefix.is_empty() {
            request = request.prefix(&prefix);
        }
        if let Some(limit) = options.limit {
            request = request.max_keys(limit);
        }
        if let Some(cursor) = options.cursor {
            request = request.continuation_token(cursor);
        }

        let response = request.send().await.map_err(|e| classify(e, &prefix))?;

        let entries = response
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?.to_string();
                Some(ObjectSummary {
                    key,
                    size: obj.size().unwrap_or(0).max(0) as u64,
                    last_modified: obj.last_modified().and_then(|dt| {
                        DateTime::parse_from_rfc3339(&dt.to_string())
                            .ok()
                            .map(|d| d.with_timezone(&Utc))
                    }),
                })
            })
            .collect();

        Ok(ListPage {
            entries,
            cursor: response.next_continuation_token().map(|s| s.to_string()),
            has_more: response.is_truncated().unwrap_or(false),
        })
    }

    async fn health_check(&self) -> bool {
        let client = match self.client().await {
            Ok(client) => client,
            Err(e) => {
                warn!("health check could not build a client: {e}");
                return false;
            }
        };
        match client.list_buckets().send().await {
            Ok(_) => true,
            Err(e) => {
                warn!("health check failed: {}", DisplayErrorContext(e));
                false
            }
        }
    }

    fn download_url_fo(&self, key: &str, extra: Option<&HashMap<String, String>>) -> String {
        self.download_urls.front_office_url(key, &self.name, extra)
    }

    fn download_url_bo(&self, key: &str, extra: Option<&HashMap<String, String>>) -> String {
        self.download_urls.back_office_url(key, &self.name, extra)
    }

    fn check_access(&self, key: &str, principal: &str) -> StorageResult<()> {
        match &self.access_policy {
            Some(policy) => policy.check_read(key, principal),
            None => Ok(()),
        }
    }
}

/// Collapse duplicate slashes and strip any leading slash; minted keys
/// are bucket-relative.
fn normalize_key(key: &str) -> String {
    let mut out = key.to_string();
    while out.contains("//") {
        out = out.replace("//", "/");
    }
    out.trim_start_matches('/').to_string()
}

/// Single classification boundary: every SDK failure crossing a public
/// operation goes through here and comes out as a [`StorageError`]
/// carrying the store status and the key it was addressing.
fn classify<E>(err: SdkError<E, HttpResponse>, key: &str) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    error!("s3 request for '{key}' failed: {err}");
    match &err {
        SdkError::ConstructionFailure(_) => StorageError::BadRequest {
            key: key.to_string(),
            message: "request could not be constructed".to_string(),
        },
        SdkError::TimeoutError(_) => StorageError::Timeout {
            key: key.to_string(),
        },
        SdkError::DispatchFailure(failure) => {
            if failure
                .as_connector_error()
                .map(|c| c.is_timeout())
                .unwrap_or(false)
            {
                StorageError::Timeout {
                    key: key.to_string(),
                }
            } else {
                StorageError::Unavailable {
                    key: key.to_string(),
                    message: err.to_string(),
                }
            }
        }
        SdkError::ResponseError(response) => {
            StorageError::from_status(response.raw().status().as_u16(), key)
        }
        SdkError::ServiceError(service) => {
            StorageError::from_status(service.raw().status().as_u16(), key)
        }
        _ => StorageError::Unavailable {
            key: key.to_string(),
            message: err.to_string(),
        },
    }
}
