//! File model exchanged between the host and storage providers

use std::pin::Pin;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;

/// Boxed byte stream used for streaming uploads and downloads.
pub type FileBody = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// A stored file as the host sees it: the storage key plus the
/// descriptive metadata attached at write time. `content` is populated
/// only when a full fetch was requested; the remote store remains the
/// sole durable owner of the bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredFile {
    /// Unique store-assigned path of the object
    pub key: String,
    /// MIME type recorded at write time
    pub mime_type: String,
    /// Size in bytes as recorded at write time
    pub size: u64,
    /// Display title, typically the original upload filename
    pub title: String,
    /// Name of the provider that wrote the object
    pub origin: String,
    /// Object bytes, present only on a full fetch
    pub content: Option<Bytes>,
}

/// Options for LIST operations
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Prefix to filter by
    pub prefix: Option<String>,
    /// Maximum number of items to return
    pub limit: Option<i32>,
    /// Continuation token for pagination
    pub cursor: Option<String>,
}

/// One object in a listing
#[derive(Debug, Clone)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of a LIST operation
#[derive(Debug, Clone)]
pub struct ListPage {
    pub entries: Vec<ObjectSummary>,
    /// Continuation token for the next page
    pub cursor: Option<String>,
    pub has_more: bool,
}
