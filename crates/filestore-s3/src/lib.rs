//! filestore-s3: S3/MinIO implementation of the filestore contract
//!
//! Persists host files in an S3-compatible bucket, carrying the host's
//! descriptive metadata as object metadata. The client is built lazily
//! from an immutable connection profile and reused for the adapter's
//! lifetime.

mod client;
pub mod config;
pub mod metadata;
pub mod path;
pub mod store;
pub mod wildcard;

pub use config::{ConnectionProfile, ProxySettings, S3StorageSettings};
pub use store::S3FileStore;
