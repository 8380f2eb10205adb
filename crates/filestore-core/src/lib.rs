//! filestore-core: host-side file storage contract
//!
//! Defines the provider trait implemented by storage backends, the file
//! model exchanged with the host, the error taxonomy, and the registry
//! used to select among configured providers.

pub mod error;
pub mod file;
pub mod provider;
pub mod registry;

pub use error::{StorageError, StorageResult};
pub use file::{FileBody, ListOptions, ListPage, ObjectSummary, StoredFile};
pub use provider::{AccessPolicy, DownloadUrlProvider, FileStore};
pub use registry::FileStoreRegistry;
