//! Error types shared by file-store providers

use thiserror::Error;

/// Classified storage failures. Every variant carries the key (or path)
/// that triggered it so callers can log something actionable. Provider
/// implementations must map their SDK errors into this taxonomy at the
/// boundary of every operation; no SDK error type escapes a provider.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("bad request for '{key}': {message}")]
    BadRequest { key: String, message: String },

    #[error("unauthorized access to '{key}'")]
    Unauthorized { key: String },

    #[error("access to '{key}' forbidden")]
    Forbidden { key: String },

    #[error("object '{key}' not found")]
    NotFound { key: String },

    #[error("timed out accessing '{key}'")]
    Timeout { key: String },

    #[error("store internal error for '{key}'")]
    ServerError { key: String },

    #[error("store unreachable for '{key}': {message}")]
    Unavailable { key: String, message: String },

    #[error("stream read failed for '{key}': {message}")]
    Stream { key: String, message: String },

    #[error("store returned status {code} for '{key}'")]
    Unclassified { key: String, code: u16 },
}

impl StorageError {
    /// Map a store-reported HTTP status to an error kind. The seven
    /// statuses the contract names get dedicated variants; everything
    /// else falls through to `Unclassified` carrying the code.
    pub fn from_status(code: u16, key: impl Into<String>) -> Self {
        let key = key.into();
        match code {
            400 => StorageError::BadRequest {
                key,
                message: "store rejected the request".to_string(),
            },
            401 => StorageError::Unauthorized { key },
            403 => StorageError::Forbidden { key },
            404 => StorageError::NotFound { key },
            408 => StorageError::Timeout { key },
            500 => StorageError::ServerError { key },
            503 => StorageError::Unavailable {
                key,
                message: "store reported service unavailable".to_string(),
            },
            code => StorageError::Unclassified { key, code },
        }
    }

    /// The HTTP status this kind corresponds to, when there is one.
    /// `Stream` failures happen below the HTTP layer and have none.
    pub fn status(&self) -> Option<u16> {
        match self {
            StorageError::BadRequest { .. } => Some(400),
            StorageError::Unauthorized { .. } => Some(401),
            StorageError::Forbidden { .. } => Some(403),
            StorageError::NotFound { .. } => Some(404),
            StorageError::Timeout { .. } => Some(408),
            StorageError::ServerError { .. } => Some(500),
            StorageError::Unavailable { .. } => Some(503),
            StorageError::Stream { .. } => None,
            StorageError::Unclassified { code, .. } => Some(*code),
        }
    }

    /// The key or path the failing operation was addressing.
    pub fn key(&self) -> &str {
        match self {
            StorageError::BadRequest { key, .. }
            | StorageError::Unauthorized { key }
            | StorageError::Forbidden { key }
            | StorageError::NotFound { key }
            | StorageError::Timeout { key }
            | StorageError::ServerError { key }
            | StorageError::Unavailable { key, .. }
            | StorageError::Stream { key, .. }
            | StorageError::Unclassified { key, .. } => key,
        }
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
