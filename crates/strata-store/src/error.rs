use strata_types::{ObjectId, TypeError};

/// Errors from store lookups and graph materialization.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The object is not public and no valid token was presented.
    #[error("not authorized to read object {0}")]
    Unauthorized(ObjectId),

    /// A chunked array element could not be reassembled.
    #[error("malformed chunk at index {index}: {reason}")]
    MalformedChunk { index: usize, reason: String },

    /// A stored object is not a structured value or lacks a usable id.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An id found in stored data is not a valid object id.
    #[error("invalid object id: {0}")]
    InvalidId(#[from] TypeError),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
