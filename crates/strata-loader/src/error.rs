use strata_types::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("invalid object url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("object {0} produced no fragments")]
    EmptyStream(ObjectId),

    #[error("traversal task failed: {0}")]
    TaskFailed(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] strata_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LoaderResult<T> = Result<T, LoaderError>;
