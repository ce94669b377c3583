use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("object id must not be empty")]
    EmptyObjectId,

    #[error("object id contains whitespace: {0:?}")]
    InvalidObjectId(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}
