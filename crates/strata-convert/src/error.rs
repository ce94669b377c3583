use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("store error: {0}")]
    Store(#[from] strata_store::StoreError),

    #[error("geometry error: {0}")]
    Geometry(#[from] strata_geometry::GeometryError),
}

impl ConvertError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ConvertResult<T> = Result<T, ConvertError>;
