/// Errors from decoding or assembling geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A face record starts with a topology flag that is neither triangle
    /// nor quad.
    #[error("unsupported face topology flag {flag} at offset {offset}")]
    UnsupportedFaceTopology { flag: i64, offset: usize },

    /// A face record ends before all of its indices were read.
    #[error("face at offset {offset} needs {needed} indices, only {available} remain")]
    TruncatedFace {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A face refers to a vertex that does not exist.
    #[error("vertex index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: i64, vertex_count: usize },

    /// The flat position buffer is not a whole number of xyz triples.
    #[error("position buffer length {0} is not a multiple of 3")]
    InvalidVertexCount(usize),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
