//! Splitting arrays into storage-bounded chunks.
//!
//! This is the writer side of chunking: a logically large array is stored as
//! a sequence of chunk objects, and the array itself is replaced by reference
//! stubs pointing at them. [`Resolver::dechunk`](crate::Resolver::dechunk)
//! reverses it.

use serde_json::Value;
use strata_types::{Fields, GraphNode, ObjectId, TYPE_FIELD};

/// Type discriminator carried by chunk objects.
pub const CHUNK_TYPE: &str = "Speckle.Core.Models.DataChunk";

/// Field of a chunk object that holds its slice of the array.
pub const CHUNK_DATA_FIELD: &str = "data";

/// Result of splitting an array.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkedArray {
    /// Chunk objects to store, each with its derived `id`.
    pub chunks: Vec<Value>,
    /// Reference stubs replacing the original array, in order.
    pub stubs: Vec<Value>,
}

/// Split `values` into chunks of at most `max_chunk_len` elements.
///
/// A `max_chunk_len` of zero is treated as one.
pub fn chunk_values(values: &[Value], max_chunk_len: usize) -> ChunkedArray {
    let mut chunks = Vec::new();
    let mut stubs = Vec::new();
    for slice in values.chunks(max_chunk_len.max(1)) {
        let mut fields = Fields::new();
        fields.insert(TYPE_FIELD.into(), Value::String(CHUNK_TYPE.into()));
        fields.insert(CHUNK_DATA_FIELD.into(), Value::Array(slice.to_vec()));
        let id = ObjectId::for_content(&Value::Object(fields.clone()));
        fields.insert("id".into(), Value::String(id.to_string()));
        stubs.push(GraphNode::Reference(id).into_value());
        chunks.push(Value::Object(fields));
    }
    ChunkedArray { chunks, stubs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strata_types::REFERENCE_FIELD;

    fn numbers(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!(i)).collect()
    }

    #[test]
    fn splits_into_bounded_chunks() {
        let chunked = chunk_values(&numbers(10), 4);
        assert_eq!(chunked.chunks.len(), 3);
        assert_eq!(chunked.stubs.len(), 3);
        assert_eq!(chunked.chunks[2][CHUNK_DATA_FIELD], json!([8, 9]));
    }

    #[test]
    fn stubs_point_at_chunks() {
        let chunked = chunk_values(&numbers(5), 2);
        for (stub, chunk) in chunked.stubs.iter().zip(&chunked.chunks) {
            assert_eq!(stub[REFERENCE_FIELD], chunk["id"]);
        }
    }

    #[test]
    fn empty_input_produces_nothing() {
        let chunked = chunk_values(&[], 3);
        assert!(chunked.chunks.is_empty());
        assert!(chunked.stubs.is_empty());
    }

    #[test]
    fn zero_chunk_len_means_one() {
        let chunked = chunk_values(&numbers(3), 0);
        assert_eq!(chunked.chunks.len(), 3);
    }

    #[test]
    fn chunks_carry_the_chunk_type() {
        let chunked = chunk_values(&numbers(1), 8);
        assert_eq!(chunked.chunks[0][TYPE_FIELD], json!(CHUNK_TYPE));
    }
}
