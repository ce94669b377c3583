use std::sync::Arc;

use serde_json::Value;
use strata_types::{GraphNode, ObjectId};
use tracing::trace;

use crate::cache::FragmentCache;
use crate::chunk::CHUNK_DATA_FIELD;
use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectSource;

/// Materializes graph nodes on demand.
///
/// Lookups are served from the session's [`FragmentCache`] when possible and
/// fall back to a store round trip, whose result is cached. Cloning is cheap
/// and shares both the source and the cache.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn ObjectSource>,
    cache: FragmentCache,
}

impl Resolver {
    pub fn new(source: Arc<dyn ObjectSource>) -> Self {
        Self::with_cache(source, FragmentCache::new())
    }

    pub fn with_cache(source: Arc<dyn ObjectSource>, cache: FragmentCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &FragmentCache {
        &self.cache
    }

    /// Fetch one object by id.
    pub async fn fetch(&self, id: &ObjectId) -> StoreResult<Value> {
        if let Some(value) = self.cache.get(id) {
            trace!(id = %id, "cache hit");
            return Ok(value);
        }
        let value = self.source.get_object(id).await?;
        self.cache.insert(id.clone(), value.clone());
        Ok(value)
    }

    /// Turn a reference stub into the node it points to.
    ///
    /// Any other node is returned unchanged without touching the store.
    pub async fn resolve(&self, node: GraphNode) -> StoreResult<GraphNode> {
        match node {
            GraphNode::Reference(id) => Ok(GraphNode::decode(self.fetch(&id).await?)),
            other => Ok(other),
        }
    }

    /// Reassemble a possibly chunked array into one flat array.
    ///
    /// An empty array, or one whose first element is not a reference stub,
    /// is already flat and is returned as is. Otherwise every element must be
    /// a stub to a chunk object; chunks are fetched one after another and
    /// their `data` arrays concatenated in element order.
    pub async fn dechunk(&self, values: Vec<Value>) -> StoreResult<Vec<Value>> {
        match values.first() {
            Some(first) if GraphNode::is_reference(first) => {}
            _ => return Ok(values),
        }

        let mut flat = Vec::new();
        for (index, stub) in values.iter().enumerate() {
            let id = GraphNode::reference_of(stub).ok_or_else(|| StoreError::MalformedChunk {
                index,
                reason: "element is not a reference stub".into(),
            })?;
            let data = match self.fetch(&id).await? {
                Value::Object(mut fields) => fields.remove(CHUNK_DATA_FIELD),
                _ => None,
            };
            match data {
                Some(Value::Array(items)) => flat.extend(items),
                _ => {
                    return Err(StoreError::MalformedChunk {
                        index,
                        reason: format!("chunk {id} has no `{CHUNK_DATA_FIELD}` array"),
                    })
                }
            }
        }
        trace!(chunks = values.len(), len = flat.len(), "dechunked array");
        Ok(flat)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
