use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use strata_types::ObjectId;

use crate::error::StoreResult;

/// A top-level decoded object delivered by fragment iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub id: ObjectId,
    pub body: Value,
    /// Declared number of descendants. Only the first fragment of an
    /// iteration carries it.
    pub total_children: Option<u64>,
}

/// Pull-based async iteration over the fragments of one root object.
#[async_trait]
pub trait FragmentStream: Send {
    /// Next fragment, or `Ok(None)` once the iteration is exhausted.
    async fn next_fragment(&mut self) -> StoreResult<Option<Fragment>>;
}

/// Read access to a content-addressable object store.
///
/// Implementations must tolerate many outstanding requests at once.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Point lookup of a fully decoded object by id.
    ///
    /// Returns `Err(StoreError::NotFound)` for unknown ids.
    async fn get_object(&self, id: &ObjectId) -> StoreResult<Value>;

    /// Begin iterating the fragments of `root`. The root itself comes first.
    async fn fragments(&self, root: &ObjectId) -> StoreResult<Box<dyn FragmentStream>>;
}

/// Where a load session reads from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreTarget {
    /// Scheme, host and port of the store server.
    pub origin: String,
    /// Collection (stream) holding the object.
    pub stream_id: String,
}

/// Opens an [`ObjectSource`] for a target, presenting an optional token.
pub trait StoreConnector: Send + Sync {
    fn connect(
        &self,
        target: &StoreTarget,
        token: Option<&str>,
    ) -> StoreResult<Arc<dyn ObjectSource>>;
}
