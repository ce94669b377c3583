use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use strata_types::ObjectId;
use tracing::debug;

use crate::chunk::chunk_values;
use crate::error::{StoreError, StoreResult};
use crate::traits::{Fragment, FragmentStream, ObjectSource, StoreConnector, StoreTarget};

/// Field on a root object listing every descendant id.
const CLOSURE_FIELD: &str = "__closure";

/// Field on a root object declaring its descendant count.
const TOTAL_CHILDREN_FIELD: &str = "totalChildrenCount";

#[derive(Default)]
struct Objects {
    by_id: HashMap<ObjectId, Value>,
    insertion_order: Vec<ObjectId>,
}

struct Shared {
    objects: RwLock<Objects>,
    access_token: Option<String>,
}

/// In-memory, map-backed object source.
///
/// Intended for tests, embedding, and serving JSON dumps. Clones share the
/// same objects; [`with_token`](Self::with_token) produces a handle that
/// presents a token. A source created with [`private`](Self::private) refuses
/// every read from a handle that does not present the matching token.
#[derive(Clone)]
pub struct InMemoryObjectSource {
    shared: Arc<Shared>,
    presented_token: Option<String>,
}

impl InMemoryObjectSource {
    /// Create an empty, publicly readable source.
    pub fn new() -> Self {
        Self::with_access(None)
    }

    /// Create an empty source readable only with `token`.
    pub fn private(token: impl Into<String>) -> Self {
        Self::with_access(Some(token.into()))
    }

    fn with_access(access_token: Option<String>) -> Self {
        Self {
            shared: Arc::new(Shared {
                objects: RwLock::new(Objects::default()),
                access_token,
            }),
            presented_token: None,
        }
    }

    /// A handle onto the same objects that presents `token` on every read.
    pub fn with_token(&self, token: Option<&str>) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            presented_token: token.map(str::to_string),
        }
    }

    /// Store an object and return its id.
    ///
    /// Objects carrying a string `id` are stored under it; others get an id
    /// derived from their content, written back into the stored copy.
    pub fn insert(&self, value: Value) -> StoreResult<ObjectId> {
        let Value::Object(mut fields) = value else {
            return Err(StoreError::MalformedObject(
                "stored objects must be JSON objects".into(),
            ));
        };
        let id = match fields.get("id").and_then(Value::as_str) {
            Some(id) => ObjectId::new(id)?,
            None => {
                let id = ObjectId::for_content(&Value::Object(fields.clone()));
                fields.insert("id".into(), Value::String(id.to_string()));
                id
            }
        };
        let mut objects = self.shared.objects.write().expect("lock poisoned");
        if !objects.by_id.contains_key(&id) {
            objects.insertion_order.push(id.clone());
            objects.by_id.insert(id.clone(), Value::Object(fields));
        }
        Ok(id)
    }

    /// Split `values` into chunk objects, store them, and return the
    /// reference stubs that stand in for the array.
    pub fn insert_chunked(&self, values: &[Value], max_chunk_len: usize) -> StoreResult<Vec<Value>> {
        let chunked = chunk_values(values, max_chunk_len);
        for chunk in chunked.chunks {
            self.insert(chunk)?;
        }
        Ok(chunked.stubs)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.shared.objects.read().expect("lock poisoned").by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.shared
            .objects
            .read()
            .expect("lock poisoned")
            .by_id
            .contains_key(id)
    }

    fn authorize(&self, id: &ObjectId) -> StoreResult<()> {
        match &self.shared.access_token {
            Some(required) if self.presented_token.as_deref() != Some(required.as_str()) => {
                Err(StoreError::Unauthorized(id.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Ids to deliver after the root: its closure if declared, otherwise every
    /// other stored object in insertion order.
    fn descendants(objects: &Objects, root_id: &ObjectId, root: &Value) -> StoreResult<Vec<ObjectId>> {
        match root.get(CLOSURE_FIELD).and_then(Value::as_object) {
            Some(closure) => closure
                .keys()
                .map(|id| ObjectId::new(id.as_str()).map_err(StoreError::from))
                .collect(),
            None => Ok(objects
                .insertion_order
                .iter()
                .filter(|id| *id != root_id)
                .cloned()
                .collect()),
        }
    }
}

impl Default for InMemoryObjectSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectSource for InMemoryObjectSource {
    async fn get_object(&self, id: &ObjectId) -> StoreResult<Value> {
        self.authorize(id)?;
        let objects = self.shared.objects.read().expect("lock poisoned");
        objects
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn fragments(&self, root: &ObjectId) -> StoreResult<Box<dyn FragmentStream>> {
        self.authorize(root)?;
        let objects = self.shared.objects.read().expect("lock poisoned");
        let root_value = objects
            .by_id
            .get(root)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(root.clone()))?;

        let descendants = Self::descendants(&objects, root, &root_value)?;
        let total_children = root_value
            .get(TOTAL_CHILDREN_FIELD)
            .and_then(Value::as_u64)
            .unwrap_or(descendants.len() as u64);

        let mut pending = VecDeque::with_capacity(descendants.len() + 1);
        pending.push_back(Ok(Fragment {
            id: root.clone(),
            body: root_value,
            total_children: Some(total_children),
        }));
        for id in descendants {
            let entry = match objects.by_id.get(&id) {
                Some(body) => Ok(Fragment {
                    id,
                    body: body.clone(),
                    total_children: None,
                }),
                None => Err(id),
            };
            pending.push_back(entry);
        }

        debug!(root = %root, fragments = pending.len(), "opened fragment stream");
        Ok(Box::new(MemoryFragmentStream { pending }))
    }
}

impl StoreConnector for InMemoryObjectSource {
    fn connect(
        &self,
        target: &StoreTarget,
        token: Option<&str>,
    ) -> StoreResult<Arc<dyn ObjectSource>> {
        debug!(origin = %target.origin, stream = %target.stream_id, "connecting in-memory source");
        Ok(Arc::new(self.with_token(token)))
    }
}

impl std::fmt::Debug for InMemoryObjectSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectSource")
            .field("object_count", &self.len())
            .field("private", &self.shared.access_token.is_some())
            .finish()
    }
}

/// Snapshot of the fragments of one root, taken when the stream is opened.
/// Closure ids that were missing at that time surface as `NotFound` in order.
struct MemoryFragmentStream {
    pending: VecDeque<Result<Fragment, ObjectId>>,
}

#[async_trait]
impl FragmentStream for MemoryFragmentStream {
    async fn next_fragment(&mut self) -> StoreResult<Option<Fragment>> {
        match self.pending.pop_front() {
            Some(Ok(fragment)) => Ok(Some(fragment)),
            Some(Err(missing)) => Err(StoreError::NotFound(missing)),
            None => Ok(None),
        }
    }
}
