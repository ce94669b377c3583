use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use strata_types::ObjectId;

/// Session-scoped cache of objects already seen during a load.
///
/// Fragment iteration fills it so that later reference lookups for the same
/// ids are served without another store round trip. Clones share storage.
#[derive(Clone, Default)]
pub struct FragmentCache {
    objects: Arc<RwLock<HashMap<ObjectId, Value>>>,
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ObjectId) -> Option<Value> {
        self.objects
            .read()
            .expect("cache lock poisoned")
            .get(id)
            .cloned()
    }

    /// Insert an object. Existing entries are kept, since stored content is
    /// immutable.
    pub fn insert(&self, id: ObjectId, value: Value) {
        self.objects
            .write()
            .expect("cache lock poisoned")
            .entry(id)
            .or_insert(value);
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects
            .read()
            .expect("cache lock poisoned")
            .contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.objects.write().expect("cache lock poisoned").clear();
    }
}

impl std::fmt::Debug for FragmentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentCache")
            .field("object_count", &self.len())
            .finish()
    }
}
