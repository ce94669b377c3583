use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use strata_convert::WrappedResult;

/// A converted object tagged with the URL it was loaded from.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub source_url: String,
    pub result: WrappedResult,
}

/// The consumer of converted objects.
pub trait SceneManager: Send + Sync {
    /// Accept one converted object.
    fn add_object(&self, object: SceneObject);

    /// Recompute the visible set once a load has finished.
    fn set_filtered_view(&self);

    /// Drop every object previously added from `source_url`.
    fn remove_imported_object(&self, source_url: &str);
}

/// A scene that just records what it is given.
#[derive(Debug, Default)]
pub struct InMemoryScene {
    objects: RwLock<Vec<SceneObject>>,
    filtered_views: AtomicUsize,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> Vec<SceneObject> {
        self.objects.read().expect("lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of objects added from `source_url`.
    pub fn count_for(&self, source_url: &str) -> usize {
        self.objects
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|o| o.source_url == source_url)
            .count()
    }

    /// How many times the filtered view was recomputed.
    pub fn filtered_view_count(&self) -> usize {
        self.filtered_views.load(Ordering::SeqCst)
    }
}

impl SceneManager for InMemoryScene {
    fn add_object(&self, object: SceneObject) {
        self.objects.write().expect("lock poisoned").push(object);
    }

    fn set_filtered_view(&self) {
        self.filtered_views.fetch_add(1, Ordering::SeqCst);
    }

    fn remove_imported_object(&self, source_url: &str) {
        self.objects
            .write()
            .expect("lock poisoned")
            .retain(|o| o.source_url != source_url);
    }
}
