use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use strata_store::Resolver;
use strata_types::TypedObject;

use crate::brep::BrepConverter;
use crate::error::ConvertResult;
use crate::mesh::MeshConverter;
use crate::wrapped::WrappedResult;

/// Converts one kind of domain object into geometry.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Convert a resolved object.
    ///
    /// Returns `Ok(None)` when the object lacks the inputs this converter
    /// needs. The converter owns the object's whole sub-structure; the
    /// traversal does not descend into it afterwards.
    async fn convert(
        &self,
        object: TypedObject,
        resolver: &Resolver,
    ) -> ConvertResult<Option<WrappedResult>>;
}

/// Type tag to converter mapping.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in `Mesh` and `Brep` converters.
    pub fn with_defaults() -> Self {
        let mesh = Arc::new(MeshConverter);
        let mut registry = Self::new();
        registry.register("Mesh", mesh.clone());
        registry.register("Brep", Arc::new(BrepConverter::new(mesh)));
        registry
    }

    /// Register `converter` for `tag`, returning any converter it replaces.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        converter: Arc<dyn Converter>,
    ) -> Option<Arc<dyn Converter>> {
        self.converters.insert(tag.into(), converter)
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn Converter>> {
        self.converters.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.converters.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
