use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use strata_geometry::GeometryBuffer;
use strata_store::Resolver;
use strata_types::{GraphNode, TypedObject};
use tracing::debug;

use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::mesh::MeshConverter;
use crate::wrapped::WrappedResult;

/// Boundary-representation fields never kept in converted metadata.
/// Only the display mesh is rendered; the exact topology is dropped.
pub const BREP_HEAVY_FIELDS: &[&str] = &[
    "displayValue",
    "displayMesh",
    "Edges",
    "Faces",
    "Loops",
    "Trims",
    "Curve2D",
    "Curve3D",
    "Surfaces",
    "Vertices",
];

/// Converts `Brep` objects through their precomputed display mesh.
///
/// The display geometry is read from `displayValue`, falling back to
/// `displayMesh`. Either may hold a single mesh (inline or by reference) or a
/// list of meshes, which are merged into one buffer.
#[derive(Clone, Debug)]
pub struct BrepConverter {
    mesh: Arc<MeshConverter>,
}

impl BrepConverter {
    pub fn new(mesh: Arc<MeshConverter>) -> Self {
        Self { mesh }
    }

    async fn display_geometry(
        &self,
        display: Value,
        resolver: &Resolver,
    ) -> ConvertResult<Option<GeometryBuffer>> {
        let entries = match display {
            Value::Array(items) => items,
            single => vec![single],
        };

        let mut buffers = Vec::with_capacity(entries.len());
        for entry in entries {
            match resolver.resolve(GraphNode::decode(entry)).await? {
                GraphNode::Object(mut mesh) => {
                    if let Some(buffer) = self.mesh.geometry(&mut mesh, resolver).await? {
                        buffers.push(buffer);
                    }
                }
                other => {
                    return Err(ConvertError::invalid(
                        "displayValue",
                        format!("expected a mesh object, found {}", other.kind()),
                    ))
                }
            }
        }

        Ok(match buffers.len() {
            0 => None,
            1 => buffers.pop(),
            _ => Some(GeometryBuffer::merge(buffers)),
        })
    }
}

#[async_trait]
impl Converter for BrepConverter {
    async fn convert(
        &self,
        mut object: TypedObject,
        resolver: &Resolver,
    ) -> ConvertResult<Option<WrappedResult>> {
        let display_value = object.take("displayValue").filter(|v| !v.is_null());
        let display_mesh = object.take("displayMesh").filter(|v| !v.is_null());
        let Some(display) = display_value.or(display_mesh) else {
            return Ok(None);
        };

        let Some(geometry) = self.display_geometry(display, resolver).await? else {
            return Ok(None);
        };

        let stripped = object.strip_fields(BREP_HEAVY_FIELDS);
        debug!(id = ?object.id(), stripped, triangles = geometry.triangle_count(), "brep converted");
        Ok(Some(WrappedResult::new(object, geometry)))
    }
}
