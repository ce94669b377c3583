use async_trait::async_trait;
use serde_json::Value;
use strata_geometry::{decode_faces, GeometryBuffer, GeometryError};
use strata_store::Resolver;
use strata_types::{conversion_factor, TypedObject};
use tracing::debug;

use crate::converter::Converter;
use crate::error::{ConvertError, ConvertResult};
use crate::wrapped::WrappedResult;

/// Fields consumed by mesh conversion and dropped from its metadata.
pub const MESH_GEOMETRY_FIELDS: &[&str] = &["vertices", "faces"];

/// Converts `Mesh` objects.
///
/// `vertices` is a flat, possibly chunked xyz array in the object's declared
/// `units`; `faces` is a possibly chunked topology-prefixed face buffer.
/// Positions are scaled to metres.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshConverter;

impl MeshConverter {
    /// Build the geometry buffer of a mesh object, removing the consumed
    /// fields from it. Returns `None` if either buffer is missing.
    pub async fn geometry(
        &self,
        object: &mut TypedObject,
        resolver: &Resolver,
    ) -> ConvertResult<Option<GeometryBuffer>> {
        let factor = conversion_factor(object.get("units").and_then(Value::as_str));
        let (Some(vertices), Some(faces)) = (object.take("vertices"), object.take("faces")) else {
            return Ok(None);
        };

        let vertices = resolver.dechunk(as_array("vertices", vertices)?).await?;
        let faces = resolver.dechunk(as_array("faces", faces)?).await?;

        let positions = scaled_positions(&vertices, factor)?;
        if positions.len() % 3 != 0 {
            return Err(GeometryError::InvalidVertexCount(positions.len()).into());
        }
        let faces = face_values(&faces)?;
        let indices = decode_faces(&faces, positions.len() / 3)?;

        Ok(Some(GeometryBuffer::new(indices, positions)?))
    }
}

#[async_trait]
impl Converter for MeshConverter {
    async fn convert(
        &self,
        mut object: TypedObject,
        resolver: &Resolver,
    ) -> ConvertResult<Option<WrappedResult>> {
        let Some(geometry) = self.geometry(&mut object, resolver).await? else {
            return Ok(None);
        };
        object.strip_fields(MESH_GEOMETRY_FIELDS);
        debug!(
            id = ?object.id(),
            vertices = geometry.vertex_count(),
            triangles = geometry.triangle_count(),
            "mesh converted"
        );
        Ok(Some(WrappedResult::new(object, geometry)))
    }
}

fn as_array(field: &str, value: Value) -> ConvertResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(ConvertError::invalid(
            field,
            format!("expected an array, found {}", kind_of(&other)),
        )),
    }
}

/// Positions as `f32`, scaled by `factor`. A factor of exactly 1 skips the
/// multiply so coordinates keep their stored values.
fn scaled_positions(vertices: &[Value], factor: f64) -> ConvertResult<Vec<f32>> {
    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let coord = v
                .as_f64()
                .ok_or_else(|| ConvertError::invalid("vertices", format!("entry {i} is not a number")))?;
            Ok(if factor == 1.0 {
                coord as f32
            } else {
                (coord * factor) as f32
            })
        })
        .collect()
}

fn face_values(faces: &[Value]) -> ConvertResult<Vec<i64>> {
    faces
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_i64()
                .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .ok_or_else(|| ConvertError::invalid("faces", format!("entry {i} is not an integer")))
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
