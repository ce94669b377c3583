use serde::{Deserialize, Serialize};

use crate::bounds::BoundingSphere;
use crate::error::{GeometryError, GeometryResult};
use crate::normals::vertex_normals;

/// Indexed triangle geometry ready for upload to a renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryBuffer {
    /// Triangle vertex indices, three per triangle.
    pub indices: Vec<u32>,
    /// Flat xyz positions.
    pub positions: Vec<f32>,
    /// Flat xyz per-vertex normals, derived from `indices` and `positions`.
    pub normals: Vec<f32>,
    pub bounding_sphere: BoundingSphere,
}

impl GeometryBuffer {
    /// Assemble a buffer and derive its normals and bounding sphere.
    pub fn new(indices: Vec<u32>, positions: Vec<f32>) -> GeometryResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(GeometryError::InvalidVertexCount(positions.len()));
        }
        let vertex_count = positions.len() / 3;
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange {
                index: i64::from(bad),
                vertex_count,
            });
        }
        if indices.len() % 3 != 0 {
            return Err(GeometryError::TruncatedFace {
                offset: indices.len() - indices.len() % 3,
                needed: 3,
                available: indices.len() % 3,
            });
        }

        let normals = vertex_normals(&positions, &indices);
        let bounding_sphere = BoundingSphere::from_positions(&positions);
        Ok(Self {
            indices,
            positions,
            normals,
            bounding_sphere,
        })
    }

    /// Concatenate buffers into one, offsetting each buffer's indices past
    /// the vertices that precede it.
    pub fn merge(buffers: impl IntoIterator<Item = GeometryBuffer>) -> Self {
        let mut indices = Vec::new();
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        for buffer in buffers {
            let base = (positions.len() / 3) as u32;
            indices.extend(buffer.indices.iter().map(|i| i + base));
            positions.extend_from_slice(&buffer.positions);
            normals.extend_from_slice(&buffer.normals);
        }
        let bounding_sphere = BoundingSphere::from_positions(&positions);
        Self {
            indices,
            positions,
            normals,
            bounding_sphere,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> GeometryBuffer {
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        GeometryBuffer::new(vec![0, 1, 2, 0, 2, 3], positions).unwrap()
    }

    #[test]
    fn new_derives_normals_and_sphere() {
        let buffer = square();
        assert_eq!(buffer.vertex_count(), 4);
        assert_eq!(buffer.triangle_count(), 2);
        assert_eq!(buffer.normals.len(), 12);
        assert_eq!(buffer.bounding_sphere.center, [0.5, 0.5, 0.0]);
    }

    #[test]
    fn new_rejects_partial_vertices() {
        assert_eq!(
            GeometryBuffer::new(vec![], vec![0.0, 1.0]),
            Err(GeometryError::InvalidVertexCount(2))
        );
    }

    #[test]
    fn new_rejects_dangling_indices() {
        let err = GeometryBuffer::new(vec![0, 1, 5], vec![0.0; 9]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::IndexOutOfRange {
                index: 5,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn new_rejects_partial_triangles() {
        assert!(GeometryBuffer::new(vec![0, 1], vec![0.0; 9]).is_err());
    }

    #[test]
    fn merge_offsets_indices() {
        let merged = GeometryBuffer::merge([square(), square()]);
        assert_eq!(merged.vertex_count(), 8);
        assert_eq!(merged.triangle_count(), 4);
        assert_eq!(&merged.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(merged.normals.len(), merged.positions.len());
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let merged = GeometryBuffer::merge(Vec::new());
        assert!(merged.is_empty());
        assert_eq!(merged.bounding_sphere, BoundingSphere::empty());
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(square()).unwrap();
        assert_eq!(json["indices"].as_array().unwrap().len(), 6);
    }
}
