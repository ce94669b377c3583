//! Geometry buffers produced by mesh conversion.
//!
//! A [`GeometryBuffer`] is the renderable form of a mesh: a triangle index
//! list, flat xyz positions, derived per-vertex normals and a derived bounding
//! sphere. Face lists arrive in a topology-prefixed encoding which
//! [`decode_faces`] turns into triangles.

pub mod bounds;
pub mod buffer;
pub mod error;
pub mod faces;
pub mod normals;

pub use bounds::BoundingSphere;
pub use buffer::GeometryBuffer;
pub use error::{GeometryError, GeometryResult};
pub use faces::{decode_faces, FaceKind};
pub use normals::vertex_normals;
