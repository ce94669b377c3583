//! Type-specific conversion of domain objects into geometry.
//!
//! Converters are looked up by type tag in a [`ConverterRegistry`]. A tag
//! without a registration is not an error: the traversal treats such objects
//! as containers and looks inside them instead.
//!
//! Built-in converters:
//!
//! - [`MeshConverter`] (`Mesh`) -- vertex and face buffers to a [`GeometryBuffer`]
//! - [`BrepConverter`] (`Brep`) -- the precomputed display mesh of a boundary
//!   representation
//!
//! [`GeometryBuffer`]: strata_geometry::GeometryBuffer

pub mod brep;
pub mod converter;
pub mod error;
pub mod mesh;
pub mod wrapped;

pub use brep::{BrepConverter, BREP_HEAVY_FIELDS};
pub use converter::{Converter, ConverterRegistry};
pub use error::{ConvertError, ConvertResult};
pub use mesh::{MeshConverter, MESH_GEOMETRY_FIELDS};
pub use wrapped::WrappedResult;
