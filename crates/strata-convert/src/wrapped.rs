use strata_geometry::GeometryBuffer;
use strata_types::{Fields, ObjectId, TypedObject};

/// Converted geometry paired with the residual metadata of its source object.
///
/// The metadata no longer holds the fields the geometry was built from, so
/// the heavy data is retained once.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedResult {
    pub object_id: Option<ObjectId>,
    pub type_tag: String,
    pub geometry: GeometryBuffer,
    pub metadata: Fields,
}

impl WrappedResult {
    /// Wrap `geometry` with what is left of `source`.
    pub fn new(source: TypedObject, geometry: GeometryBuffer) -> Self {
        let object_id = source.id().cloned();
        let type_tag = source.type_tag().to_string();
        Self {
            object_id,
            type_tag,
            geometry,
            metadata: source.into_fields(),
        }
    }
}
