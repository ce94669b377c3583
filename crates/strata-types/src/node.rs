//! Decoded graph nodes.
//!
//! The store hands back plain JSON. Before traversal or conversion looks at a
//! value it is classified exactly once into a [`GraphNode`], so no downstream
//! code has to probe for `referencedId` or array-ness on its own.

use serde_json::Value;

use crate::object::ObjectId;
use crate::Fields;

/// Field that turns a structured object into a reference stub.
pub const REFERENCE_FIELD: &str = "referencedId";

/// Field carrying the dotted domain-type discriminator.
pub const TYPE_FIELD: &str = "speckle_type";

/// Type tag assumed when an object declares none.
pub const BASE_TYPE: &str = "Base";

/// A decoded unit of the object graph.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphNode {
    /// Null, boolean, number or string. Always a leaf.
    Primitive(Value),
    /// Placeholder pointing at another stored object.
    Reference(ObjectId),
    /// Ordered sequence of child values.
    Array(Vec<Value>),
    /// Materialized structured object.
    Object(TypedObject),
}

impl GraphNode {
    /// Classify a raw value.
    ///
    /// An object whose `referencedId` is a valid id is a reference stub no
    /// matter what other fields it carries.
    pub fn decode(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Array(items),
            Value::Object(fields) => match reference_target(&fields) {
                Some(id) => Self::Reference(id),
                None => Self::Object(TypedObject::from_fields(fields)),
            },
            other => Self::Primitive(other),
        }
    }

    /// Returns the referenced id if `value` is a reference stub.
    pub fn reference_of(value: &Value) -> Option<ObjectId> {
        value.as_object().and_then(reference_target)
    }

    /// Returns `true` if `value` is a reference stub.
    pub fn is_reference(value: &Value) -> bool {
        Self::reference_of(value).is_some()
    }

    /// Short label for the node kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Reference(_) => "reference",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Convert back into a raw value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Primitive(value) => value,
            Self::Reference(id) => {
                let mut fields = Fields::new();
                fields.insert(REFERENCE_FIELD.into(), Value::String(id.into()));
                Value::Object(fields)
            }
            Self::Array(items) => Value::Array(items),
            Self::Object(object) => object.into_value(),
        }
    }
}

impl From<Value> for GraphNode {
    fn from(value: Value) -> Self {
        Self::decode(value)
    }
}

fn reference_target(fields: &Fields) -> Option<ObjectId> {
    fields
        .get(REFERENCE_FIELD)
        .and_then(Value::as_str)
        .and_then(|id| ObjectId::new(id).ok())
}

/// Derive the type tag from an object's discriminator field.
///
/// `"Objects.Geometry.Mesh"` yields `"Mesh"`; a missing or empty
/// discriminator yields [`BASE_TYPE`].
pub fn type_tag_of(fields: &Fields) -> String {
    fields
        .get(TYPE_FIELD)
        .and_then(Value::as_str)
        .and_then(|full| full.rsplit('.').next())
        .filter(|tag| !tag.is_empty())
        .unwrap_or(BASE_TYPE)
        .to_string()
}

/// A materialized structured object together with its type tag.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedObject {
    id: Option<ObjectId>,
    type_tag: String,
    fields: Fields,
}

impl TypedObject {
    /// Build from a decoded field map.
    pub fn from_fields(fields: Fields) -> Self {
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| ObjectId::new(id).ok());
        let type_tag = type_tag_of(&fields);
        Self {
            id,
            type_tag,
            fields,
        }
    }

    /// The object's own id, if it declares one.
    pub fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    /// Last segment of the type discriminator.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Remove a field and return its value.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Remove every field whose name matches one of `names`, ignoring ASCII
    /// case. Returns the number of fields removed.
    pub fn strip_fields(&mut self, names: &[&str]) -> usize {
        let before = self.fields.len();
        self.fields
            .retain(|key, _| !names.iter().any(|name| key.eq_ignore_ascii_case(name)));
        before - self.fields.len()
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
