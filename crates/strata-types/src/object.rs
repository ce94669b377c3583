use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Length of ids derived by [`ObjectId::for_content`], in hex characters.
const DERIVED_ID_LEN: usize = 32;

/// Content id of a stored object.
///
/// Stores hand out ids as opaque strings; the only structural requirement is
/// that an id is non-empty and free of whitespace. Ids minted locally (for
/// example by the chunk writer) are derived from the BLAKE3 hash of the
/// object's serialized content, so identical content always maps to the same
/// id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Validate and wrap a store-issued id.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::EmptyObjectId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidObjectId(id));
        }
        Ok(Self(id))
    }

    /// Derive the id of a JSON value from its serialized content.
    pub fn for_content(value: &Value) -> Self {
        let hash = blake3::hash(value.to_string().as_bytes());
        let mut id = hex::encode(hash.as_bytes());
        id.truncate(DERIVED_ID_LEN);
        Self(id)
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 8 characters) for log output.
    pub fn short_id(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map_or(self.0.len(), |(idx, _)| idx);
        &self.0[..end]
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_id())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}
