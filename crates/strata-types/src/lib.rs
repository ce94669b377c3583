//! Foundation types for Strata.
//!
//! Every other Strata crate depends on `strata-types`. It defines how a raw
//! decoded store value is classified before anything else touches it.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content id of a stored object
//! - [`GraphNode`] -- Tagged union over primitive, reference, array and object nodes
//! - [`TypedObject`] -- A materialized structured object with its type tag
//! - [`Unit`] -- Length units and their factor to metres

pub mod error;
pub mod node;
pub mod object;
pub mod units;

pub use error::TypeError;
pub use node::{GraphNode, TypedObject, BASE_TYPE, REFERENCE_FIELD, TYPE_FIELD};
pub use object::ObjectId;
pub use units::{conversion_factor, Unit};

/// Field map of a structured object, as decoded from the store.
pub type Fields = serde_json::Map<String, serde_json::Value>;
