//! Store client contract and on-demand graph materialization.
//!
//! The remote content-addressable store is consumed through two operations:
//! an async iteration over top-level fragments of a root object, and a point
//! lookup by content id. Everything that needs the store during a load goes
//! through the [`Resolver`], which turns reference stubs into objects and
//! chunked arrays into flat arrays.
//!
//! # Store Backends
//!
//! All backends implement the [`ObjectSource`] trait:
//!
//! - [`InMemoryObjectSource`] -- map-backed source for tests, embedding and
//!   JSON dumps (see [`dump`])
//!
//! # Design Rules
//!
//! 1. Stored objects are immutable; resolving an id twice yields equal content.
//! 2. Concurrent lookups are always safe.
//! 3. Chunks are resolved one at a time, in array order.
//! 4. Lookup failures are propagated to the caller, never swallowed.

pub mod cache;
pub mod chunk;
pub mod dump;
pub mod error;
pub mod memory;
pub mod resolver;
pub mod traits;

pub use cache::FragmentCache;
pub use chunk::{chunk_values, ChunkedArray, CHUNK_DATA_FIELD, CHUNK_TYPE};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectSource;
pub use resolver::Resolver;
pub use traits::{Fragment, FragmentStream, ObjectSource, StoreConnector, StoreTarget};
