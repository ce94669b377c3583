//! Streaming object-graph loading.
//!
//! A [`LoadSession`] takes a URL naming a root object, iterates the root's
//! fragments from the store, and walks the graph from the root with a
//! [`Dispatcher`], converting every recognized domain object and handing the
//! result to a [`SceneManager`]. Progress and warnings are broadcast as
//! [`LoaderEvent`]s.
//!
//! Work is interleaved on the tokio runtime that drives the session; with a
//! current-thread runtime nothing runs in parallel. Long stretches of
//! synchronous work are broken up by a [`CooperativeYield`].

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod scene;
pub mod session;
pub mod url;
pub mod yielding;

pub use auth::{resolve_token, save_token};
pub use config::LoaderConfig;
pub use dispatch::{Dispatcher, OnConverted, TraversalReport};
pub use error::{LoaderError, LoaderResult};
pub use events::LoaderEvent;
pub use scene::{InMemoryScene, SceneManager, SceneObject};
pub use session::{LoadSession, LoadSummary, ProgressState};
pub use url::ObjectUrl;
pub use yielding::CooperativeYield;

// Re-export the types a session's callers handle directly.
pub use strata_convert::{Converter, ConverterRegistry, WrappedResult};
pub use strata_geometry::GeometryBuffer;
pub use strata_store::{InMemoryObjectSource, ObjectSource, StoreConnector};
pub use strata_types::ObjectId;
