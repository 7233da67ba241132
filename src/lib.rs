//! flatknn: exact L2 nearest-neighbor adapter for point clouds, meshes and
//! feature matrices.

pub mod adapter;
pub mod config;
pub mod error;
pub mod geometry;
pub mod index;
pub mod logging;
pub mod metrics;
pub mod query;
pub mod types;

pub use adapter::FlatKnn;
pub use error::{FlatKnnError, Result};
pub use types::{BackendKind, SearchParam};
