//! Index backends for the flat L2 adapter.
//!
//! Provides the `FlatIndexBackend` trait, the squared-L2 kernel, and the
//! concrete backends (in-process exhaustive scan, faiss behind a feature).

pub mod distance;
#[cfg(feature = "faiss")]
pub mod faiss;
pub mod flat;
pub mod traits;

pub use flat::ExhaustiveFlatL2;
pub use traits::{FlatIndexBackend, RangeSearchResult};

use crate::error::Result;
use crate::types::BackendKind;

/// Construct an empty backend of the requested kind for `dimension`-wide points.
///
/// # Errors
/// Returns `FlatKnnError::BackendUnavailable` when the kind was not compiled in.
pub fn build_backend(kind: BackendKind, dimension: usize) -> Result<Box<dyn FlatIndexBackend>> {
    match kind {
        BackendKind::Exhaustive => Ok(Box::new(ExhaustiveFlatL2::new(dimension))),
        #[cfg(feature = "faiss")]
        BackendKind::Faiss => Ok(Box::new(self::faiss::FaissFlatL2::new(dimension)?)),
        #[cfg(not(feature = "faiss"))]
        BackendKind::Faiss => Err(crate::error::FlatKnnError::BackendUnavailable { backend: kind }),
    }
}
