use thiserror::Error;

use crate::geometry::GeometryType;
use crate::types::{BackendKind, SearchKind};

#[derive(Error, Debug)]
pub enum FlatKnnError {
    // Ingestion errors
    #[error("no data to index: {rows} x {cols} matrix")]
    EmptyData { rows: usize, cols: usize },

    #[error("unsupported geometry type: {geometry_type}")]
    UnsupportedGeometry { geometry_type: GeometryType },

    #[error("buffer of length {len} does not hold whole points of dimension {dimension}")]
    BufferShape { len: usize, dimension: usize },

    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    // Search errors
    #[error("index has no data")]
    EmptyIndex,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("knn result of {queries} queries x {k} neighbors cannot be allocated")]
    ResultTooLarge { queries: usize, k: usize },

    #[error("unsupported search type: {kind}")]
    UnsupportedSearch { kind: SearchKind },

    // Backend errors
    #[error("index backend not available in this build: {backend}")]
    BackendUnavailable { backend: BackendKind },

    #[error("index backend error: {0}")]
    Backend(String),

    // Config errors
    #[error("config error: {0}")]
    Config(String),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlatKnnError>;

/// Coarse grouping of errors, mirroring how callers are expected to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller handed over data or a query that cannot be served.
    InvalidInput,
    /// The request is well formed but the operation is not implemented.
    UnsupportedOperation,
    /// The index backend or the environment failed.
    Backend,
}

impl FlatKnnError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FlatKnnError::EmptyData { .. }
            | FlatKnnError::UnsupportedGeometry { .. }
            | FlatKnnError::BufferShape { .. }
            | FlatKnnError::Shape(_)
            | FlatKnnError::EmptyIndex
            | FlatKnnError::DimensionMismatch { .. }
            | FlatKnnError::ResultTooLarge { .. } => ErrorCategory::InvalidInput,

            FlatKnnError::UnsupportedSearch { .. } => ErrorCategory::UnsupportedOperation,

            _ => ErrorCategory::Backend,
        }
    }

    /// Integer status for callers that still speak the sentinel convention,
    /// where every failed search or ingestion reports `-1`.
    pub fn return_code(&self) -> i32 {
        -1
    }
}
