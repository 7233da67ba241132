use serde::{Deserialize, Serialize};

/// Label written into unused k-nearest slots when the dataset holds fewer
/// than `k` points.
pub const MISSING_LABEL: i64 = -1;

/// Distance written alongside [`MISSING_LABEL`].
pub const MISSING_DISTANCE: f32 = f32::MAX;

/// Default neighbor count for [`SearchParam::default`].
pub const DEFAULT_KNN: usize = 30;

/// Which flat L2 index implementation backs an adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// In-process exhaustive scan.
    #[default]
    Exhaustive,
    /// The external faiss `IndexFlatL2` (requires the `faiss` feature).
    Faiss,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Exhaustive => write!(f, "exhaustive"),
            BackendKind::Faiss => write!(f, "faiss"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exhaustive" | "flat" => Ok(BackendKind::Exhaustive),
            "faiss" => Ok(BackendKind::Faiss),
            other => Err(format!("unknown index backend: {other}")),
        }
    }
}

/// Tag of a [`SearchParam`], used for dispatch, errors and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Knn,
    Radius,
    Hybrid,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Knn => "knn",
            SearchKind::Radius => "radius",
            SearchKind::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-query search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchParam {
    /// The `knn` closest points.
    Knn { knn: usize },
    /// Every point whose squared distance is at most `radius`.
    Radius { radius: f32 },
    /// Radius search capped at `max_nn` hits. Not supported by flat indexes.
    Hybrid { radius: f32, max_nn: usize },
}

impl SearchParam {
    pub fn kind(&self) -> SearchKind {
        match self {
            SearchParam::Knn { .. } => SearchKind::Knn,
            SearchParam::Radius { .. } => SearchKind::Radius,
            SearchParam::Hybrid { .. } => SearchKind::Hybrid,
        }
    }
}

impl Default for SearchParam {
    fn default() -> Self {
        SearchParam::Knn { knn: DEFAULT_KNN }
    }
}
