//! The flat-index adapter.
//!
//! `FlatKnn` copies caller data into an owned row-major f32 buffer, hands it
//! to a freshly built [`FlatIndexBackend`], and forwards k-nearest and radius
//! queries to that backend, writing results into caller-owned buffers.
//!
//! Ingestion narrows f64 input to f32. The conversion is lossy and one-way:
//! the adapter never hands wide-precision data back.

use std::time::Instant;

use ndarray::{Array2, ArrayView2};
use tracing::{debug, instrument, warn};

use crate::config::IndexConfig;
use crate::error::{FlatKnnError, Result};
use crate::geometry::{Feature, Geometry};
use crate::index::{build_backend, FlatIndexBackend, RangeSearchResult};
use crate::metrics::{status_label, INGESTIONS_TOTAL, SEARCHES_TOTAL, SEARCH_DURATION};
use crate::query::QueryPoints;
use crate::types::{BackendKind, SearchKind, SearchParam, MISSING_DISTANCE, MISSING_LABEL};

/// Exact L2 nearest-neighbor search over a single, fully rebuilt dataset.
pub struct FlatKnn {
    backend: BackendKind,
    data: Vec<f32>,
    dimension: usize,
    dataset_size: usize,
    index: Option<Box<dyn FlatIndexBackend>>,
}

impl std::fmt::Debug for FlatKnn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatKnn")
            .field("backend", &self.backend)
            .field("dimension", &self.dimension)
            .field("dataset_size", &self.dataset_size)
            .field("indexed", &self.index.is_some())
            .finish()
    }
}

impl Default for FlatKnn {
    fn default() -> Self {
        Self::new()
    }
}

fn record_search<T>(kind: SearchKind, result: &Result<T>, started: Instant) {
    SEARCHES_TOTAL
        .with_label_values(&[kind.as_str(), status_label(result)])
        .inc();
    SEARCH_DURATION
        .with_label_values(&[kind.as_str()])
        .observe(started.elapsed().as_secs_f64());
}

/// A `len`-slot buffer of `value`, or `None` if it cannot be allocated.
fn filled<T: Clone>(len: usize, value: T) -> Option<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).ok()?;
    buffer.resize(len, value);
    Some(buffer)
}

fn record_ingestion(source: &str, result: &Result<()>) {
    INGESTIONS_TOTAL
        .with_label_values(&[source, status_label(result)])
        .inc();
}

impl FlatKnn {
    /// An empty adapter backed by the in-process exhaustive index.
    pub fn new() -> Self {
        Self::with_backend(BackendKind::default())
    }

    pub fn with_backend(backend: BackendKind) -> Self {
        Self {
            backend,
            data: Vec::new(),
            dimension: 0,
            dataset_size: 0,
            index: None,
        }
    }

    pub fn from_config(config: &IndexConfig) -> Self {
        Self::with_backend(config.backend)
    }

    pub fn from_matrix(data: &Array2<f64>) -> Result<Self> {
        let mut knn = Self::new();
        knn.set_matrix_data(data)?;
        Ok(knn)
    }

    pub fn from_geometry(geometry: &Geometry) -> Result<Self> {
        let mut knn = Self::new();
        knn.set_geometry(geometry)?;
        Ok(knn)
    }

    pub fn from_feature(feature: &Feature) -> Result<Self> {
        let mut knn = Self::new();
        knn.set_feature(feature)?;
        Ok(knn)
    }

    pub fn from_tensor(data: ArrayView2<'_, f32>) -> Result<Self> {
        let mut knn = Self::new();
        knn.set_tensor_data(data)?;
        Ok(knn)
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Coordinates per indexed point; 0 until data is set.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of indexed points; 0 until data is set.
    pub fn dataset_size(&self) -> usize {
        self.dataset_size
    }

    pub fn is_empty(&self) -> bool {
        self.dataset_size == 0
    }

    /// The indexed points, row-major, narrowed to f32.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    // --- Ingestion ---

    pub fn set_matrix_data(&mut self, data: &Array2<f64>) -> Result<()> {
        self.set_raw_data(data.view())
    }

    /// Index the columns of `data` (rows = dimension, columns = points).
    ///
    /// Rejects empty matrices with a warning and leaves any previous index
    /// in place. On success the previous index is discarded and replaced.
    pub fn set_raw_data(&mut self, data: ArrayView2<'_, f64>) -> Result<()> {
        self.ingest_columns("matrix", data)
    }

    #[instrument(skip(self, data), fields(rows = data.nrows(), cols = data.ncols()))]
    fn ingest_columns(&mut self, source: &'static str, data: ArrayView2<'_, f64>) -> Result<()> {
        let (dimension, dataset_size) = data.dim();
        let result = if dimension == 0 || dataset_size == 0 {
            warn!(
                dimension,
                dataset_size, "[FlatKnn::set_raw_data] failed due to no data"
            );
            Err(FlatKnnError::EmptyData {
                rows: dimension,
                cols: dataset_size,
            })
        } else {
            let buffer: Vec<f32> = data.t().iter().map(|&v| v as f32).collect();
            self.rebuild("set_raw_data", dimension, dataset_size, buffer)
        };
        record_ingestion(source, &result);
        result
    }

    /// Index a row-major `points x dimension` f32 tensor as is.
    #[instrument(skip_all, fields(rows = data.nrows(), cols = data.ncols()))]
    pub fn set_tensor_data(&mut self, data: ArrayView2<'_, f32>) -> Result<()> {
        let (dataset_size, dimension) = data.dim();
        let result = if dimension == 0 || dataset_size == 0 {
            warn!(
                dimension,
                dataset_size, "[FlatKnn::set_tensor_data] failed due to no data"
            );
            Err(FlatKnnError::EmptyData {
                rows: dataset_size,
                cols: dimension,
            })
        } else {
            let buffer: Vec<f32> = data.iter().copied().collect();
            self.rebuild("set_tensor_data", dimension, dataset_size, buffer)
        };
        record_ingestion("tensor", &result);
        result
    }

    /// Index the points of a point cloud or the vertices of a mesh.
    pub fn set_geometry(&mut self, geometry: &Geometry) -> Result<()> {
        match geometry {
            Geometry::PointCloud(pc) => self.ingest_columns("geometry", pc.points_view()?),
            Geometry::TriangleMesh(mesh) => {
                self.ingest_columns("geometry", mesh.vertices_view()?)
            }
            Geometry::HalfEdgeTriangleMesh(mesh) => {
                self.ingest_columns("geometry", mesh.vertices_view()?)
            }
            Geometry::Image(_) | Geometry::Unspecified => {
                let geometry_type = geometry.geometry_type();
                warn!(%geometry_type, "[FlatKnn::set_geometry] unsupported geometry type");
                let result: Result<()> = Err(FlatKnnError::UnsupportedGeometry { geometry_type });
                record_ingestion("geometry", &result);
                result
            }
        }
    }

    pub fn set_feature(&mut self, feature: &Feature) -> Result<()> {
        self.ingest_columns("feature", feature.data.view())
    }

    /// Build a fresh backend over `buffer` and swap it in. State is only
    /// touched once the new index is fully populated.
    fn rebuild(
        &mut self,
        call_site: &str,
        dimension: usize,
        dataset_size: usize,
        buffer: Vec<f32>,
    ) -> Result<()> {
        let built = build_backend(self.backend, dimension).and_then(|mut index| {
            index.add(&buffer)?;
            Ok(index)
        });
        let index = match built {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, backend = %self.backend, "[FlatKnn::{call_site}] failed to build index");
                return Err(e);
            }
        };

        self.data = buffer;
        self.dimension = dimension;
        self.dataset_size = dataset_size;
        self.index = Some(index);

        debug!(dimension, dataset_size, backend = %self.backend, "flat index rebuilt");
        Ok(())
    }

    // --- Search ---

    /// Dispatch on the parameter kind. Hybrid searches are not supported by
    /// a flat index and fail without searching.
    pub fn search<Q: QueryPoints + ?Sized>(
        &self,
        query: &Q,
        param: &SearchParam,
        indices: &mut Vec<i64>,
        distance2: &mut Vec<f32>,
    ) -> Result<usize> {
        match *param {
            SearchParam::Knn { knn } => self.search_knn(query, knn, indices, distance2),
            SearchParam::Radius { radius } => {
                self.search_radius(query, radius, indices, distance2)
            }
            SearchParam::Hybrid { .. } => {
                let result: Result<usize> = Err(FlatKnnError::UnsupportedSearch {
                    kind: SearchKind::Hybrid,
                });
                record_search(SearchKind::Hybrid, &result, Instant::now());
                result
            }
        }
    }

    /// Write the `k` nearest neighbors of every query point into `indices`
    /// and `distance2` (query-major, `count * k` entries) and return `k`.
    ///
    /// The buffers are refilled in place, so reusing them across calls avoids
    /// reallocation. They are left untouched when the search fails, including
    /// when `count * k` slots cannot be allocated.
    #[instrument(level = "debug", skip(self, query, indices, distance2))]
    pub fn search_knn<Q: QueryPoints + ?Sized>(
        &self,
        query: &Q,
        k: usize,
        indices: &mut Vec<i64>,
        distance2: &mut Vec<f32>,
    ) -> Result<usize> {
        let started = Instant::now();
        let result = self.knn_into(query, k, indices, distance2);
        record_search(SearchKind::Knn, &result, started);
        result
    }

    /// Write every point within squared distance `radius` of the query points
    /// into `indices` and `distance2` and return the number of hits.
    ///
    /// Hits are grouped per query point in query order, nearest first.
    #[instrument(level = "debug", skip(self, query, indices, distance2))]
    pub fn search_radius<Q: QueryPoints + ?Sized>(
        &self,
        query: &Q,
        radius: f32,
        indices: &mut Vec<i64>,
        distance2: &mut Vec<f32>,
    ) -> Result<usize> {
        let started = Instant::now();
        let result = self.range_into(query, radius).map(|hits| {
            indices.clear();
            indices.extend_from_slice(&hits.labels);
            distance2.clear();
            distance2.extend_from_slice(&hits.distances);
            hits.len()
        });
        record_search(SearchKind::Radius, &result, started);
        result
    }

    /// Radius search returning hits grouped per query point.
    #[instrument(level = "debug", skip(self, query))]
    pub fn range_search<Q: QueryPoints + ?Sized>(
        &self,
        query: &Q,
        radius: f32,
    ) -> Result<RangeSearchResult> {
        let started = Instant::now();
        let result = self.range_into(query, radius);
        record_search(SearchKind::Radius, &result, started);
        result
    }

    /// Check the shared preconditions and flatten the query.
    fn prepare<Q: QueryPoints + ?Sized>(
        &self,
        query: &Q,
    ) -> Result<(&dyn FlatIndexBackend, Vec<f32>)> {
        let index = match &self.index {
            Some(index) if !self.data.is_empty() && self.dataset_size > 0 => index,
            _ => return Err(FlatKnnError::EmptyIndex),
        };
        if query.dimension() != self.dimension {
            return Err(FlatKnnError::DimensionMismatch {
                expected: self.dimension,
                actual: query.dimension(),
            });
        }
        Ok((index.as_ref(), query.to_f32()))
    }

    fn knn_into<Q: QueryPoints + ?Sized>(
        &self,
        query: &Q,
        k: usize,
        indices: &mut Vec<i64>,
        distance2: &mut Vec<f32>,
    ) -> Result<usize> {
        let (index, queries) = self.prepare(query)?;
        let count = query.count();
        let too_large = || FlatKnnError::ResultTooLarge { queries: count, k };
        let slots = count.checked_mul(k).ok_or_else(too_large)?;
        let mut labels = filled(slots, MISSING_LABEL).ok_or_else(too_large)?;
        let mut distances = filled(slots, MISSING_DISTANCE).ok_or_else(too_large)?;
        index.search(&queries, k, &mut distances, &mut labels)?;

        indices.clear();
        indices.extend_from_slice(&labels);
        distance2.clear();
        distance2.extend_from_slice(&distances);
        debug!(queries = count, k, "knn search complete");
        Ok(k)
    }

    fn range_into<Q: QueryPoints + ?Sized>(
        &self,
        query: &Q,
        radius: f32,
    ) -> Result<RangeSearchResult> {
        let (index, queries) = self.prepare(query)?;
        let mut hits = index.range_search(&queries, radius)?;
        hits.sort_hits();
        debug!(queries = query.count(), hits = hits.len(), "radius search complete");
        Ok(hits)
    }
}
