//! Core trait definition for flat L2 index backends.
//!
//! The adapter owns exactly one backend and talks to it only through
//! `FlatIndexBackend`, so the in-process scan and the external faiss index
//! are interchangeable.

use std::cmp::Ordering;

use crate::error::Result;

/// Ascending distance with NaN after every number, ties broken by label.
///
/// A total order, so it is safe to hand to the slice sorts.
pub(crate) fn nearest_first(a: &(f32, i64), b: &(f32, i64)) -> Ordering {
    a.0.is_nan()
        .cmp(&b.0.is_nan())
        .then_with(|| a.0.total_cmp(&b.0))
        .then_with(|| a.1.cmp(&b.1))
}

/// Grouped output of a radius search over a query batch.
///
/// Hits for query `i` live in `labels[lims[i]..lims[i + 1]]` and the matching
/// slice of `distances`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSearchResult {
    pub lims: Vec<usize>,
    pub labels: Vec<i64>,
    pub distances: Vec<f32>,
}

impl RangeSearchResult {
    /// An empty result prepared for `query_count` queries.
    pub fn with_queries(query_count: usize) -> Self {
        let mut lims = Vec::with_capacity(query_count + 1);
        lims.push(0);
        Self {
            lims,
            labels: Vec::new(),
            distances: Vec::new(),
        }
    }

    /// Number of queries this result covers.
    pub fn query_count(&self) -> usize {
        self.lims.len().saturating_sub(1)
    }

    /// Total hits across all queries.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels and squared distances found for query `i`.
    pub fn hits(&self, i: usize) -> (&[i64], &[f32]) {
        let (start, end) = (self.lims[i], self.lims[i + 1]);
        (&self.labels[start..end], &self.distances[start..end])
    }

    /// Order each query's hits by ascending distance, then ascending label.
    /// NaN distances sort last.
    pub fn sort_hits(&mut self) {
        for q in 0..self.query_count() {
            let (start, end) = (self.lims[q], self.lims[q + 1]);
            let mut pairs: Vec<(f32, i64)> = self.distances[start..end]
                .iter()
                .copied()
                .zip(self.labels[start..end].iter().copied())
                .collect();
            pairs.sort_by(nearest_first);
            for (offset, (d, l)) in pairs.into_iter().enumerate() {
                self.distances[start + offset] = d;
                self.labels[start + offset] = l;
            }
        }
    }
}

/// An exact L2 index over a flat, row-major f32 buffer.
///
/// Distances reported by every method are squared Euclidean distances.
pub trait FlatIndexBackend: Send {
    /// Coordinates per point.
    fn dimension(&self) -> usize;

    /// Number of points added so far.
    fn ntotal(&self) -> usize;

    /// Append `data.len() / dimension` points.
    ///
    /// # Errors
    /// Returns `FlatKnnError::BufferShape` if `data` does not hold whole points.
    fn add(&mut self, data: &[f32]) -> Result<()>;

    /// Write the `k` nearest neighbors of every query point.
    ///
    /// `distances` and `labels` must hold at least `nq * k` slots; query `i`
    /// owns slots `i * k..(i + 1) * k`, sorted by ascending distance. Slots
    /// beyond `ntotal` are filled with `MISSING_LABEL` / `MISSING_DISTANCE`.
    fn search(
        &self,
        queries: &[f32],
        k: usize,
        distances: &mut [f32],
        labels: &mut [i64],
    ) -> Result<()>;

    /// Collect every point whose squared distance to a query is within
    /// `radius`.
    fn range_search(&self, queries: &[f32], radius: f32) -> Result<RangeSearchResult>;
}
