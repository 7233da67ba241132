use crate::error::{FlatKnnError, Result};
use crate::index::distance::squared_euclidean;
use crate::index::traits::{nearest_first, FlatIndexBackend, RangeSearchResult};
use crate::types::{MISSING_DISTANCE, MISSING_LABEL};

/// Exact, row-major flat index scanned exhaustively on every query.
pub struct ExhaustiveFlatL2 {
    dimension: usize,
    vectors: Vec<f32>, // flattened: len = ntotal * dimension
}

impl ExhaustiveFlatL2 {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    #[inline]
    fn row(&self, i: usize) -> &[f32] {
        let start = i * self.dimension;
        &self.vectors[start..start + self.dimension]
    }

    fn point_count(&self, queries: &[f32]) -> Result<usize> {
        if self.dimension == 0 || queries.len() % self.dimension != 0 {
            return Err(FlatKnnError::BufferShape {
                len: queries.len(),
                dimension: self.dimension,
            });
        }
        Ok(queries.len() / self.dimension)
    }

    /// The `k` stored points nearest to `query`, nearest first. Points with
    /// a NaN distance rank after all others.
    fn ranked(&self, query: &[f32], k: usize) -> Vec<(f32, i64)> {
        let mut scored: Vec<(f32, i64)> = (0..self.ntotal())
            .map(|i| (squared_euclidean(query, self.row(i)), i as i64))
            .collect();
        if k == 0 {
            scored.clear();
        } else if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, nearest_first);
            scored.truncate(k);
        }
        scored.sort_by(nearest_first);
        scored
    }
}

impl FlatIndexBackend for ExhaustiveFlatL2 {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn ntotal(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.vectors.len() / self.dimension
        }
    }

    fn add(&mut self, data: &[f32]) -> Result<()> {
        self.point_count(data)?;
        self.vectors.extend_from_slice(data);
        Ok(())
    }

    fn search(
        &self,
        queries: &[f32],
        k: usize,
        distances: &mut [f32],
        labels: &mut [i64],
    ) -> Result<()> {
        let nq = self.point_count(queries)?;
        let slots = nq
            .checked_mul(k)
            .ok_or(FlatKnnError::ResultTooLarge { queries: nq, k })?;
        if distances.len() < slots || labels.len() < slots {
            return Err(FlatKnnError::Backend(format!(
                "output buffers too small: need {slots} slots, got {} distances and {} labels",
                distances.len(),
                labels.len()
            )));
        }
        if k == 0 {
            return Ok(());
        }

        for (qi, query) in queries.chunks_exact(self.dimension).enumerate() {
            let ranked = self.ranked(query, k);
            let out_d = &mut distances[qi * k..(qi + 1) * k];
            let out_l = &mut labels[qi * k..(qi + 1) * k];
            for slot in 0..k {
                let (d, l) = ranked
                    .get(slot)
                    .copied()
                    .unwrap_or((MISSING_DISTANCE, MISSING_LABEL));
                out_d[slot] = d;
                out_l[slot] = l;
            }
        }
        Ok(())
    }

    fn range_search(&self, queries: &[f32], radius: f32) -> Result<RangeSearchResult> {
        let nq = self.point_count(queries)?;
        let mut result = RangeSearchResult::with_queries(nq);

        for query in queries.chunks_exact(self.dimension) {
            for i in 0..self.ntotal() {
                let d = squared_euclidean(query, self.row(i));
                if d <= radius {
                    result.labels.push(i as i64);
                    result.distances.push(d);
                }
            }
            result.lims.push(result.labels.len());
        }
        Ok(result)
    }
}
