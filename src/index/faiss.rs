//! Backend delegating to faiss `IndexFlatL2`.

use faiss::index::IndexImpl;
use faiss::{index_factory, Index, MetricType};
use parking_lot::Mutex;

use crate::error::{FlatKnnError, Result};
use crate::index::traits::{FlatIndexBackend, RangeSearchResult};
use crate::types::MISSING_LABEL;

fn backend_err(e: faiss::error::Error) -> FlatKnnError {
    FlatKnnError::Backend(e.to_string())
}

fn to_label(idx: faiss::Idx) -> i64 {
    idx.get().map(|v| v as i64).unwrap_or(MISSING_LABEL)
}

/// Exclusively owned faiss flat L2 index.
///
/// faiss' search calls take `&mut self`; the mutex lets queries go through
/// `&self` like the rest of the adapter.
pub struct FaissFlatL2 {
    dimension: usize,
    inner: Mutex<IndexImpl>,
}

impl FaissFlatL2 {
    pub fn new(dimension: usize) -> Result<Self> {
        let d = u32::try_from(dimension)
            .map_err(|_| FlatKnnError::Backend(format!("dimension {dimension} too large")))?;
        let index = index_factory(d, "Flat", MetricType::L2).map_err(backend_err)?;
        Ok(Self {
            dimension,
            inner: Mutex::new(index),
        })
    }
}

impl FlatIndexBackend for FaissFlatL2 {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn ntotal(&self) -> usize {
        self.inner.lock().ntotal() as usize
    }

    fn add(&mut self, data: &[f32]) -> Result<()> {
        if data.len() % self.dimension != 0 {
            return Err(FlatKnnError::BufferShape {
                len: data.len(),
                dimension: self.dimension,
            });
        }
        self.inner.get_mut().add(data).map_err(backend_err)
    }

    fn search(
        &self,
        queries: &[f32],
        k: usize,
        distances: &mut [f32],
        labels: &mut [i64],
    ) -> Result<()> {
        if k == 0 {
            return Ok(());
        }
        let result = self.inner.lock().search(queries, k).map_err(backend_err)?;
        let n = result.distances.len();
        if distances.len() < n || labels.len() < n {
            return Err(FlatKnnError::Backend(format!(
                "output buffers too small: need {n} slots"
            )));
        }
        distances[..n].copy_from_slice(&result.distances);
        for (slot, idx) in labels.iter_mut().zip(result.labels) {
            *slot = to_label(idx);
        }
        Ok(())
    }

    fn range_search(&self, queries: &[f32], radius: f32) -> Result<RangeSearchResult> {
        let result = self
            .inner
            .lock()
            .range_search(queries, radius)
            .map_err(backend_err)?;
        Ok(RangeSearchResult {
            lims: result.lims().to_vec(),
            labels: result.labels().iter().map(|&idx| to_label(idx)).collect(),
            distances: result.distances().to_vec(),
        })
    }
}
