//! Query point representations accepted by the search entry points.
//!
//! A query is either a single point (fixed 3-vector, slice, `Vec` or 1-D
//! array) or a batch laid out like the dataset matrices: one column per
//! point, `dimension` rows.

use ndarray::{ArrayBase, Data, Ix1, Ix2};

/// Anything that can be flattened into a row-major f32 query batch.
pub trait QueryPoints {
    /// Coordinates per query point.
    fn dimension(&self) -> usize;

    /// Number of query points.
    fn count(&self) -> usize;

    /// Append the query points, point after point, narrowed to f32.
    fn extend_f32(&self, out: &mut Vec<f32>);

    fn to_f32(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.dimension() * self.count());
        self.extend_f32(&mut out);
        out
    }
}

impl QueryPoints for [f64] {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn count(&self) -> usize {
        1
    }

    fn extend_f32(&self, out: &mut Vec<f32>) {
        out.extend(self.iter().map(|&v| v as f32));
    }
}

impl QueryPoints for [f64; 3] {
    fn dimension(&self) -> usize {
        3
    }

    fn count(&self) -> usize {
        1
    }

    fn extend_f32(&self, out: &mut Vec<f32>) {
        self.as_slice().extend_f32(out);
    }
}

impl QueryPoints for Vec<f64> {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn count(&self) -> usize {
        1
    }

    fn extend_f32(&self, out: &mut Vec<f32>) {
        self.as_slice().extend_f32(out);
    }
}

impl<S: Data<Elem = f64>> QueryPoints for ArrayBase<S, Ix1> {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn count(&self) -> usize {
        1
    }

    fn extend_f32(&self, out: &mut Vec<f32>) {
        out.extend(self.iter().map(|&v| v as f32));
    }
}

impl<S: Data<Elem = f64>> QueryPoints for ArrayBase<S, Ix2> {
    fn dimension(&self) -> usize {
        self.nrows()
    }

    fn count(&self) -> usize {
        self.ncols()
    }

    fn extend_f32(&self, out: &mut Vec<f32>) {
        // Transposed logical order walks one column (point) at a time.
        out.extend(self.t().iter().map(|&v| v as f32));
    }
}

impl<T: QueryPoints + ?Sized> QueryPoints for &T {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn extend_f32(&self, out: &mut Vec<f32>) {
        (**self).extend_f32(out)
    }
}
