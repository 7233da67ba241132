use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flatknn::geometry::{Point3, PointCloud};

/// Generate `n` random 3-D points uniformly in `[0, 10)^3`.
pub fn random_points(n: usize, seed: u64) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            [
                rng.gen_range(0.0..10.0),
                rng.gen_range(0.0..10.0),
                rng.gen_range(0.0..10.0),
            ]
        })
        .collect()
}

pub fn random_cloud(n: usize, seed: u64) -> PointCloud {
    PointCloud::new(random_points(n, seed))
}

/// A `dims x n` matrix with uniform values in [-1, 1], one column per point.
pub fn random_matrix(dims: usize, n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((dims, n), |_| rng.gen_range(-1.0..1.0))
}

/// Brute-force ground truth: (index, squared distance) for every column of
/// `data`, nearest first, computed in f32 like the index does.
pub fn ranked_neighbors(data: &Array2<f64>, query: &[f64]) -> Vec<(i64, f32)> {
    let mut ranked: Vec<(i64, f32)> = data
        .columns()
        .into_iter()
        .enumerate()
        .map(|(i, col)| {
            let d: f32 = col
                .iter()
                .zip(query)
                .map(|(&a, &b)| {
                    let diff = a as f32 - b as f32;
                    diff * diff
                })
                .sum();
            (i as i64, d)
        })
        .collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));
    ranked
}

/// Column `i` of `data` as an owned query vector.
pub fn column(data: &Array2<f64>, i: usize) -> Vec<f64> {
    data.column(i).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_points() {
        let pts = random_points(10, 0);
        assert_eq!(pts.len(), 10);
        assert!(pts.iter().flatten().all(|&v| (0.0..10.0).contains(&v)));
        assert_eq!(pts, random_points(10, 0));
    }

    #[test]
    fn test_ranked_neighbors() {
        let data = Array2::from_shape_vec((1, 3), vec![0.0, 5.0, 1.0]).unwrap();
        let ranked = ranked_neighbors(&data, &[0.0]);
        assert_eq!(ranked[0], (0, 0.0));
        assert_eq!(ranked[1], (2, 1.0));
        assert_eq!(ranked[2], (1, 25.0));
    }
}
