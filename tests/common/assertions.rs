use flatknn::error::FlatKnnError;

/// Assert that squared distances never decrease within each query's block
/// of `k` results.
pub fn assert_sorted_per_query(distance2: &[f32], k: usize) {
    if k == 0 {
        return;
    }
    for (q, block) in distance2.chunks(k).enumerate() {
        for w in block.windows(2) {
            assert!(
                w[0] <= w[1],
                "distances for query {q} are not sorted: {block:?}"
            );
        }
    }
}

/// Assert that every index lies in `[0, size)`.
pub fn assert_indices_in_range(indices: &[i64], size: usize) {
    for &i in indices {
        assert!(
            i >= 0 && (i as usize) < size,
            "index {i} outside dataset of size {size}"
        );
    }
}

/// Assert that `actual` matches `expected` within `eps` element-wise.
pub fn assert_close(actual: &[f32], expected: &[f32], eps: f32) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= eps,
            "element {i}: got {a}, expected {e} (eps {eps})"
        );
    }
}

pub fn assert_dimension_mismatch<T: std::fmt::Debug>(
    result: &Result<T, FlatKnnError>,
    expected: usize,
    actual: usize,
) {
    match result {
        Err(FlatKnnError::DimensionMismatch {
            expected: e,
            actual: a,
        }) => {
            assert_eq!(*e, expected);
            assert_eq!(*a, actual);
        }
        other => panic!("expected DimensionMismatch, got: {other:?}"),
    }
}

pub fn assert_empty_index<T: std::fmt::Debug>(result: &Result<T, FlatKnnError>) {
    match result {
        Err(FlatKnnError::EmptyIndex) => {}
        other => panic!("expected EmptyIndex, got: {other:?}"),
    }
}
