use std::ops::Range;

use rand::Rng;

pub(crate) fn usize_range<R: Rng>(rng: &mut R, range: Range<usize>) -> usize {
    rng.random_range(range)
}

/// One uniform real draw compared against `p`.
pub(crate) fn bernoulli<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Sample `k` elements of `values` without replacement, in draw order.
///
/// Consumes exactly `k` uniform integer draws (a partial Fisher-Yates shuffle).
pub(crate) fn sample_without_replacement<R: Rng, T: Copy>(rng: &mut R, values: &[T], k: usize) -> Vec<T> {
    assert!(
        k <= values.len(),
        "cannot sample {k} values without replacement from {}",
        values.len()
    );
    let mut v = values.to_vec();
    for i in 0..k {
        let j = usize_range(rng, i..v.len());
        v.swap(i, j);
    }
    v.truncate(k);
    v
}
