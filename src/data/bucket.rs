use crate::math::GaussianRng;

/// Splits `0..count` into shuffled buckets of `batch_size` indices.
///
/// Every index appears exactly once; the final bucket holds the remainder
/// and may be shorter. A zero `batch_size` yields no buckets.
pub fn random_buckets(count: usize, batch_size: usize, rng: &mut GaussianRng) -> Vec<Vec<usize>> {
    if batch_size == 0 {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..count).collect();
    rng.shuffle(&mut indices);
    indices.chunks(batch_size).map(<[usize]>::to_vec).collect()
}
