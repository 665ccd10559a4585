use crate::activation::sigmoid::sigmoid_prime;

/// Quadratic (mean-squared style) cost for sigmoid outputs.
pub struct QuadraticCost;

impl QuadraticCost {
    /// Per-sample cost: ½·Σ(aᵢ − yᵢ)²
    pub fn cost(a: &[f64], y: &[f64]) -> f64 {
        0.5 * a
            .iter()
            .zip(y.iter())
            .map(|(a, y)| (a - y) * (a - y))
            .sum::<f64>()
    }

    /// Output-layer error: (a − y)·σ'(z)
    pub fn output_error(a: f64, z: f64, y: f64) -> f64 {
        (a - y) * sigmoid_prime(z)
    }
}
