use serde::{Deserialize, Serialize};

use crate::cost::cross_entropy::CrossEntropyCost;
use crate::cost::quadratic::QuadraticCost;
use crate::math::Matrix;

/// Selects the batch cost and the output-layer error formula used by
/// backpropagation.
///
/// - `Quadratic`: ½·Σ(a − y)²; output error (a − y)·σ'(z).
/// - `CrossEntropy`: −Σ[y·ln a + (1 − y)·ln(1 − a)]; output error a − y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    Quadratic,
    CrossEntropy,
}

impl CostKind {
    /// Un-normalized cost of one sample.
    pub fn cost(self, a: &[f64], y: &[f64]) -> f64 {
        match self {
            CostKind::Quadratic => QuadraticCost::cost(a, y),
            CostKind::CrossEntropy => CrossEntropyCost::cost(a, y),
        }
    }

    /// Error δ of one output neuron with activation `a`, pre-activation `z`
    /// and target `y`.
    pub fn output_error(self, a: f64, z: f64, y: f64) -> f64 {
        match self {
            CostKind::Quadratic => QuadraticCost::output_error(a, z, y),
            CostKind::CrossEntropy => CrossEntropyCost::output_error(a, z, y),
        }
    }
}

/// L2 penalty of one weight matrix: ½·Σ w²
pub fn l2_regularization_cost(weights: &Matrix) -> f64 {
    0.5 * weights.squared_norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch() {
        let a = [0.2, 0.9];
        let y = [0.0, 1.0];
        assert_eq!(CostKind::Quadratic.cost(&a, &y), QuadraticCost::cost(&a, &y));
        assert_eq!(CostKind::CrossEntropy.cost(&a, &y), CrossEntropyCost::cost(&a, &y));
        assert_eq!(
            CostKind::Quadratic.output_error(0.8, 0.3, 0.1),
            QuadraticCost::output_error(0.8, 0.3, 0.1)
        );
        assert_eq!(CostKind::CrossEntropy.output_error(0.8, 0.3, 0.1), 0.8 - 0.1);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&CostKind::CrossEntropy).unwrap(), "\"cross_entropy\"");
        let kind: CostKind = serde_json::from_str("\"quadratic\"").unwrap();
        assert_eq!(kind, CostKind::Quadratic);
    }

    #[test]
    fn test_l2_regularization_cost() {
        let w = Matrix::from_vec(2, 2, vec![1.0, -2.0, 0.0, 3.0]).unwrap();
        assert_eq!(l2_regularization_cost(&w), 7.0);
    }
}
