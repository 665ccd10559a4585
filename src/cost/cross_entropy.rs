/// Binary cross-entropy cost summed over sigmoid output neurons.
pub struct CrossEntropyCost;

impl CrossEntropyCost {
    /// Per-sample cost: −Σ[y·ln(a) + (1 − y)·ln(1 − a)]
    ///
    /// Terms that evaluate to NaN (0·ln 0 when an activation saturates at
    /// exactly 0 or 1) are skipped.
    pub fn cost(a: &[f64], y: &[f64]) -> f64 {
        let mut total = 0.0;
        for (a, y) in a.iter().zip(y.iter()) {
            let term = y * a.ln() + (1.0 - y) * (1.0 - a).ln();
            if !term.is_nan() {
                total += term;
            }
        }
        -total
    }

    /// Output-layer error: a − y
    ///
    /// The σ'(z) factor of the chain rule cancels against the cost
    /// derivative, so `z` is not needed.
    pub fn output_error(a: f64, _z: f64, y: f64) -> f64 {
        a - y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cost() {
        let expected = -(0.5f64.ln() + 0.8f64.ln());
        assert_abs_diff_eq!(
            CrossEntropyCost::cost(&[0.5, 0.2], &[1.0, 0.0]),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_saturated_terms_are_skipped() {
        // 1·ln(1) + 0·ln(0) is NaN and is dropped; 0.5 contributes normally.
        let cost = CrossEntropyCost::cost(&[1.0, 0.5], &[1.0, 1.0]);
        assert_abs_diff_eq!(cost, -(0.5f64.ln()), epsilon = 1e-12);
        assert!(cost.is_finite());
    }

    #[test]
    fn test_output_error_ignores_z() {
        assert_abs_diff_eq!(CrossEntropyCost::output_error(0.8, 0.3, 0.1), 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(CrossEntropyCost::output_error(0.8, -9.0, 0.1), 0.7, epsilon = 1e-12);
    }
}
