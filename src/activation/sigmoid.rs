/// Logistic sigmoid: σ(z) = 1 / (1 + e^(-z)).
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// σ'(z) = e^(-z) / (1 + e^(-z))².
pub fn sigmoid_prime(z: f64) -> f64 {
    let e = (-z).exp();
    e / ((1.0 + e) * (1.0 + e))
}

/// Replaces every pre-activation in `values` with its sigmoid.
pub fn sigmoid_in_place(values: &mut [f64]) {
    for v in values.iter_mut() {
        *v = sigmoid(*v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sigmoid() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5, epsilon = 1e-8);
        assert_abs_diff_eq!(sigmoid(0.3), 0.5744425168116848, epsilon = 1e-8);
        assert_abs_diff_eq!(sigmoid(-0.4), 0.40131233988751425, epsilon = 1e-8);
    }

    #[test]
    fn test_sigmoid_prime() {
        assert_abs_diff_eq!(sigmoid_prime(0.0), 0.25, epsilon = 1e-8);
        assert_abs_diff_eq!(sigmoid_prime(0.3), 0.24445831169074203, epsilon = 1e-8);
    }

    #[test]
    fn test_sigmoid_prime_matches_closed_form() {
        for &z in &[-3.0, -0.5, 0.1, 2.5] {
            let s = sigmoid(z);
            assert_abs_diff_eq!(sigmoid_prime(z), s * (1.0 - s), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sigmoid_in_place() {
        let mut v = [0.0, 0.3, -0.4];
        sigmoid_in_place(&mut v);
        assert_abs_diff_eq!(v[0], 0.5, epsilon = 1e-8);
        assert_abs_diff_eq!(v[1], 0.5744425168116848, epsilon = 1e-8);
        assert_abs_diff_eq!(v[2], 0.40131233988751425, epsilon = 1e-8);
    }
}
