use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::network::labels::OutputLabels;

/// Class guess derived from the output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Index of the most active output neuron.
    pub index: usize,
    /// Output label of that neuron, or its index when the network is unlabelled.
    pub label: String,
    /// Largest activation divided by the sum of all output activations.
    ///
    /// Sigmoid outputs do not sum to one, so this ratio is a relative score
    /// in [0, 1] rather than a calibrated probability.
    pub confidence: f64,
}

impl Prediction {
    /// Scans `activations` for the maximum and the sum.
    ///
    /// Ties keep the lowest index. Fails with
    /// [`NetworkError::DegenerateOutput`] when the activations sum to zero.
    pub fn from_activations(
        activations: &[f64],
        labels: Option<&OutputLabels>,
    ) -> Result<Prediction> {
        let mut index = 0;
        let mut max_activation = 0.0;
        let mut sum_activation = 0.0;

        for (i, &a) in activations.iter().enumerate() {
            sum_activation += a;
            if a > max_activation {
                max_activation = a;
                index = i;
            }
        }

        if sum_activation == 0.0 {
            return Err(NetworkError::DegenerateOutput);
        }

        let label = labels
            .and_then(|labels| labels.get(index))
            .map(str::to_owned)
            .unwrap_or_else(|| index.to_string());

        Ok(Prediction {
            index,
            label,
            confidence: max_activation / sum_activation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::GaussianRng;
    use crate::network::{numbered_labels, Network};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_unlabelled_prediction_uses_index() {
        let p = Prediction::from_activations(&[0.1, 0.6, 0.3], None).unwrap();
        assert_eq!(p.index, 1);
        assert_eq!(p.label, "1");
        assert_abs_diff_eq!(p.confidence, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_labelled_prediction_uses_label() {
        let labels = OutputLabels::new(vec!["cat".into(), "dog".into()], 2).unwrap();
        let p = Prediction::from_activations(&[0.9, 0.3], Some(&labels)).unwrap();
        assert_eq!(p.index, 0);
        assert_eq!(p.label, "cat");
        assert_abs_diff_eq!(p.confidence, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_ties_keep_first_index() {
        let p = Prediction::from_activations(&[0.5, 0.5], None).unwrap();
        assert_eq!(p.index, 0);
        assert_abs_diff_eq!(p.confidence, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_sum_is_an_error() {
        let err = Prediction::from_activations(&[0.0, 0.0, 0.0], None).unwrap_err();
        assert!(matches!(err, NetworkError::DegenerateOutput));
    }

    #[test]
    fn test_network_predict() {
        let mut rng = GaussianRng::seeded(9);
        let mut network = Network::random(&[4, 3, 10], Some(numbered_labels(10)), &mut rng).unwrap();
        let p = network.predict(&[0.0, 0.5, 1.0, 0.25]).unwrap();

        let output = network.output_activations();
        let best = output
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(output[p.index], best);
        assert_eq!(p.label, p.index.to_string());
        assert!(p.confidence > 0.0 && p.confidence <= 1.0);
    }
}
