use serde::Serialize;

use crate::backprop::Backprop;
use crate::data::dataset::LabeledDataset;
use crate::error::Result;

/// Cost and hit rate of a network over a labeled dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub samples: usize,
    /// Regularized average cost, as reported by `Backprop::cost`.
    pub cost: f64,
    /// Fraction of samples whose outputs, thresholded at 0.5, equal the
    /// target bits.
    pub accuracy: f64,
}

pub fn evaluate(backprop: &mut Backprop, dataset: &LabeledDataset) -> Result<Evaluation> {
    let cost = backprop.cost(dataset)?;

    let network = backprop.network_mut();
    let mut hits = 0;
    for (x, y) in dataset.iter() {
        network.feedforward(x)?;
        let matches = network
            .output_activations()
            .iter()
            .zip(y)
            .all(|(a, t)| (*a >= 0.5) == (*t >= 0.5));
        if matches {
            hits += 1;
        }
    }

    Ok(Evaluation {
        samples: dataset.len(),
        cost,
        accuracy: hits as f64 / dataset.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostKind;
    use crate::network::Network;
    use approx::assert_relative_eq;

    #[test]
    fn test_accuracy_counts_thresholded_matches() {
        // Zero weights with biases pushing the outputs to ~1 and ~0.
        let network = Network::from_owned(
            vec![vec![0.0, 0.0, 0.0, 0.0]],
            vec![vec![10.0, -10.0]],
            vec![2, 2],
            None,
        )
        .unwrap();
        let mut backprop = Backprop::from_network(network, CostKind::Quadratic, 0.0).unwrap();

        let data = LabeledDataset::from_pairs(
            vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]],
            vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        let eval = evaluate(&mut backprop, &data).unwrap();
        assert_eq!(eval.samples, 3);
        assert_relative_eq!(eval.accuracy, 2.0 / 3.0);
        assert!(eval.cost > 0.0);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let mut rng = crate::math::GaussianRng::seeded(2);
        let mut backprop = Backprop::new(&[2, 1], None, CostKind::Quadratic, 0.0, &mut rng).unwrap();
        assert!(evaluate(&mut backprop, &LabeledDataset::new()).is_err());
    }
}
