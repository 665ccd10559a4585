use tracing::trace;

use crate::activation::sigmoid::sigmoid_prime;
use crate::cost::{l2_regularization_cost, CostKind};
use crate::data::dataset::LabeledDataset;
use crate::error::{NetworkError, Result};
use crate::math::{GaussianRng, Matrix};
use crate::network::Network;

/// Mini-batch gradient descent with L2 weight decay around one owned network.
///
/// The error vectors and gradient accumulators are allocated once and reused
/// by every call; `&mut self` keeps a single pass in flight at a time.
#[derive(Debug)]
pub struct Backprop {
    network: Network,
    /// δ per layer, recomputed for every sample.
    errors: Vec<Vec<f64>>,
    weight_gradient_sums: Vec<Matrix>,
    bias_gradient_sums: Vec<Vec<f64>>,
    cost_kind: CostKind,
    regularization: f64,
}

impl Backprop {
    /// Wraps a freshly Gaussian-initialized network.
    pub fn new(
        layer_sizes: &[usize],
        output_labels: Option<Vec<String>>,
        cost_kind: CostKind,
        regularization: f64,
        rng: &mut GaussianRng,
    ) -> Result<Backprop> {
        let network = Network::random(layer_sizes, output_labels, rng)?;
        Backprop::from_network(network, cost_kind, regularization)
    }

    /// Takes ownership of an existing network.
    pub fn from_network(
        network: Network,
        cost_kind: CostKind,
        regularization: f64,
    ) -> Result<Backprop> {
        if !(regularization >= 0.0 && regularization.is_finite()) {
            return Err(NetworkError::InvalidParameter {
                name: "regularization strength",
                value: regularization,
            });
        }

        let sizes = network.layer_sizes();
        let errors = sizes.iter().map(|&n| vec![0.0; n]).collect();
        let weight_gradient_sums = sizes
            .windows(2)
            .map(|pair| Matrix::zeros(pair[1], pair[0]))
            .collect();
        let bias_gradient_sums = sizes.windows(2).map(|pair| vec![0.0; pair[1]]).collect();

        Ok(Backprop {
            network,
            errors,
            weight_gradient_sums,
            bias_gradient_sums,
            cost_kind,
            regularization,
        })
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Mutable access for inference; layer sizes cannot change through it.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn cost_kind(&self) -> CostKind {
        self.cost_kind
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    /// Gradient sums of the most recent `learn_once` call.
    pub fn weight_gradient_sums(&self) -> &[Matrix] {
        &self.weight_gradient_sums
    }

    pub fn bias_gradient_sums(&self) -> &[Vec<f64>] {
        &self.bias_gradient_sums
    }

    /// Average cost over `dataset` plus the L2 penalty:
    /// `(Σₓ Cₓ + λ·½·Σ‖W‖²) / n`
    pub fn cost(&mut self, dataset: &LabeledDataset) -> Result<f64> {
        if dataset.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        dataset.check_dimensions(self.network.input_size(), self.network.output_size())?;

        let mut cost = 0.0;
        for (x, y) in dataset.iter() {
            self.network.feedforward(x)?;
            cost += self.cost_kind.cost(self.network.output_activations(), y);
        }

        let regularization_cost: f64 = self
            .network
            .weights()
            .iter()
            .map(l2_regularization_cost)
            .sum();

        Ok((cost + self.regularization * regularization_cost) / dataset.len() as f64)
    }

    /// One gradient-descent step over `batch`.
    ///
    /// `total_training_size` is the size of the whole training set and only
    /// scales the weight decay, so it may exceed the batch size.
    pub fn learn_once(
        &mut self,
        batch: &LabeledDataset,
        learning_rate: f64,
        total_training_size: usize,
    ) -> Result<()> {
        if batch.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        if !(learning_rate > 0.0 && learning_rate.is_finite()) {
            return Err(NetworkError::InvalidParameter {
                name: "learning rate",
                value: learning_rate,
            });
        }
        if total_training_size == 0 {
            return Err(NetworkError::InvalidParameter {
                name: "training set size",
                value: 0.0,
            });
        }
        batch.check_dimensions(self.network.input_size(), self.network.output_size())?;

        self.accumulate_gradients(batch)?;
        self.update_parameters(learning_rate, batch.len(), total_training_size);
        trace!(batch = batch.len(), "applied gradient step");
        Ok(())
    }

    fn accumulate_gradients(&mut self, batch: &LabeledDataset) -> Result<()> {
        for w in self.weight_gradient_sums.iter_mut() {
            w.fill(0.0);
        }
        for b in self.bias_gradient_sums.iter_mut() {
            b.iter_mut().for_each(|v| *v = 0.0);
        }

        for (x, y) in batch.iter() {
            self.network.feedforward(x)?;
            self.compute_errors(y);

            let scratch = self.network.scratch();
            for l in 0..self.weight_gradient_sums.len() {
                let delta = &self.errors[l + 1];
                for (sum, d) in self.bias_gradient_sums[l].iter_mut().zip(delta) {
                    *sum += d;
                }
                self.weight_gradient_sums[l].add_outer(delta, scratch.activations(l));
            }
        }
        Ok(())
    }

    /// Fills `errors` for the sample whose forward pass is in the scratch.
    fn compute_errors(&mut self, y: &[f64]) {
        let last = self.network.num_layers() - 1;
        let scratch = self.network.scratch();

        let a = scratch.activations(last);
        let z = scratch.inputs(last);
        for i in 0..self.errors[last].len() {
            self.errors[last][i] = self.cost_kind.output_error(a[i], z[i], y[i]);
        }

        // δ_l = (W_lᵀ · δ_{l+1}) ⊙ σ'(z_l); the input layer has no error.
        for l in (1..last).rev() {
            let (lower, upper) = self.errors.split_at_mut(l + 1);
            let delta = &mut lower[l];
            self.network.weights()[l].transpose_dot(&upper[0], delta);
            for (d, z) in delta.iter_mut().zip(scratch.inputs(l)) {
                *d *= sigmoid_prime(*z);
            }
        }
    }

    fn update_parameters(&mut self, learning_rate: f64, batch_size: usize, total_training_size: usize) {
        let decay = 1.0 - learning_rate * self.regularization / total_training_size as f64;
        let step = learning_rate / batch_size as f64;

        let (weights, biases) = self.network.parameters_mut();
        for l in 0..weights.len() {
            for (w, g) in weights[l].data.iter_mut().zip(&self.weight_gradient_sums[l].data) {
                *w = decay * *w - step * g;
            }
            for (b, g) in biases[l].iter_mut().zip(&self.bias_gradient_sums[l]) {
                *b -= step * g;
            }
        }
    }
}
