use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activation::sigmoid::sigmoid_in_place;
use crate::error::{NetworkError, Result};
use crate::math::{GaussianRng, Matrix};
use crate::network::labels::OutputLabels;
use crate::network::scratch::Scratch;
use crate::network::snapshot::NetworkSnapshot;
use crate::predict::prediction::Prediction;

/// Fully connected sigmoid network.
///
/// Layer `l` (for `l` in `0..num_layers - 1`) owns a weight matrix of shape
/// `layer_sizes[l + 1] × layer_sizes[l]` and a bias vector of length
/// `layer_sizes[l + 1]`. The scratch buffers keep the values of the last
/// forward pass for backpropagation and prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "NetworkSnapshot", try_from = "NetworkSnapshot")]
pub struct Network {
    layer_sizes: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Vec<f64>>,
    output_labels: Option<OutputLabels>,
    scratch: Scratch,
}

fn validate_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(NetworkError::TooFewLayers(layer_sizes.len()));
    }
    if let Some(l) = layer_sizes.iter().position(|&n| n == 0) {
        return Err(NetworkError::EmptyLayer(l));
    }
    Ok(())
}

impl Network {
    /// Gaussian-initialized network.
    ///
    /// Weights and biases are drawn from N(0, 1); every weight is then
    /// divided by √fan_in, the width of its source layer.
    pub fn random(
        layer_sizes: &[usize],
        output_labels: Option<Vec<String>>,
        rng: &mut GaussianRng,
    ) -> Result<Network> {
        validate_layer_sizes(layer_sizes)?;

        let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
        let mut biases = Vec::with_capacity(layer_sizes.len() - 1);
        for pair in layer_sizes.windows(2) {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            biases.push(rng.randn(fan_out));
            weights.push(Matrix::gaussian(
                fan_out,
                fan_in,
                1.0 / (fan_in as f64).sqrt(),
                rng,
            ));
        }

        Network::assemble(layer_sizes.to_vec(), weights, biases, output_labels)
    }

    /// Copies caller-provided parameters verbatim.
    ///
    /// `weights[l]` is the row-major flattening of layer `l`'s matrix.
    pub fn from_arrays(
        weights: &[Vec<f64>],
        biases: &[Vec<f64>],
        layer_sizes: &[usize],
        output_labels: Option<&[String]>,
    ) -> Result<Network> {
        Network::from_owned(
            weights.to_vec(),
            biases.to_vec(),
            layer_sizes.to_vec(),
            output_labels.map(<[String]>::to_vec),
        )
    }

    /// Takes ownership of already-allocated parameters without copying them.
    pub fn from_owned(
        weights: Vec<Vec<f64>>,
        biases: Vec<Vec<f64>>,
        layer_sizes: Vec<usize>,
        output_labels: Option<Vec<String>>,
    ) -> Result<Network> {
        validate_layer_sizes(&layer_sizes)?;
        let transitions = layer_sizes.len() - 1;

        if weights.len() != transitions {
            return Err(NetworkError::mismatch("weight layers", transitions, weights.len()));
        }
        if biases.len() != transitions {
            return Err(NetworkError::mismatch("bias layers", transitions, biases.len()));
        }

        let mut matrices = Vec::with_capacity(transitions);
        for (l, w) in weights.into_iter().enumerate() {
            let (n, m) = (layer_sizes[l + 1], layer_sizes[l]);
            let len = n
                .checked_mul(m)
                .ok_or(NetworkError::SizeOverflow { rows: n, cols: m })?;
            if w.len() != len {
                return Err(NetworkError::mismatch(format!("weights of layer {l}"), len, w.len()));
            }
            matrices.push(Matrix::from_vec(n, m, w)?);
        }
        for (l, b) in biases.iter().enumerate() {
            if b.len() != layer_sizes[l + 1] {
                return Err(NetworkError::mismatch(
                    format!("biases of layer {l}"),
                    layer_sizes[l + 1],
                    b.len(),
                ));
            }
        }

        Network::assemble(layer_sizes, matrices, biases, output_labels)
    }

    fn assemble(
        layer_sizes: Vec<usize>,
        weights: Vec<Matrix>,
        biases: Vec<Vec<f64>>,
        output_labels: Option<Vec<String>>,
    ) -> Result<Network> {
        let output_size = layer_sizes[layer_sizes.len() - 1];
        let output_labels = output_labels
            .map(|labels| OutputLabels::new(labels, output_size))
            .transpose()?;
        let scratch = Scratch::new(&layer_sizes);

        Ok(Network {
            layer_sizes,
            weights,
            biases,
            output_labels,
            scratch,
        })
    }

    /// Forward pass; leaves every layer's z and a in the scratch buffers.
    pub fn feedforward(&mut self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(NetworkError::mismatch("input", self.input_size(), input.len()));
        }

        self.scratch.inputs[0].copy_from_slice(input);
        self.scratch.activations[0].copy_from_slice(input);

        for l in 0..self.weights.len() {
            let (done, rest) = self.scratch.activations.split_at_mut(l + 1);
            let next = &mut rest[0];
            self.weights[l].dot_add(&done[l], &self.biases[l], next);
            self.scratch.inputs[l + 1].copy_from_slice(next);
            sigmoid_in_place(next);
        }
        Ok(())
    }

    /// Runs a forward pass and picks the most active output neuron.
    pub fn predict(&mut self, input: &[f64]) -> Result<Prediction> {
        self.feedforward(input)?;
        Prediction::from_activations(self.scratch.output(), self.output_labels.as_ref())
    }

    pub fn num_layers(&self) -> usize {
        self.layer_sizes.len()
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Vec<f64>] {
        &self.biases
    }

    pub fn output_labels(&self) -> Option<&OutputLabels> {
        self.output_labels.as_ref()
    }

    /// Values of the most recent forward pass.
    pub fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    /// Output-layer activations of the most recent forward pass.
    pub fn output_activations(&self) -> &[f64] {
        self.scratch.output()
    }

    pub(crate) fn parameters_mut(&mut self) -> (&mut [Matrix], &mut [Vec<f64>]) {
        (&mut self.weights, &mut self.biases)
    }
}

impl From<Network> for NetworkSnapshot {
    fn from(network: Network) -> NetworkSnapshot {
        NetworkSnapshot {
            layer_sizes: network.layer_sizes,
            weights: network.weights.into_iter().map(|w| w.data).collect(),
            biases: network.biases,
            output_labels: network.output_labels.map(|labels| labels.to_vec()),
        }
    }
}

impl TryFrom<NetworkSnapshot> for Network {
    type Error = NetworkError;

    fn try_from(snapshot: NetworkSnapshot) -> Result<Network> {
        Network::from_owned(
            snapshot.weights,
            snapshot.biases,
            snapshot.layer_sizes,
            snapshot.output_labels,
        )
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network:")?;
        match &self.output_labels {
            Some(labels) => {
                write!(f, "Output labels: [ ")?;
                for label in labels.iter() {
                    write!(f, "{label} ")?;
                }
                writeln!(f, "]")?;
            }
            None => writeln!(f, "No output labels.")?,
        }
        writeln!(f, "Number of layers: {}", self.num_layers())?;
        write!(f, "Layer sizes: [ ")?;
        for size in &self.layer_sizes {
            write!(f, "{size} ")?;
        }
        writeln!(f, "]")?;

        for (l, b) in self.biases.iter().enumerate() {
            write!(f, "Biases {l}: [ ")?;
            for v in b {
                write!(f, "{v:.6} ")?;
            }
            writeln!(f, "]")?;
        }
        for (l, w) in self.weights.iter().enumerate() {
            writeln!(f, "Weights {l}:")?;
            for i in 0..w.rows {
                for v in w.row(i) {
                    write!(f, "{v:.6} ")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
