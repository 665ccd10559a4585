use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Ordered (input, target) pairs.
///
/// Inputs must match the network's input width and targets its output
/// width; [`LabeledDataset::check_dimensions`] verifies both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledDataset {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
}

impl LabeledDataset {
    pub fn new() -> LabeledDataset {
        LabeledDataset::default()
    }

    pub fn from_pairs(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<LabeledDataset> {
        if inputs.len() != targets.len() {
            return Err(NetworkError::mismatch("targets", inputs.len(), targets.len()));
        }
        Ok(LabeledDataset { inputs, targets })
    }

    pub fn push(&mut self, input: Vec<f64>, target: Vec<f64>) {
        self.inputs.push(input);
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    pub fn targets(&self) -> &[Vec<f64>] {
        &self.targets
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.inputs
            .iter()
            .zip(self.targets.iter())
            .map(|(x, y)| (x.as_slice(), y.as_slice()))
    }

    /// Copies the samples at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Result<LabeledDataset> {
        let mut out = LabeledDataset::new();
        for &i in indices {
            if i >= self.len() {
                return Err(NetworkError::mismatch("sample index bound", self.len(), i));
            }
            out.push(self.inputs[i].clone(), self.targets[i].clone());
        }
        Ok(out)
    }

    pub fn check_dimensions(&self, input_size: usize, output_size: usize) -> Result<()> {
        for (x, y) in self.iter() {
            if x.len() != input_size {
                return Err(NetworkError::mismatch("input", input_size, x.len()));
            }
            if y.len() != output_size {
                return Err(NetworkError::mismatch("target", output_size, y.len()));
            }
        }
        Ok(())
    }
}

/// Anything that can hand out training samples by index.
///
/// The training loop only knows the total sample count and asks for one
/// random bucket at a time, so sources may load lazily (e.g. from disk).
pub trait SampleSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materializes the samples at `indices`.
    fn load(&self, indices: &[usize]) -> Result<LabeledDataset>;
}

impl SampleSource for LabeledDataset {
    fn len(&self) -> usize {
        LabeledDataset::len(self)
    }

    fn load(&self, indices: &[usize]) -> Result<LabeledDataset> {
        self.subset(indices)
    }
}
