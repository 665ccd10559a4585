/// Per-layer values of the most recent forward pass.
///
/// `inputs[l]` holds the pre-activations z and `activations[l]` the sigmoid
/// outputs a of layer `l`. Layer 0 stores the raw input in both. The buffers
/// are allocated once per network and overwritten by every forward pass.
#[derive(Debug, Clone, Default)]
pub struct Scratch {
    pub(crate) inputs: Vec<Vec<f64>>,
    pub(crate) activations: Vec<Vec<f64>>,
}

impl Scratch {
    pub fn new(layer_sizes: &[usize]) -> Scratch {
        Scratch {
            inputs: layer_sizes.iter().map(|&n| vec![0.0; n]).collect(),
            activations: layer_sizes.iter().map(|&n| vec![0.0; n]).collect(),
        }
    }

    pub fn inputs(&self, layer: usize) -> &[f64] {
        &self.inputs[layer]
    }

    pub fn activations(&self, layer: usize) -> &[f64] {
        &self.activations[layer]
    }

    pub fn output(&self) -> &[f64] {
        self.activations.last().map(Vec::as_slice).unwrap_or(&[])
    }
}
