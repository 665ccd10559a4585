use serde::{Deserialize, Serialize};

/// Plain-data view of a [`Network`](crate::network::Network) used for JSON
/// persistence.
///
/// Weight matrices are stored row-major and flattened, exactly as in the
/// text format. Converting back into a `Network` re-validates every
/// dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub layer_sizes: Vec<usize>,
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<Vec<f64>>,
    /// Older snapshots without labels deserialize cleanly.
    #[serde(default)]
    pub output_labels: Option<Vec<String>>,
}
