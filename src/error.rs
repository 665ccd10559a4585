//! Error types for network construction, inference, training and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, running or persisting a network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A network needs an input and an output layer.
    #[error("Cannot create network: at least 2 layers are needed, got {0}")]
    TooFewLayers(usize),

    /// Every layer must hold at least one neuron.
    #[error("Layer {0} has no neurons")]
    EmptyLayer(usize),

    /// A vector or matrix does not have the length implied by the layer sizes.
    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    /// Output labels must cover every output neuron.
    #[error("Expected {expected} output labels, got {got}")]
    LabelCount { expected: usize, got: usize },

    /// Output labels are bounded in length.
    #[error("Output label at index {index} is longer than {max} characters")]
    LabelTooLong { index: usize, max: usize },

    /// Output labels end up as `;`-separated tokens on a single line.
    #[error("Output label at index {index} cannot be stored: {label:?}")]
    InvalidLabel { index: usize, label: String },

    /// Filesystem failure while reading or writing `path`.
    #[error("I/O error on \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed serialized network.
    #[error("Could not parse line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Malformed JSON snapshot or config.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image could not be decoded.
    #[error("Could not decode image \"{}\": {reason}", .path.display())]
    Image { path: PathBuf, reason: String },

    /// The output layer summed to zero, so no confidence can be derived.
    #[error("Output activations sum to zero; confidence is undefined")]
    DegenerateOutput,

    /// An operation that averages over samples received none.
    #[error("Dataset is empty")]
    EmptyDataset,

    /// A hyperparameter is outside its valid range.
    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A class label does not fit into the available output bits.
    #[error("Label {label} is bigger than the maximum label {max} representable by the outputs")]
    LabelOutOfRange { label: usize, max: usize },

    /// A sample path does not encode a label in its parent directory.
    #[error("Could not get label for \"{}\"", .0.display())]
    InvalidPath(PathBuf),

    /// `rows × cols` does not fit in memory addressing.
    #[error("Matrix of {rows}x{cols} elements is too large")]
    SizeOverflow { rows: usize, cols: usize },

    /// An image has no pixel that differs from the background.
    #[error("Image is empty: no pixel differs from the background")]
    EmptyImage,

    /// The HTTP listener could not be started.
    #[error("Could not bind server to {addr}: {reason}")]
    Bind { addr: String, reason: String },
}

impl NetworkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NetworkError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn mismatch(what: impl Into<String>, expected: usize, got: usize) -> Self {
        NetworkError::DimensionMismatch {
            what: what.into(),
            expected,
            got,
        }
    }
}

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
