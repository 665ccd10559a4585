//! Sigmoid feedforward networks trained by mini-batch gradient descent.

pub mod activation;
pub mod backprop;
pub mod cost;
pub mod data;
pub mod error;
pub mod math;
pub mod network;
pub mod predict;
pub mod serial;
pub mod server;
pub mod train;

// Convenience re-exports
pub use backprop::Backprop;
pub use cost::CostKind;
pub use data::{FileList, GrayInput, ImageFolder, LabeledDataset, SampleSource};
pub use error::{NetworkError, Result};
pub use math::{GaussianRng, Matrix};
pub use network::{Network, NetworkSnapshot, OutputLabels};
pub use predict::Prediction;
pub use train::{evaluate, train_loop, EpochStats, Evaluation, TrainConfig};
