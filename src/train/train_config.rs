use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cost::CostKind;
use crate::error::{NetworkError, Result};
use crate::network::numbered_labels;

/// Hyperparameters and file locations for a training run.
///
/// Every field has a default, so a JSON config only needs the keys it
/// changes. The defaults train a 784 → 100 → 10 digit classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Input images are `image_width × image_height` grayscale pixels.
    pub image_width: usize,
    pub image_height: usize,
    pub hidden_layers: Vec<usize>,
    /// One label per output neuron; their count sets the output width.
    pub output_labels: Vec<String>,
    pub cost: CostKind,
    /// L2 weight-decay coefficient λ.
    pub regularization: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Where the trained network is written and read.
    pub network_path: PathBuf,
    /// Seed for reproducible initialization and batching.
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            image_width: 28,
            image_height: 28,
            hidden_layers: vec![100],
            output_labels: numbered_labels(10),
            cost: CostKind::CrossEntropy,
            regularization: 5.0,
            epochs: 30,
            batch_size: 10,
            learning_rate: 0.5,
            network_path: PathBuf::from("trained_network.txt"),
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn input_size(&self) -> usize {
        self.image_width * self.image_height
    }

    /// `[input, hidden..., output]`
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.input_size());
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(self.output_labels.len());
        sizes
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NetworkError::InvalidParameter {
                name: "batch size",
                value: 0.0,
            });
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(NetworkError::InvalidParameter {
                name: "learning rate",
                value: self.learning_rate,
            });
        }
        if !(self.regularization >= 0.0 && self.regularization.is_finite()) {
            return Err(NetworkError::InvalidParameter {
                name: "regularization strength",
                value: self.regularization,
            });
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| NetworkError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| NetworkError::io(path, e))
    }

    /// Reads a config; missing keys take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| NetworkError::io(path, e))?;
        let config: TrainConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}
