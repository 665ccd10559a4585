use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::error;

use crate::error::{NetworkError, Result};
use crate::network::Network;

impl Network {
    /// Serializes the network to a pretty-printed JSON snapshot.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            error!("Could not open file \"{}\": {e}", path.display());
            NetworkError::io(path, e)
        })?;
        let mut writer = BufWriter::new(file);
        let result = serde_json::to_writer_pretty(&mut writer, self)
            .map_err(NetworkError::from)
            .and_then(|()| writer.flush().map_err(|e| NetworkError::io(path, e)));
        if let Err(e) = &result {
            error!("Could not save network to \"{}\": {e}", path.display());
        }
        result
    }

    /// Deserializes a network from a JSON snapshot written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            error!("Could not open file \"{}\": {e}", path.display());
            NetworkError::io(path, e)
        })?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
