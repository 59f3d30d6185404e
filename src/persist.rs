use std::fs::File;
use std::path::Path;

use ndarray_npy::NpzWriter;

use crate::error::{Error, Result};
use crate::network::Network;

/// Where the winning model's parameters land after a sweep.
pub const BEST_MODEL_PATH: &str = "best_model_weights.npz";

/// Writes the four parameter arrays to a single `.npz` archive under the
/// fixed keys `W1`, `b1`, `W2`, `b2`.
pub fn save_parameters(network: &Network, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| persist_error(path, e.to_string()))?;
    let mut npz = NpzWriter::new(file);

    npz.add_array("W1", &network.w1)
        .map_err(|e| persist_error(path, e.to_string()))?;
    npz.add_array("b1", &network.b1)
        .map_err(|e| persist_error(path, e.to_string()))?;
    npz.add_array("W2", &network.w2)
        .map_err(|e| persist_error(path, e.to_string()))?;
    npz.add_array("b2", &network.b2)
        .map_err(|e| persist_error(path, e.to_string()))?;

    npz.finish().map_err(|e| persist_error(path, e.to_string()))?;
    Ok(())
}

fn persist_error(path: &Path, reason: String) -> Error {
    Error::Persist {
        path: path.to_path_buf(),
        reason,
    }
}
