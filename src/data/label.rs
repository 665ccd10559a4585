use std::path::Path;

use crate::error::{NetworkError, Result};

/// Class label of a sample: the integer name of its immediate parent
/// directory (`data/train/7/img_001.png` → 7).
pub fn label_from_path(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    path.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .and_then(|name| name.parse().ok())
        .ok_or_else(|| NetworkError::InvalidPath(path.to_path_buf()))
}

/// Largest label that `num_outputs` bits can encode.
pub fn max_label(num_outputs: usize) -> usize {
    if num_outputs >= usize::BITS as usize {
        usize::MAX
    } else {
        (1usize << num_outputs) - 1
    }
}

/// Little-endian bit encoding of `label` over `num_outputs` neurons:
/// `out[i] = (label >> i) & 1`.
///
/// Bits beyond `num_outputs` are dropped; use [`checked_encode_label`] to
/// reject labels that do not fit.
pub fn encode_label(label: usize, num_outputs: usize) -> Vec<f64> {
    (0..num_outputs)
        .map(|i| {
            if i < usize::BITS as usize && (label >> i) & 1 == 1 {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// [`encode_label`] that fails for labels above `2^num_outputs − 1`.
pub fn checked_encode_label(label: usize, num_outputs: usize) -> Result<Vec<f64>> {
    let max = max_label(num_outputs);
    if label > max {
        return Err(NetworkError::LabelOutOfRange { label, max });
    }
    Ok(encode_label(label, num_outputs))
}
