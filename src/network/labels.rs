use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Longest label, in characters, that a single output neuron may carry.
pub const MAX_OUTPUT_LABEL_LEN: usize = 255;

/// Human-readable class names, one per output neuron.
///
/// Either every output neuron has a label or the network has none, so the
/// collection is always exactly as long as the output layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputLabels(Vec<String>);

impl OutputLabels {
    /// Validates `labels` against the width of the output layer.
    pub fn new(labels: Vec<String>, output_size: usize) -> Result<OutputLabels> {
        if labels.len() != output_size {
            return Err(NetworkError::LabelCount {
                expected: output_size,
                got: labels.len(),
            });
        }
        for (index, label) in labels.iter().enumerate() {
            if label.chars().count() > MAX_OUTPUT_LABEL_LEN {
                return Err(NetworkError::LabelTooLong {
                    index,
                    max: MAX_OUTPUT_LABEL_LEN,
                });
            }
            if label.trim().is_empty() || label.contains(';') || label.contains('\n') {
                return Err(NetworkError::InvalidLabel {
                    index,
                    label: label.clone(),
                });
            }
        }
        Ok(OutputLabels(labels))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// `["0", "1", ..., "n-1"]`
pub fn numbered_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_matching_labels() {
        let labels = OutputLabels::new(numbered_labels(3), 3).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.get(2), Some("2"));
        assert_eq!(labels.get(3), None);
    }

    #[test]
    fn test_rejects_wrong_count() {
        let err = OutputLabels::new(numbered_labels(2), 3).unwrap_err();
        assert!(matches!(err, NetworkError::LabelCount { expected: 3, got: 2 }));
    }

    #[test]
    fn test_length_bound() {
        let ok = "a".repeat(MAX_OUTPUT_LABEL_LEN);
        assert!(OutputLabels::new(vec![ok], 1).is_ok());

        let long = "a".repeat(MAX_OUTPUT_LABEL_LEN + 1);
        let err = OutputLabels::new(vec![long], 1).unwrap_err();
        assert!(matches!(err, NetworkError::LabelTooLong { index: 0, .. }));
    }

    #[test]
    fn test_rejects_separator() {
        let err = OutputLabels::new(vec!["cat".into(), "a;b".into()], 2).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidLabel { index: 1, .. }));
    }
}
