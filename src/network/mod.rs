pub mod labels;
pub mod network;
pub mod scratch;
pub mod snapshot;

pub use labels::{numbered_labels, OutputLabels, MAX_OUTPUT_LABEL_LEN};
pub use network::Network;
pub use scratch::Scratch;
pub use snapshot::NetworkSnapshot;
