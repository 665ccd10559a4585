pub mod bucket;
pub mod dataset;
pub mod files;
pub mod image;
pub mod label;

pub use bucket::random_buckets;
pub use dataset::{LabeledDataset, SampleSource};
pub use files::FileList;
pub use self::image::{content_bounds, CropBounds, GrayInput, ImageFolder};
pub use label::{checked_encode_label, encode_label, label_from_path, max_label};
