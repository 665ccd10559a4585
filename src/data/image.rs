//! Grayscale image decoding for network inputs.
//!
//! Images are converted to 8-bit luma and normalized to [0, 1], flattened
//! row-major.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use tracing::debug;

use crate::data::dataset::{LabeledDataset, SampleSource};
use crate::data::files::FileList;
use crate::data::label::{checked_encode_label, label_from_path};
use crate::error::{NetworkError, Result};

/// Decoded grayscale pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayInput {
    pub data: Vec<f64>,
    pub width: u32,
    pub height: u32,
}

impl GrayInput {
    /// Decodes the image file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<GrayInput> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| NetworkError::Image {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(GrayInput::from_dynamic(&img))
    }

    /// Decodes encoded image bytes (PNG, JPEG, BMP, GIF).
    pub fn from_bytes(bytes: &[u8]) -> Result<GrayInput> {
        let img = image::load_from_memory(bytes).map_err(|e| NetworkError::Image {
            path: PathBuf::from("<memory>"),
            reason: e.to_string(),
        })?;
        Ok(GrayInput::from_dynamic(&img))
    }

    /// Prepares a drawing for a `side × side` network input.
    ///
    /// The image is cropped to the pixels that differ from `background`,
    /// padded by an eighth of its height, then resized. Fails with
    /// [`NetworkError::EmptyImage`] when nothing was drawn.
    pub fn from_drawing(bytes: &[u8], side: u32, background: u8) -> Result<GrayInput> {
        let img = image::load_from_memory(bytes).map_err(|e| NetworkError::Image {
            path: PathBuf::from("<memory>"),
            reason: e.to_string(),
        })?;
        let gray = img.to_luma8();
        let padding = gray.height() / 8;
        let bounds = content_bounds(&gray, background, padding).ok_or(NetworkError::EmptyImage)?;

        let cropped = imageops::crop_imm(&gray, bounds.x, bounds.y, bounds.width, bounds.height).to_image();
        let cropped = DynamicImage::ImageLuma8(cropped);
        if cropped.width() == side && cropped.height() == side {
            return Ok(GrayInput::from_dynamic(&cropped));
        }
        let resized = cropped.resize_exact(side, side, FilterType::Lanczos3);
        Ok(GrayInput::from_dynamic(&resized))
    }

    fn from_dynamic(img: &DynamicImage) -> GrayInput {
        let gray = img.to_luma8();
        GrayInput {
            width: gray.width(),
            height: gray.height(),
            data: gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Smallest rectangle holding every pixel that differs from `background`,
/// grown by `padding` on each side and clipped to the image.
///
/// Returns `None` for an image made only of background.
pub fn content_bounds(img: &GrayImage, background: u8, padding: u32) -> Option<CropBounds> {
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0, 0);
    let mut found = false;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel.0[0] != background {
            found = true;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
    }
    if !found {
        return None;
    }

    let x = min.0.saturating_sub(padding);
    let y = min.1.saturating_sub(padding);
    let right = max.0.saturating_add(padding).min(img.width() - 1);
    let bottom = max.1.saturating_add(padding).min(img.height() - 1);
    Some(CropBounds {
        x,
        y,
        width: right - x + 1,
        height: bottom - y + 1,
    })
}

/// Labelled image files loaded on demand, one bucket at a time.
///
/// Each file's label is the integer name of its parent directory, encoded
/// as little-endian bits over the output neurons.
#[derive(Debug, Clone)]
pub struct ImageFolder {
    files: FileList,
    input_size: usize,
    output_size: usize,
}

impl ImageFolder {
    pub fn new(files: FileList, input_size: usize, output_size: usize) -> ImageFolder {
        ImageFolder {
            files,
            input_size,
            output_size,
        }
    }

    pub fn files(&self) -> &FileList {
        &self.files
    }

    /// Loads one labelled sample.
    pub fn load_sample(&self, path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
        let label = label_from_path(path)?;
        let target = checked_encode_label(label, self.output_size)?;

        let input = GrayInput::load(path)?;
        if input.len() != self.input_size {
            return Err(NetworkError::mismatch(
                format!("pixels of \"{}\"", path.display()),
                self.input_size,
                input.len(),
            ));
        }
        Ok((input.data, target))
    }

    /// Loads every file into memory.
    pub fn load_all(&self) -> Result<LabeledDataset> {
        let indices: Vec<usize> = (0..self.files.len()).collect();
        self.load(&indices)
    }
}

impl SampleSource for ImageFolder {
    fn len(&self) -> usize {
        self.files.len()
    }

    fn load(&self, indices: &[usize]) -> Result<LabeledDataset> {
        let mut dataset = LabeledDataset::new();
        for &i in indices {
            let path = self
                .files
                .paths()
                .get(i)
                .ok_or_else(|| NetworkError::mismatch("sample index bound", self.files.len(), i))?;
            let (input, target) = self.load_sample(path)?;
            dataset.push(input, target);
        }
        debug!("Loaded {} images", dataset.len());
        Ok(dataset)
    }
}
