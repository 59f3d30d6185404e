use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use ndarray::Array2;

use crate::error::{Error, Result};

// IDX format magic numbers
const IMAGE_MAGIC: u32 = 2051;
const LABEL_MAGIC: u32 = 2049;

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte.gz";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte.gz";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte.gz";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte.gz";

/// The training and test splits of an MNIST-style dataset.
///
/// Images are flattened row-major to one feature row per sample, kept on
/// their original 0-255 scale (no normalization). Labels are one-hot
/// encoded over `num_classes` columns, where the class count is the
/// maximum label seen in the training split plus one.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train_images: Array2<f32>,
    pub train_labels: Array2<f32>,
    pub test_images: Array2<f32>,
    pub test_labels: Array2<f32>,
    pub num_classes: usize,
}

impl Dataset {
    /// Loads the four gzipped IDX files from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let train_images = parse_idx_images(&dir.join(TRAIN_IMAGES))?;
        let train_raw = parse_idx_labels(&dir.join(TRAIN_LABELS))?;
        let test_images = parse_idx_images(&dir.join(TEST_IMAGES))?;
        let test_raw = parse_idx_labels(&dir.join(TEST_LABELS))?;

        if train_images.nrows() != train_raw.len() {
            return Err(data_error(
                &dir.join(TRAIN_LABELS),
                format!(
                    "{} labels for {} training images",
                    train_raw.len(),
                    train_images.nrows()
                ),
            ));
        }
        if test_images.nrows() != test_raw.len() {
            return Err(data_error(
                &dir.join(TEST_LABELS),
                format!(
                    "{} labels for {} test images",
                    test_raw.len(),
                    test_images.nrows()
                ),
            ));
        }

        // The class count comes from the training split alone
        let num_classes = train_raw
            .iter()
            .copied()
            .max()
            .map(|max| max as usize + 1)
            .ok_or_else(|| data_error(&dir.join(TRAIN_LABELS), "training split is empty"))?;
        if let Some(&bad) = test_raw.iter().find(|&&label| label as usize >= num_classes) {
            return Err(data_error(
                &dir.join(TEST_LABELS),
                format!("test label {bad} outside the {num_classes} training classes"),
            ));
        }

        Ok(Dataset {
            train_images,
            train_labels: one_hot(&train_raw, num_classes),
            test_images,
            test_labels: one_hot(&test_raw, num_classes),
            num_classes,
        })
    }

    pub fn feature_dim(&self) -> usize {
        self.train_images.ncols()
    }
}

/// One-hot encodes `labels` into a `(len, num_classes)` array.
///
/// Every label must be below `num_classes`.
pub fn one_hot(labels: &[u8], num_classes: usize) -> Array2<f32> {
    let mut encoded = Array2::zeros((labels.len(), num_classes));
    for (row, &label) in labels.iter().enumerate() {
        encoded[[row, label as usize]] = 1.0;
    }
    encoded
}

fn read_gz_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| data_error(path, e.to_string()))?;
    let mut bytes = Vec::new();
    GzDecoder::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| data_error(path, e.to_string()))?;
    Ok(bytes)
}

fn be_u32(bytes: &[u8], offset: usize, path: &Path) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|chunk| chunk.try_into().ok())
        .map(u32::from_be_bytes)
        .ok_or_else(|| data_error(path, "truncated IDX header"))
}

/// Parses a gzipped IDX image file into one flattened row per image.
fn parse_idx_images(path: &Path) -> Result<Array2<f32>> {
    let bytes = read_gz_bytes(path)?;

    // Image headers: magic, image count, rows per image, columns per image
    let magic = be_u32(&bytes, 0, path)?;
    if magic != IMAGE_MAGIC {
        return Err(data_error(
            path,
            format!("bad magic number {magic}, expected {IMAGE_MAGIC}"),
        ));
    }
    let count = be_u32(&bytes, 4, path)? as usize;
    let rows = be_u32(&bytes, 8, path)? as usize;
    let columns = be_u32(&bytes, 12, path)? as usize;

    let pixels = &bytes[16.min(bytes.len())..];
    if pixels.len() != count * rows * columns {
        return Err(data_error(
            path,
            format!(
                "expected {} pixel bytes for {count} images of {rows}x{columns}, got {}",
                count * rows * columns,
                pixels.len()
            ),
        ));
    }

    // Raw pixel values; downstream training applies no normalization
    let data: Vec<f32> = pixels.iter().map(|&b| b as f32).collect();
    Array2::from_shape_vec((count, rows * columns), data).map_err(|e| data_error(path, e.to_string()))
}

/// Parses a gzipped IDX label file into raw byte labels.
fn parse_idx_labels(path: &Path) -> Result<Vec<u8>> {
    let bytes = read_gz_bytes(path)?;

    // Label headers: magic, label count
    let magic = be_u32(&bytes, 0, path)?;
    if magic != LABEL_MAGIC {
        return Err(data_error(
            path,
            format!("bad magic number {magic}, expected {LABEL_MAGIC}"),
        ));
    }
    let count = be_u32(&bytes, 4, path)? as usize;

    let labels = &bytes[8.min(bytes.len())..];
    if labels.len() != count {
        return Err(data_error(
            path,
            format!("expected {count} label bytes, got {}", labels.len()),
        ));
    }

    Ok(labels.to_vec())
}

fn data_error(path: &Path, reason: impl Into<String>) -> Error {
    Error::DataSource {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}
