// mripipe-core/src/sample.rs

use crate::error::PipelineError;
use crate::grid::Grid;
use std::path::{Path, PathBuf};

/// A validated pairing of one image record with its annotation file.
///
/// Created once while building the dataset index and never mutated. The subject
/// key, annotation-set key and sequence index are kept alongside the two
/// locators so that diagnostics and log lines can name the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleRef {
    image_path: PathBuf,
    annotation_path: PathBuf,
    subject_id: String,
    annotation_set_id: String,
    sequence_index: u32,
}

impl SampleRef {
    pub fn new(
        image_path: impl Into<PathBuf>,
        annotation_path: impl Into<PathBuf>,
        subject_id: impl Into<String>,
        annotation_set_id: impl Into<String>,
        sequence_index: u32,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            annotation_path: annotation_path.into(),
            subject_id: subject_id.into(),
            annotation_set_id: annotation_set_id.into(),
            sequence_index,
        }
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn annotation_path(&self) -> &Path {
        &self.annotation_path
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn annotation_set_id(&self) -> &str {
        &self.annotation_set_id
    }

    pub fn sequence_index(&self) -> u32 {
        self.sequence_index
    }
}

/// One training example: decoded pixels and the matching region mask.
///
/// The mask always has exactly the same `(height, width)` as the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pixels: Grid<f32>,
    mask: Grid<bool>,
}

impl Sample {
    /// Pairs pixels with a mask.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::ShapeMismatch` if the two grids differ in shape.
    pub fn new(pixels: Grid<f32>, mask: Grid<bool>) -> Result<Self, PipelineError> {
        if pixels.shape() != mask.shape() {
            return Err(PipelineError::ShapeMismatch {
                expected: pixels.shape(),
                actual: mask.shape(),
            });
        }
        Ok(Self { pixels, mask })
    }

    pub fn pixels(&self) -> &Grid<f32> {
        &self.pixels
    }

    pub fn mask(&self) -> &Grid<bool> {
        &self.mask
    }

    pub fn shape(&self) -> (usize, usize) {
        self.pixels.shape()
    }
}

/// An ordered group of samples handed to the training step in one go.
///
/// `index` is the zero-based position of the batch within its epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    index: usize,
    samples: Vec<Sample>,
}

impl Batch {
    pub fn new(index: usize, samples: Vec<Sample>) -> Self {
        Self { index, samples }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}
