// mripipe-core/src/decoder.rs

use crate::error::PipelineError;
use crate::grid::Grid;
use log::debug;
use std::path::Path;

/// Pixel data and scalar metadata extracted from one image record.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: Grid<f32>,
    /// Sequence index carried by the record itself, when the container has one.
    pub sequence_index: Option<u32>,
}

impl DecodedImage {
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }
}

/// Turns an image record on disk into a 2D pixel matrix.
///
/// Implementations must be shareable across the producer thread of every epoch.
pub trait ImageDecoder: Send + Sync {
    /// Decodes the record at `path`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Decode` if the record is unreadable or corrupt.
    fn decode(&self, path: &Path) -> Result<DecodedImage, PipelineError>;
}

/// Extracts the sequence index from a record file name such as `48.png` or `0048.dcm`.
///
/// # Errors
///
/// Returns `PipelineError::UnparsableRecord` if the file stem is not a non-negative integer.
pub fn sequence_index_from_file_name(path: &Path) -> Result<u32, PipelineError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PipelineError::UnparsableRecord {
            path: path.to_path_buf(),
            reason: "file name is not valid UTF-8".to_string(),
        })?;
    stem.trim()
        .parse::<u32>()
        .map_err(|_| PipelineError::UnparsableRecord {
            path: path.to_path_buf(),
            reason: format!("'{}' does not start with a valid integer", stem),
        })
}

/// Decoder for raster image files (PNG greyscale or colour), backed by the `image` crate.
///
/// Colour images are converted to 16-bit luminance. When a rescale slope and intercept
/// are both non-zero, stored values are mapped to `value * slope + intercept`, the way
/// modality rescaling works for scanner output.
#[derive(Debug, Clone, Copy)]
pub struct RasterImageDecoder {
    slope: f32,
    intercept: f32,
}

impl Default for RasterImageDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterImageDecoder {
    pub fn new() -> Self {
        RasterImageDecoder {
            slope: 0.0,
            intercept: 0.0,
        }
    }

    pub fn with_rescale(slope: f32, intercept: f32) -> Self {
        RasterImageDecoder { slope, intercept }
    }
}

impl ImageDecoder for RasterImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, PipelineError> {
        let image = image::open(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let luma = image.to_luma16();
        let (width, height) = luma.dimensions();
        debug!("Decoded '{}' ({}x{})", path.display(), width, height);

        let rescale = self.slope != 0.0 && self.intercept != 0.0;
        let data = luma
            .into_raw()
            .into_iter()
            .map(|v| {
                let v = v as f32;
                if rescale {
                    v * self.slope + self.intercept
                } else {
                    v
                }
            })
            .collect();
        let pixels = Grid::from_vec(height as usize, width as usize, data)?;

        Ok(DecodedImage {
            pixels,
            sequence_index: sequence_index_from_file_name(path).ok(),
        })
    }
}

#[cfg(test)]
#[path = "decoder_test.rs"]
mod tests;
