// mripipe-data/src/diagnostics.rs

use image::{GrayImage, Luma, Rgb, RgbImage};
use mripipe_core::rasterizer::outline_pixels;
use mripipe_core::{Grid, PipelineError, Point, SampleRef};
use std::path::{Path, PathBuf};

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Writes inspection images for loaded samples into a directory.
///
/// Two PNGs per sample, named from subject key, annotation-set key and sequence index:
/// the raw image and the same image with the contour outline drawn on top. Writing the
/// same sample again overwrites both files.
#[derive(Debug, Clone)]
pub struct DiagnosticsWriter {
    dir: PathBuf,
}

impl DiagnosticsWriter {
    /// # Errors
    ///
    /// Returns `PipelineError::MissingDirectory` if `dir` is not an existing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(PipelineError::MissingDirectory { path: dir });
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn stem(sample_ref: &SampleRef) -> String {
        format!(
            "{}-{}-{:04}",
            sample_ref.subject_id(),
            sample_ref.annotation_set_id(),
            sample_ref.sequence_index()
        )
    }

    pub fn image_path(&self, sample_ref: &SampleRef) -> PathBuf {
        self.dir.join(format!("{}-image.png", Self::stem(sample_ref)))
    }

    pub fn overlay_path(&self, sample_ref: &SampleRef) -> PathBuf {
        self.dir
            .join(format!("{}-image_with_contour.png", Self::stem(sample_ref)))
    }

    /// Writes both images for one sample.
    pub fn write(
        &self,
        sample_ref: &SampleRef,
        pixels: &Grid<f32>,
        polygon: &[Point],
    ) -> Result<(), PipelineError> {
        let grey = to_grey(pixels);
        let image_path = self.image_path(sample_ref);
        grey.save(&image_path).map_err(|e| {
            PipelineError::Diagnostics(format!("'{}': {}", image_path.display(), e))
        })?;

        let mut overlay: RgbImage = RgbImage::from_fn(grey.width(), grey.height(), |x, y| {
            let Luma([v]) = *grey.get_pixel(x, y);
            Rgb([v, v, v])
        });
        for (col, row) in outline_pixels(polygon, pixels.width(), pixels.height()) {
            overlay.put_pixel(col as u32, row as u32, OUTLINE_COLOR);
        }
        let overlay_path = self.overlay_path(sample_ref);
        overlay.save(&overlay_path).map_err(|e| {
            PipelineError::Diagnostics(format!("'{}': {}", overlay_path.display(), e))
        })?;
        Ok(())
    }
}

/// Min-max normalises pixels into 8-bit grey. A constant image maps to black.
fn to_grey(pixels: &Grid<f32>) -> GrayImage {
    let (lo, hi) = pixels.value_range().unwrap_or((0.0, 0.0));
    let span = hi - lo;
    GrayImage::from_fn(pixels.width() as u32, pixels.height() as u32, |x, y| {
        let v = pixels
            .get(y as usize, x as usize)
            .map(|&v| v as f64)
            .filter(|v| v.is_finite())
            .unwrap_or(lo);
        let level = if span > 0.0 {
            ((v - lo) / span * 255.0).round().clamp(0.0, 255.0)
        } else {
            0.0
        };
        Luma([level as u8])
    })
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
