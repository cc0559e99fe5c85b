// mripipe-data/src/loader.rs

use crate::diagnostics::DiagnosticsWriter;
use log::{debug, warn};
use mripipe_core::annotation::parse_annotation_file;
use mripipe_core::{
    ImageDecoder, MaskRasterizer, PipelineError, RasterImageDecoder, Sample, SampleRef,
    ScanlineRasterizer,
};

/// Turns one indexed pair into a validated [`Sample`].
///
/// Implementations are shared by reference with the producer thread of every epoch,
/// hence the `Send + Sync` bound.
pub trait LoadSample: Send + Sync {
    /// Loads the sample for `sample_ref`. Either a complete sample or an error; never
    /// a partial result.
    fn load(&self, sample_ref: &SampleRef) -> Result<Sample, PipelineError>;
}

/// Default [`LoadSample`] implementation: decode the image, parse the contour file,
/// rasterize the polygon at the decoded size.
#[derive(Debug, Clone)]
pub struct SampleLoader<D = RasterImageDecoder, R = ScanlineRasterizer> {
    decoder: D,
    rasterizer: R,
    diagnostics: Option<DiagnosticsWriter>,
}

impl Default for SampleLoader {
    fn default() -> Self {
        Self::new(RasterImageDecoder::default(), ScanlineRasterizer::default())
    }
}

impl<D: ImageDecoder, R: MaskRasterizer> SampleLoader<D, R> {
    pub fn new(decoder: D, rasterizer: R) -> Self {
        Self {
            decoder,
            rasterizer,
            diagnostics: None,
        }
    }

    /// Also writes inspection images for every successfully loaded sample.
    pub fn with_diagnostics(mut self, writer: DiagnosticsWriter) -> Self {
        self.diagnostics = Some(writer);
        self
    }
}

impl<D: ImageDecoder, R: MaskRasterizer> LoadSample for SampleLoader<D, R> {
    /// # Errors
    ///
    /// - `PipelineError::Decode` if the image is unreadable.
    /// - `PipelineError::DimensionMismatch` if the decoded image has zero width or height.
    /// - `PipelineError::AnnotationParse` (or `Io`) if the contour file is malformed or unreadable.
    fn load(&self, sample_ref: &SampleRef) -> Result<Sample, PipelineError> {
        let decoded = self.decoder.decode(sample_ref.image_path())?;
        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(PipelineError::DimensionMismatch {
                path: sample_ref.image_path().to_path_buf(),
                width,
                height,
            });
        }

        let polygon = parse_annotation_file(sample_ref.annotation_path())?;
        let mask = self.rasterizer.rasterize(&polygon, width, height);

        if let Some(writer) = &self.diagnostics {
            if let Err(e) = writer.write(sample_ref, &decoded.pixels, &polygon) {
                warn!("Diagnostics for '{}' not written: {}", sample_ref.image_path().display(), e);
            }
        }

        let sample = Sample::new(decoded.pixels, mask)?;
        debug!(
            "Loaded '{}' ({}x{}, {} mask pixels)",
            sample_ref.image_path().display(),
            width,
            height,
            sample.mask().count_true()
        );
        Ok(sample)
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
