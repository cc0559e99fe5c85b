//! Core building blocks shared by the mripipe crates: the error taxonomy, the
//! `Grid` matrix type, sample and batch types, contour parsing, and the two
//! collaborator seams (image decoding and mask rasterization).

pub mod annotation;
pub mod decoder;
pub mod error;
pub mod grid;
pub mod rasterizer;
pub mod sample;

pub use decoder::{DecodedImage, ImageDecoder, RasterImageDecoder};
pub use error::{ErrorKind, PipelineError};
pub use grid::Grid;
pub use rasterizer::{BoundaryPolicy, MaskRasterizer, Point, ScanlineRasterizer};
pub use sample::{Batch, Sample, SampleRef};
