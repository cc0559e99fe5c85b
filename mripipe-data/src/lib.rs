//! Data loading for the segmentation training pipeline.
//!
//! A [`DatasetIndex`] pairs image records with their contour files. A
//! [`RandomSampleIter`] draws each indexed pair once per epoch and turns it into a
//! [`Sample`](mripipe_core::Sample) through a [`LoadSample`] implementation, skipping
//! pairs that fail to load. [`run_epoch`] batches that stream on a producer thread and
//! hands the batches to a [`TrainingStep`] over a bounded queue; [`train`] repeats
//! this for every configured epoch.

pub mod batching;
pub mod config;
pub mod datasets;
pub mod diagnostics;
pub mod loader;
pub mod pipeline;
pub mod samplers;
pub mod training;

#[cfg(test)]
pub(crate) mod test_utils;

pub use batching::Batches;
pub use config::PipelineConfig;
pub use datasets::{DataLayout, Dataset, DatasetIndex};
pub use diagnostics::DiagnosticsWriter;
pub use loader::{LoadSample, SampleLoader};
pub use pipeline::{run_epoch, CancelToken, EpochReport, QueueEntry};
pub use samplers::{DrawOrder, RandomSampleIter};
pub use training::{train, LoggingTrainingStep, TrainingReport, TrainingStep};
