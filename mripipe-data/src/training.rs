// mripipe-data/src/training.rs

use crate::config::PipelineConfig;
use crate::datasets::{Dataset, DatasetIndex};
use crate::loader::LoadSample;
use crate::pipeline::{run_epoch, CancelToken, EpochReport};
use log::info;
use mripipe_core::{Batch, PipelineError};

/// Receives the batches of each epoch on the consumer thread.
pub trait TrainingStep {
    /// Processes one batch. Returning an error stops the current epoch.
    fn train_batch(&mut self, epoch: usize, batch: Batch) -> Result<(), PipelineError>;
}

/// Placeholder training step: logs each batch and keeps running totals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoggingTrainingStep {
    batches: usize,
    samples: usize,
}

impl LoggingTrainingStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
}

impl TrainingStep for LoggingTrainingStep {
    fn train_batch(&mut self, epoch: usize, batch: Batch) -> Result<(), PipelineError> {
        info!("Training on epoch {}, batch {}", epoch + 1, batch.index() + 1);
        info!("Size of this batch {}", batch.len());
        self.batches += 1;
        self.samples += batch.len();
        info!("Done training batch");
        Ok(())
    }
}

/// Per-epoch results of a [`train`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingReport {
    pub epochs: Vec<EpochReport>,
}

impl TrainingReport {
    pub fn total_batches(&self) -> usize {
        self.epochs.iter().map(|e| e.batches).sum()
    }

    pub fn total_samples(&self) -> usize {
        self.epochs.iter().map(|e| e.samples).sum()
    }
}

/// Runs `config.epochs` epochs over `index`, each with a freshly shuffled iterator.
///
/// # Errors
///
/// Stops at the first epoch that fails and returns its error; see
/// [`run_epoch`](crate::pipeline::run_epoch). An invalid `config` is rejected before
/// any epoch starts.
pub fn train<L, T>(
    index: &DatasetIndex,
    loader: &L,
    step: &mut T,
    config: &PipelineConfig,
    cancel: &CancelToken,
) -> Result<TrainingReport, PipelineError>
where
    L: LoadSample + ?Sized,
    T: TrainingStep + Send + ?Sized,
{
    config.validate()?;
    info!("Number of samples: {}", index.len());
    info!(
        "Number of batches: {}",
        config.batches_per_epoch(index.len())
    );

    let mut report = TrainingReport::default();
    for epoch in 0..config.epochs {
        info!("Training epoch {}", epoch + 1);
        let samples = config.sample_iter(index, loader, epoch);
        let epoch_report = run_epoch(
            samples,
            &mut *step,
            epoch,
            config.batch_size,
            config.queue_capacity,
            cancel,
        )?;
        info!(
            "Done training epoch {}: {} batches, {} samples",
            epoch + 1,
            epoch_report.batches,
            epoch_report.samples
        );
        report.epochs.push(epoch_report);
    }
    Ok(report)
}
