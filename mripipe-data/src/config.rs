// mripipe-data/src/config.rs

use crate::datasets::DatasetIndex;
use crate::loader::LoadSample;
use crate::samplers::{DrawOrder, RandomSampleIter};
use mripipe_core::PipelineError;

/// Settings for a multi-epoch run of the batching pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub epochs: usize,
    /// Samples per batch. Only the last batch of an epoch may be smaller.
    pub batch_size: usize,
    /// Maximum number of batches waiting in the queue, the bound on in-flight memory.
    pub queue_capacity: usize,
    /// Base seed; epoch `e` draws with `seed + e`. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub draw_order: DrawOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            epochs: 10,
            batch_size: 8,
            queue_capacity: 10,
            seed: None,
            draw_order: DrawOrder::Random,
        }
    }
}

impl PipelineConfig {
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidConfig` for a zero batch size or queue capacity.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Upper bound on batches per epoch for `num_samples` indexed samples.
    pub fn batches_per_epoch(&self, num_samples: usize) -> usize {
        num_samples.div_ceil(self.batch_size.max(1))
    }

    /// A fresh sample iterator for `epoch`.
    pub fn sample_iter<'a, L: LoadSample + ?Sized>(
        &self,
        index: &DatasetIndex,
        loader: &'a L,
        epoch: usize,
    ) -> RandomSampleIter<'a, L> {
        let iter = match self.seed {
            Some(seed) => RandomSampleIter::with_seed(index, loader, seed.wrapping_add(epoch as u64)),
            None => RandomSampleIter::new(index, loader),
        };
        iter.with_order(self.draw_order)
    }
}
