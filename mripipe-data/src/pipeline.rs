// mripipe-data/src/pipeline.rs
//! # Bounded batching pipeline
//!
//! One epoch runs two threads that share a single bounded queue:
//!
//! - the **producer** pulls samples, groups them into batches and pushes each batch,
//!   blocking while the queue is full, then pushes an end-of-epoch marker;
//! - the **consumer** pops entries, blocking while the queue is empty, hands every
//!   batch to the [`TrainingStep`] and stops at the marker.
//!
//! [`run_epoch`] returns once both threads have finished, so epochs never overlap.
//! Both threads poll a [`CancelToken`] while they wait on the queue.

use crate::batching::Batches;
use crate::training::TrainingStep;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use log::debug;
use mripipe_core::{Batch, PipelineError, Sample};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long a blocked producer or consumer waits before re-checking for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Shared flag used to stop an epoch early.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An entry in the epoch queue.
#[derive(Debug)]
pub enum QueueEntry {
    Batch(Batch),
    /// Pushed once by the producer after its last batch.
    EndOfEpoch,
}

/// What one epoch delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpochReport {
    pub epoch: usize,
    /// Batches handed to the training step.
    pub batches: usize,
    /// Samples handed to the training step.
    pub samples: usize,
    /// Largest queue length observed by the producer right after a push.
    pub peak_queue_depth: usize,
}

#[derive(Debug, Default)]
struct ProducerStats {
    batches: usize,
    peak_queue_depth: usize,
}

#[derive(Debug, Default)]
struct ConsumerStats {
    batches: usize,
    samples: usize,
}

/// Runs a single epoch over `samples`.
///
/// # Arguments
///
/// * `samples` - the epoch's sample stream, typically a fresh [`RandomSampleIter`](crate::samplers::RandomSampleIter).
///   Moved to the producer thread and consumed there only.
/// * `step` - receives every batch, in production order, on the consumer thread.
/// * `epoch` - zero-based epoch number, passed through to `step` and the report.
/// * `batch_size` - samples per batch; the last batch may be smaller.
/// * `queue_capacity` - maximum number of batches waiting in the queue.
///
/// # Errors
///
/// - `PipelineError::InvalidConfig` for a zero batch size or queue capacity.
/// - `PipelineError::Cancelled` if `cancel` fires before the epoch completes.
/// - Any error returned by `step`; the producer is stopped and the epoch ends there.
/// - `PipelineError::WorkerPanicked` if either thread panics.
pub fn run_epoch<I, T>(
    samples: I,
    step: &mut T,
    epoch: usize,
    batch_size: usize,
    queue_capacity: usize,
    cancel: &CancelToken,
) -> Result<EpochReport, PipelineError>
where
    I: Iterator<Item = Sample> + Send,
    T: TrainingStep + Send + ?Sized,
{
    if batch_size == 0 || queue_capacity == 0 {
        return Err(PipelineError::InvalidConfig(format!(
            "batch size ({}) and queue capacity ({}) must be at least 1",
            batch_size, queue_capacity
        )));
    }

    let (tx, rx) = bounded::<QueueEntry>(queue_capacity);
    let (produced, consumed) = thread::scope(|scope| {
        let producer = scope.spawn(move || produce(samples, batch_size, tx, cancel));
        let consumer = scope.spawn(move || consume(rx, step, epoch, cancel));
        (join_worker(producer), join_worker(consumer))
    });

    // The producer's error explains a consumer that saw the queue close early.
    let produced = produced?;
    let consumed = consumed?;
    debug!(
        "Epoch {} finished: produced {} batches, consumed {} batches",
        epoch, produced.batches, consumed.batches
    );

    Ok(EpochReport {
        epoch,
        batches: consumed.batches,
        samples: consumed.samples,
        peak_queue_depth: produced.peak_queue_depth,
    })
}

fn produce<I>(
    samples: I,
    batch_size: usize,
    tx: Sender<QueueEntry>,
    cancel: &CancelToken,
) -> Result<ProducerStats, PipelineError>
where
    I: Iterator<Item = Sample>,
{
    let mut stats = ProducerStats::default();
    for batch in Batches::new(samples, batch_size) {
        if !push(&tx, QueueEntry::Batch(batch), cancel)? {
            debug!("Consumer stopped early; producer exiting after {} batches", stats.batches);
            return Ok(stats);
        }
        stats.batches += 1;
        stats.peak_queue_depth = stats.peak_queue_depth.max(tx.len());
    }
    push(&tx, QueueEntry::EndOfEpoch, cancel)?;
    Ok(stats)
}

/// Blocking push. `Ok(false)` means the consumer is gone.
fn push(
    tx: &Sender<QueueEntry>,
    entry: QueueEntry,
    cancel: &CancelToken,
) -> Result<bool, PipelineError> {
    let mut entry = entry;
    loop {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        match tx.send_timeout(entry, POLL_INTERVAL) {
            Ok(()) => return Ok(true),
            Err(SendTimeoutError::Timeout(returned)) => entry = returned,
            Err(SendTimeoutError::Disconnected(_)) => return Ok(false),
        }
    }
}

fn consume<T>(
    rx: Receiver<QueueEntry>,
    step: &mut T,
    epoch: usize,
    cancel: &CancelToken,
) -> Result<ConsumerStats, PipelineError>
where
    T: TrainingStep + ?Sized,
{
    let mut stats = ConsumerStats::default();
    loop {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(QueueEntry::Batch(batch)) => {
                stats.batches += 1;
                stats.samples += batch.len();
                step.train_batch(epoch, batch)?;
            }
            Ok(QueueEntry::EndOfEpoch) => return Ok(stats),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(PipelineError::WorkerPanicked(
                    "producer stopped before the end-of-epoch marker".to_string(),
                ))
            }
        }
    }
}

fn join_worker<R>(
    handle: thread::ScopedJoinHandle<'_, Result<R, PipelineError>>,
) -> Result<R, PipelineError> {
    handle
        .join()
        .map_err(|payload| PipelineError::WorkerPanicked(panic_message(payload.as_ref())))?
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
