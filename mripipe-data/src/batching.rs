// mripipe-data/src/batching.rs
//! # Batches
//!
//! Groups a stream of samples into [`Batch`]es of a fixed size. Only the last batch
//! of the stream may be smaller; an empty stream produces no batch at all.
//!
//! ```rust
//! use mripipe_core::{Grid, Sample};
//! use mripipe_data::batching::Batches;
//!
//! let samples = (0..5).map(|_| Sample::new(Grid::filled(1, 1, 0.0), Grid::filled(1, 1, false)).unwrap());
//! let sizes: Vec<usize> = Batches::new(samples, 2).map(|b| b.len()).collect();
//! assert_eq!(sizes, vec![2, 2, 1]);
//! ```

use mripipe_core::{Batch, Sample};
use std::iter::FusedIterator;

/// Iterator adapter turning samples into batches.
pub struct Batches<I> {
    samples: I,
    batch_size: usize,
    next_index: usize,
    done: bool,
}

impl<I: Iterator<Item = Sample>> Batches<I> {
    /// A `batch_size` of zero is treated as one.
    pub fn new(samples: I, batch_size: usize) -> Self {
        Self {
            samples,
            batch_size: batch_size.max(1),
            next_index: 0,
            done: false,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl<I: Iterator<Item = Sample>> Iterator for Batches<I> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut batch = Vec::with_capacity(self.batch_size);
        for _ in 0..self.batch_size {
            match self.samples.next() {
                Some(sample) => batch.push(sample),
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if batch.is_empty() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        Some(Batch::new(index, batch))
    }
}

impl<I: Iterator<Item = Sample>> FusedIterator for Batches<I> {}
