// mripipe-data/src/samplers/random_draw.rs

use crate::datasets::DatasetIndex;
use crate::loader::LoadSample;
use log::{debug, warn};
use mripipe_core::{Sample, SampleRef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::iter::FusedIterator;

/// Order in which entries are drawn from the working list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    /// Uniformly random, without replacement.
    #[default]
    Random,
    /// Index order. Deterministic, meant for debugging.
    Sequential,
}

/// Draws samples from a [`DatasetIndex`] without replacement, loading each one on demand.
///
/// The iterator owns a private copy of the index entries and removes every entry it
/// draws, so an entry is attempted at most once. Entries that fail to load are logged
/// at warning level and skipped; the iterator then ends early rather than failing.
/// It is single-pass: build a new one for every epoch.
pub struct RandomSampleIter<'a, L: LoadSample + ?Sized> {
    remaining: Vec<SampleRef>,
    loader: &'a L,
    rng: StdRng,
    order: DrawOrder,
    yielded: usize,
    skipped: usize,
    exhausted: bool,
}

impl<'a, L: LoadSample + ?Sized> RandomSampleIter<'a, L> {
    /// Creates an iterator seeded from system entropy.
    pub fn new(index: &DatasetIndex, loader: &'a L) -> Self {
        Self::with_rng(index, loader, StdRng::from_entropy())
    }

    /// Creates an iterator with a reproducible draw sequence.
    pub fn with_seed(index: &DatasetIndex, loader: &'a L, seed: u64) -> Self {
        Self::with_rng(index, loader, StdRng::seed_from_u64(seed))
    }

    fn with_rng(index: &DatasetIndex, loader: &'a L, rng: StdRng) -> Self {
        Self {
            remaining: index.entries().to_vec(),
            loader,
            rng,
            order: DrawOrder::Random,
            yielded: 0,
            skipped: 0,
            exhausted: false,
        }
    }

    pub fn with_order(mut self, order: DrawOrder) -> Self {
        if order == DrawOrder::Sequential && self.order != DrawOrder::Sequential {
            // Sequential draws pop from the back.
            self.remaining.reverse();
        }
        self.order = order;
        self
    }

    /// Entries not drawn yet.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Samples returned so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Entries drawn but skipped because they failed to load.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Entries drawn so far, loaded or not.
    pub fn drawn(&self) -> usize {
        self.yielded + self.skipped
    }

    fn draw(&mut self) -> Option<SampleRef> {
        if self.remaining.is_empty() {
            return None;
        }
        match self.order {
            DrawOrder::Random => {
                let position = self.rng.gen_range(0..self.remaining.len());
                Some(self.remaining.swap_remove(position))
            }
            DrawOrder::Sequential => self.remaining.pop(),
        }
    }
}

impl<L: LoadSample + ?Sized> Iterator for RandomSampleIter<'_, L> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(sample_ref) = self.draw() {
            match self.loader.load(&sample_ref) {
                Ok(sample) => {
                    self.yielded += 1;
                    return Some(sample);
                }
                Err(e) => {
                    self.skipped += 1;
                    warn!(
                        "Skipping sample ({}): image '{}', annotation '{}': {}",
                        e.label(),
                        sample_ref.image_path().display(),
                        sample_ref.annotation_path().display(),
                        e
                    );
                }
            }
        }

        if !self.exhausted {
            self.exhausted = true;
            debug!(
                "Sample iterator exhausted: {} yielded, {} skipped",
                self.yielded, self.skipped
            );
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining.len()))
    }
}

impl<L: LoadSample + ?Sized> FusedIterator for RandomSampleIter<'_, L> {}

#[cfg(test)]
#[path = "random_draw_test.rs"]
mod tests;
