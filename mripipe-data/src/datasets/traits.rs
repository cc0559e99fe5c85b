// mripipe-data/src/datasets/traits.rs

use mripipe_core::PipelineError;

/// Represents a dataset that can be accessed by index.
///
/// A dataset is an ordered, read-only collection of items. The item type must be
/// `Send + 'static` so items can be handed to the producer thread of an epoch.
pub trait Dataset {
    /// The type of a single item returned by the dataset.
    type Item: Send + 'static;

    /// Returns the item at the given index.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::IndexOutOfBounds` if `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Self::Item, PipelineError>;

    /// Returns the total number of items in the dataset.
    fn len(&self) -> usize;

    /// Checks if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
