pub mod random_draw;

pub use random_draw::{DrawOrder, RandomSampleIter};
