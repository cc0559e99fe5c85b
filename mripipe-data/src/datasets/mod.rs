pub mod dataset_index;
pub mod layout;
pub mod traits;

pub use dataset_index::{read_manifest, DatasetIndex, ManifestRow};
pub use layout::DataLayout;
pub use traits::Dataset;
