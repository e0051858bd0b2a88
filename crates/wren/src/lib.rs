//! # wren
//!
//! Prepare labeled digit images for classifier training.
//!
//! This is the top-level facade crate that re-exports everything you need.
//!
//! ```rust
//! use wren::prelude::*;
//! ```
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | `wren-core` | Tensor, Shape, Error |
//! | `wren-data` | Image loading, dataset assembly, normalization, one-hot labels, splitting, IDX files |

pub use wren_core::{Error, Result, Shape, Tensor};

/// Re-export the data pipeline.
pub mod data {
    pub use wren_data::*;
}

/// End-to-end preparation: assemble, normalize, encode, split.
pub mod pipeline;

/// Convenient glob import.
pub mod prelude {
    pub use crate::pipeline::{prepare, PrepareConfig, Prepared};
    pub use wren_core::{Error, Result, Shape, Tensor};
    pub use wren_data::{
        assemble, encode_labels, load_image, normalize, split_dataset, Assembler, Dataset, Digit,
        EncodedDataset, ImageOptions, LabelEncoder, NormalizedDataset, Normalizer, OneHotLabels,
        SplitDataset, SplitName, DEFAULT_TRAINING_FRACTION,
    };
}
