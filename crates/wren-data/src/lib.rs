//! # wren-data
//!
//! Turns a folder of labeled digit images into a training-ready dataset.
//!
//! This crate provides:
//! - [`load_image`]: decode one file into a `[H, W, 1]` grayscale tensor
//! - [`Assembler`] / [`assemble`]: walk `root/<split>/<digit>/` into one
//!   aligned [`Dataset`]
//! - [`Normalizer`] / [`normalize`]: rescale intensities to [0, 1]
//! - [`LabelEncoder`] / [`encode_labels`]: one-hot labels under a canonical
//!   class order
//! - [`split_dataset`]: per-example random train/validation partition
//! - IDX export/import of assembled datasets
//!
//! ```ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use wren_data::{assemble, LabelEncoder, DEFAULT_TRAINING_FRACTION};
//!
//! let ds = assemble("data/digits", "training")?
//!     .normalize()
//!     .encode_labels(&LabelEncoder::digits())?;
//! let split = ds.split(DEFAULT_TRAINING_FRACTION, &mut StdRng::seed_from_u64(42))?;
//! println!("{} train / {} valid", split.train.len(), split.valid.len());
//! ```

pub mod assemble;
pub mod dataset;
pub mod idx;
pub mod image_loader;
pub mod labels;
pub mod normalize;
pub mod split;

pub use assemble::{assemble, Assembler, SplitName, DEFAULT_EXTENSIONS, DEFAULT_PROGRESS_EVERY};
pub use dataset::{Dataset, EncodedDataset, NormalizedDataset, Rows};
pub use image_loader::{load_image, Image, ImageOptions, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use labels::{encode_labels, Digit, LabelEncoder, OneHotLabels, NUM_DIGITS};
pub use normalize::{normalize, Normalizer, MAX_INTENSITY};
pub use split::{split_dataset, SplitDataset, DEFAULT_TRAINING_FRACTION};
