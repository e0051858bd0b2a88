// Pipeline: the full assemble → normalize → encode → split sequence
//
// `prepare` keeps the raw split alongside the encoded one: the raw partitions
// are what gets exported to IDX files, the encoded partitions are what a
// classifier consumes. Both come from the same random draw, so
// `raw.train_indices == encoded.train_indices`.

use std::path::PathBuf;

use rand::Rng;
use tracing::info;

use wren_core::{Result, Tensor};
use wren_data::{
    Assembler, Dataset, Digit, EncodedDataset, LabelEncoder, OneHotLabels, SplitDataset,
    SplitName, DEFAULT_HEIGHT, DEFAULT_TRAINING_FRACTION, DEFAULT_WIDTH, NUM_DIGITS,
};

/// Everything `prepare` needs to know.
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    pub root: PathBuf,
    pub split: SplitName,
    pub training_fraction: f64,
    pub height: u32,
    pub width: u32,
    pub resize: bool,
    pub parallel: bool,
}

impl PrepareConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            split: SplitName::Training,
            training_fraction: DEFAULT_TRAINING_FRACTION,
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            resize: false,
            parallel: false,
        }
    }

    pub fn split(mut self, split: SplitName) -> Self {
        self.split = split;
        self
    }

    pub fn training_fraction(mut self, f: f64) -> Self {
        self.training_fraction = f;
        self
    }

    pub fn image_size(mut self, height: u32, width: u32) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    pub fn resize(mut self, yes: bool) -> Self {
        self.resize = yes;
        self
    }

    pub fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    fn assembler(&self) -> Assembler {
        Assembler::new(&self.root)
            .image_size(self.height, self.width)
            .resize(self.resize)
            .parallel(self.parallel)
    }
}

/// Result of [`prepare`].
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Per-digit example counts of the assembled dataset.
    pub class_counts: [usize; NUM_DIGITS],
    /// Raw `u8` images with digit labels.
    pub raw: SplitDataset<Tensor<u8>, Vec<Digit>>,
    /// Normalized images with one-hot labels.
    pub encoded: SplitDataset<Tensor<f32>, OneHotLabels>,
}

/// Run the whole preparation pipeline with the caller's random source.
pub fn prepare<R: Rng + ?Sized>(config: &PrepareConfig, rng: &mut R) -> Result<Prepared> {
    let dataset: Dataset = config.assembler().assemble(config.split)?;
    let class_counts = dataset.class_counts();

    let raw = dataset.split(config.training_fraction, rng)?;
    let encoded = SplitDataset {
        train: encode(raw.train.clone())?,
        valid: encode(raw.valid.clone())?,
        train_indices: raw.train_indices.clone(),
        valid_indices: raw.valid_indices.clone(),
    };

    info!(
        split = %config.split,
        train = encoded.train.len(),
        valid = encoded.valid.len(),
        "prepared dataset"
    );
    Ok(Prepared {
        class_counts,
        raw,
        encoded,
    })
}

fn encode(ds: Dataset) -> Result<EncodedDataset> {
    ds.normalize().encode_labels(&LabelEncoder::digits())
}
