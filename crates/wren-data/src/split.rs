// DatasetSplitter: per-example random train/valid assignment
//
// Each example is assigned independently: it goes to the training partition
// with probability `training_fraction` and to validation otherwise. This is
// a Bernoulli trial per index, not a fixed-count shuffle-and-cut:
//
//   - the realised train fraction is close to, but rarely exactly,
//     `training_fraction`
//   - there is no stratification, so class balance between the partitions
//     is not guaranteed
//
// The random source is supplied by the caller; seed it (e.g.
// `StdRng::seed_from_u64`) for a reproducible split.

use rand::Rng;
use tracing::debug;

use wren_core::{Error, Result};

use crate::dataset::{Dataset, Rows};

/// Fraction of examples sent to training when the caller has no preference.
pub const DEFAULT_TRAINING_FRACTION: f64 = 0.75;

/// A dataset partitioned into training and validation examples.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDataset<D, L> {
    pub train: Dataset<D, L>,
    pub valid: Dataset<D, L>,
    /// Source index of every training example, ascending.
    pub train_indices: Vec<usize>,
    /// Source index of every validation example, ascending.
    pub valid_indices: Vec<usize>,
}

impl<D: Rows, L: Rows> SplitDataset<D, L> {
    /// Size of the source dataset.
    pub fn total(&self) -> usize {
        self.train.len() + self.valid.len()
    }

    /// Share of examples that ended up in training (0 for an empty split).
    pub fn realized_fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.train.len() as f64 / n as f64,
        }
    }
}

/// Partition `dataset` by an independent weighted coin flip per example.
///
/// Fails with [`Error::InvalidArgument`] unless `0 < training_fraction < 1`.
pub fn split_dataset<D, L, R>(
    dataset: &Dataset<D, L>,
    training_fraction: f64,
    rng: &mut R,
) -> Result<SplitDataset<D, L>>
where
    D: Rows,
    L: Rows,
    R: Rng + ?Sized,
{
    if !(training_fraction > 0.0 && training_fraction < 1.0) {
        return Err(Error::invalid_argument(format!(
            "training fraction must be in (0, 1), got {training_fraction}"
        )));
    }

    let n = dataset.len();
    let mut train_indices = Vec::with_capacity((n as f64 * training_fraction) as usize + 1);
    let mut valid_indices = Vec::new();
    for i in 0..n {
        if rng.gen_bool(training_fraction) {
            train_indices.push(i);
        } else {
            valid_indices.push(i);
        }
    }

    debug!(
        total = n,
        train = train_indices.len(),
        valid = valid_indices.len(),
        "split dataset"
    );

    Ok(SplitDataset {
        train: dataset.subset(&train_indices),
        valid: dataset.subset(&valid_indices),
        train_indices,
        valid_indices,
    })
}

impl<D: Rows, L: Rows> Dataset<D, L> {
    /// See [`split_dataset`].
    pub fn split<R: Rng + ?Sized>(
        &self,
        training_fraction: f64,
        rng: &mut R,
    ) -> Result<SplitDataset<D, L>> {
        split_dataset(self, training_fraction, rng)
    }
}
