// Dataset: index-aligned (data, labels) pair
//
// `data` holds one example per row along dimension 0 and `labels[i]`
// describes `data[i]`. The pair is only ever built through `Dataset::new`,
// which checks that both sides have the same number of rows, and every
// transform in this crate keeps rows in lock-step (normalize maps data only,
// label encoding maps labels only, split selects the same indices from both).

use wren_core::{Error, Result, Shape, Tensor};

use crate::labels::{Digit, LabelEncoder, OneHotLabels, NUM_DIGITS};

/// Anything made of examples that can be counted and sub-selected.
pub trait Rows: Sized {
    /// Number of examples.
    fn num_rows(&self) -> usize;

    /// The examples at `indices`, in that order.
    fn take_rows(&self, indices: &[usize]) -> Self;
}

impl<T: Clone> Rows for Tensor<T> {
    fn num_rows(&self) -> usize {
        self.rows()
    }

    fn take_rows(&self, indices: &[usize]) -> Self {
        self.select_rows(indices)
    }
}

impl<L: Clone> Rows for Vec<L> {
    fn num_rows(&self) -> usize {
        self.len()
    }

    fn take_rows(&self, indices: &[usize]) -> Self {
        indices.iter().map(|&i| self[i].clone()).collect()
    }
}

/// Images with aligned labels.
///
/// The defaults describe a freshly assembled dataset: raw `u8` images of
/// shape `[N, H, W, 1]` and one [`Digit`] per image.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<D = Tensor<u8>, L = Vec<Digit>> {
    pub(crate) data: D,
    pub(crate) labels: L,
}

/// Intensities rescaled to `f32`, labels untouched.
pub type NormalizedDataset = Dataset<Tensor<f32>, Vec<Digit>>;

/// Normalized intensities with one-hot labels; what a classifier consumes.
pub type EncodedDataset = Dataset<Tensor<f32>, OneHotLabels>;

impl<D: Rows, L: Rows> Dataset<D, L> {
    /// Pair `data` with `labels`.
    ///
    /// Fails with [`Error::RowCountMismatch`] if they disagree on the number of
    /// examples.
    pub fn new(data: D, labels: L) -> Result<Self> {
        let (d, l) = (data.num_rows(), labels.num_rows());
        if d != l {
            return Err(Error::RowCountMismatch { data: d, labels: l });
        }
        Ok(Dataset { data, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The examples at `indices`, data and labels selected together.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Dataset {
            data: self.data.take_rows(indices),
            labels: self.labels.take_rows(indices),
        }
    }
}

impl<D, L> Dataset<D, L> {
    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn labels(&self) -> &L {
        &self.labels
    }

    pub fn into_parts(self) -> (D, L) {
        (self.data, self.labels)
    }
}

impl<T, L> Dataset<Tensor<T>, L> {
    /// Shape of one example, e.g. `[28, 28, 1]`.
    pub fn image_shape(&self) -> Shape {
        self.data.shape().item_shape()
    }

    /// The flattened pixels of example `i`.
    pub fn image(&self, i: usize) -> &[T] {
        self.data.row(i)
    }
}

impl<D> Dataset<D, Vec<Digit>> {
    pub fn label(&self, i: usize) -> Digit {
        self.labels[i]
    }

    /// Number of examples per digit, indexed by digit value.
    pub fn class_counts(&self) -> [usize; NUM_DIGITS] {
        let mut counts = [0usize; NUM_DIGITS];
        for d in &self.labels {
            counts[d.index()] += 1;
        }
        counts
    }

    /// Replace the digit labels by their one-hot rows under `encoder`.
    pub fn encode_labels(self, encoder: &LabelEncoder) -> Result<Dataset<D, OneHotLabels>> {
        let labels = encoder.encode(&self.labels)?;
        Ok(Dataset {
            data: self.data,
            labels,
        })
    }
}
