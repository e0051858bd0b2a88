// Tensor: owned, contiguous, row-major n-dimensional array
//
// wren only ever needs dense host memory: images are decoded into `u8`,
// normalised into `f32`, and one-hot labels are `f32` matrices. A tensor is a
// flat `Vec<T>` plus a `Shape`; dimension 0 is the example axis, so the
// dataset operations (stack, append, row selection) all work on contiguous
// row slices.

use crate::error::{Error, Result};
use crate::shape::Shape;

/// An owned n-dimensional array stored contiguously in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T> Tensor<T> {
    /// Wrap `data` with the given shape.
    ///
    /// Fails with [`Error::ElementCountMismatch`] when `data.len()` does not
    /// equal the shape's element count.
    pub fn from_vec(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        let expected = shape.elem_count();
        if data.len() != expected {
            return Err(Error::ElementCountMismatch {
                shape,
                expected,
                got: data.len(),
            });
        }
        Ok(Tensor { data, shape })
    }

    /// A tensor with zero examples whose items have `item_shape`.
    pub fn empty(item_shape: impl Into<Shape>) -> Self {
        Tensor {
            data: Vec::new(),
            shape: item_shape.into().batched(0),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Total element count.
    pub fn elem_count(&self) -> usize {
        self.data.len()
    }

    /// Number of examples along dimension 0.
    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    /// Elements per example (product of dims after the first).
    pub fn row_len(&self) -> usize {
        self.shape.item_shape().elem_count()
    }

    /// The flattened elements of example `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[T] {
        let n = self.row_len();
        &self.data[i * n..(i + 1) * n]
    }

    /// Iterate over the flattened examples.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        let n = self.row_len();
        (0..self.rows()).map(move |i| &self.data[i * n..(i + 1) * n])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Elementwise conversion into a new tensor of the same shape.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Tensor<U> {
        Tensor {
            data: self.data.iter().map(f).collect(),
            shape: self.shape.clone(),
        }
    }

    fn check_item_shape(&self, other: &Shape) -> Result<()> {
        if self.shape.rank() == 0 || other.rank() == 0 {
            return Err(Error::ShapeMismatch {
                expected: self.shape.batched(0),
                got: other.clone(),
            });
        }
        let ours = self.shape.item_shape();
        let theirs = other.item_shape();
        if ours != theirs {
            return Err(Error::ShapeMismatch {
                expected: ours,
                got: theirs,
            });
        }
        Ok(())
    }

    /// Concatenate `other` onto `self` along the example axis.
    ///
    /// Both tensors must agree on every dimension except the first.
    pub fn append(&mut self, other: Tensor<T>) -> Result<()> {
        self.check_item_shape(&other.shape)?;
        let rows = self.rows() + other.rows();
        self.data.extend(other.data);
        let mut dims = self.shape.dims().to_vec();
        dims[0] = rows;
        self.shape = Shape::new(dims);
        Ok(())
    }
}

impl<T: Clone> Tensor<T> {
    /// Stack equally shaped items into a batch `[items.len(), ...item_shape]`.
    ///
    /// `item_shape` is required so an empty list still yields a correctly
    /// shaped (zero-row) batch.
    pub fn stack(items: &[Tensor<T>], item_shape: impl Into<Shape>) -> Result<Self> {
        let item_shape = item_shape.into();
        let mut data = Vec::with_capacity(items.len() * item_shape.elem_count());
        for item in items {
            if item.shape != item_shape {
                return Err(Error::ShapeMismatch {
                    expected: item_shape,
                    got: item.shape.clone(),
                });
            }
            data.extend_from_slice(&item.data);
        }
        Ok(Tensor {
            data,
            shape: item_shape.batched(items.len()),
        })
    }

    /// Gather the examples at `indices` (in that order) into a new tensor.
    ///
    /// # Panics
    /// Panics if any index is `>= self.rows()`.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let n = self.row_len();
        let mut data = Vec::with_capacity(indices.len() * n);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        let mut dims = self.shape.dims().to_vec();
        dims[0] = indices.len();
        Tensor {
            data,
            shape: Shape::new(dims),
        }
    }
}
