use std::fmt;

// Shape: N-dimensional shape representation
//
// Dataset tensors in wren are always "example-major": dimension 0 counts
// examples and the remaining dimensions describe a single example.
//   - One image:        Shape([28, 28, 1])
//   - A batch of them:  Shape([N, 28, 28, 1])
//   - One-hot labels:   Shape([N, 10])
//
// An empty batch (N = 0) is a valid shape with zero elements.

/// N-dimensional shape of a tensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Create a new shape from a vector of dimension sizes.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape(dims)
    }

    /// The dimension sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements (product of all dimensions).
    /// A scalar shape [] has 1 element; any zero-sized dimension gives 0.
    pub fn elem_count(&self) -> usize {
        self.0.iter().product::<usize>()
    }

    /// Number of examples along dimension 0 (0 for a scalar shape).
    pub fn rows(&self) -> usize {
        self.0.first().copied().unwrap_or(0)
    }

    /// The shape of a single example: every dimension after the first.
    pub fn item_shape(&self) -> Shape {
        Shape(self.0.iter().skip(1).copied().collect())
    }

    /// Prepend an example dimension of size `n`.
    ///
    /// `Shape::from((28, 28, 1)).batched(5)` is `[5, 28, 28, 1]`.
    pub fn batched(&self, n: usize) -> Shape {
        let mut dims = Vec::with_capacity(self.rank() + 1);
        dims.push(n);
        dims.extend_from_slice(&self.0);
        Shape(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

// These let you write: Shape::from((28, 28, 1)) instead of Shape::new(vec![28, 28, 1])

impl From<()> for Shape {
    fn from(_: ()) -> Self {
        Shape(vec![])
    }
}

impl From<usize> for Shape {
    fn from(d: usize) -> Self {
        Shape(vec![d])
    }
}

impl From<(usize,)> for Shape {
    fn from((d0,): (usize,)) -> Self {
        Shape(vec![d0])
    }
}

impl From<(usize, usize)> for Shape {
    fn from((d0, d1): (usize, usize)) -> Self {
        Shape(vec![d0, d1])
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((d0, d1, d2): (usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2])
    }
}

impl From<(usize, usize, usize, usize)> for Shape {
    fn from((d0, d1, d2, d3): (usize, usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2, d3])
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Shape(v)
    }
}

impl From<&[usize]> for Shape {
    fn from(s: &[usize]) -> Self {
        Shape(s.to_vec())
    }
}
