use std::path::PathBuf;

use crate::shape::Shape;

/// All errors that can occur while preparing a dataset.
///
/// Every variant aborts the enclosing operation. Nothing in wren downgrades an
/// error into a skipped file, since a skipped file would break the alignment
/// between images and labels.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input path does not exist.
    #[error("path does not exist: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A malformed argument (unknown split name, out-of-range fraction, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The image file exists but could not be decoded.
    #[error("failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// A label outside the recognised class set.
    #[error("unknown label {label:?} (expected one of {known})")]
    UnknownLabel { label: String, known: String },

    /// A tensor or image does not have the expected shape.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    /// Element count mismatch when creating a tensor from a vec.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// Data and labels disagree on the number of examples.
    #[error("row count mismatch: {data} data rows vs {labels} labels")]
    RowCountMismatch { data: usize, labels: usize },

    /// Malformed IDX payload (bad magic number, truncated body).
    #[error("invalid IDX data: {0}")]
    InvalidIdx(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid_argument(s: impl Into<String>) -> Self {
        Error::InvalidArgument(s.into())
    }
}

/// Convenience alias used throughout wren.
pub type Result<T> = std::result::Result<T, Error>;
