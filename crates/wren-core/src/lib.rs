//! # wren-core
//!
//! Core primitives shared by the wren crates.
//!
//! This crate provides:
//! - [`Tensor`]: owned, row-major n-dimensional array with example-axis ops
//! - [`Shape`]: shape representation
//! - [`Error`] / [`Result`]: the single error type used across wren

pub mod error;
pub mod shape;
pub mod tensor;

pub use error::{Error, Result};
pub use shape::Shape;
pub use tensor::Tensor;
