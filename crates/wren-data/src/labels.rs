// Labels: the digit class type and one-hot encoding
//
// Class identifiers arrive as folder names or free-form strings. They are
// validated once, at this boundary, into either a `Digit` (the closed 0..=9
// set used by the assembler) or a column index of a `LabelEncoder`.
//
// The class -> column mapping is fixed by a canonical sort of the class
// identifiers, never by the order in which labels are first seen:
//
//   "0" -> 0, "1" -> 1, ..., "9" -> 9

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use wren_core::{Error, Result, Tensor};

use crate::dataset::Rows;

/// Number of digit classes.
pub const NUM_DIGITS: usize = 10;

const DIGIT_NAMES: [&str; NUM_DIGITS] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// A validated digit class label (0..=9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digit(u8);

impl Digit {
    /// Every digit in ascending order.
    pub const ALL: [Digit; NUM_DIGITS] = [
        Digit(0),
        Digit(1),
        Digit(2),
        Digit(3),
        Digit(4),
        Digit(5),
        Digit(6),
        Digit(7),
        Digit(8),
        Digit(9),
    ];

    /// Validate a numeric class value.
    pub fn new(value: u8) -> Result<Self> {
        if (value as usize) < NUM_DIGITS {
            Ok(Digit(value))
        } else {
            Err(unknown_digit(&value.to_string()))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Column of this digit in a one-hot row.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The class identifier, which is also the class folder name.
    pub fn as_str(self) -> &'static str {
        DIGIT_NAMES[self.0 as usize]
    }
}

fn unknown_digit(label: &str) -> Error {
    Error::UnknownLabel {
        label: label.to_string(),
        known: DIGIT_NAMES.join(", "),
    }
}

impl TryFrom<u8> for Digit {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Digit::new(value)
    }
}

impl FromStr for Digit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DIGIT_NAMES
            .iter()
            .position(|&name| name == s)
            .map(|i| Digit(i as u8))
            .ok_or_else(|| unknown_digit(s))
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Digit {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// OneHotLabels

/// An `[N, C]` matrix of one-hot rows.
///
/// Every row holds exactly one `1.0`, at the column of its class.
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotLabels {
    matrix: Tensor<f32>,
}

impl OneHotLabels {
    /// Build from class indices. Callers guarantee `index < num_classes`.
    fn from_indices(indices: &[usize], num_classes: usize) -> Result<Self> {
        let mut data = vec![0.0f32; indices.len() * num_classes];
        for (row, &class) in indices.iter().enumerate() {
            data[row * num_classes + class] = 1.0;
        }
        Ok(OneHotLabels {
            matrix: Tensor::from_vec(data, (indices.len(), num_classes))?,
        })
    }

    pub fn len(&self) -> usize {
        self.matrix.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of each row (C).
    pub fn num_classes(&self) -> usize {
        self.matrix.row_len()
    }

    /// The indicator vector of example `i`.
    pub fn row(&self, i: usize) -> &[f32] {
        self.matrix.row(i)
    }

    /// Column holding the `1.0` of example `i`.
    pub fn class_index(&self, i: usize) -> usize {
        self.row(i)
            .iter()
            .position(|&v| v == 1.0)
            .unwrap_or_default()
    }

    pub fn as_tensor(&self) -> &Tensor<f32> {
        &self.matrix
    }

    pub fn into_tensor(self) -> Tensor<f32> {
        self.matrix
    }
}

impl Rows for OneHotLabels {
    fn num_rows(&self) -> usize {
        self.len()
    }

    fn take_rows(&self, indices: &[usize]) -> Self {
        OneHotLabels {
            matrix: self.matrix.select_rows(indices),
        }
    }
}

// LabelEncoder

/// Maps class identifiers to one-hot columns under a canonical ordering.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    /// The ten digit classes "0".."9" mapped to columns 0..9.
    pub fn digits() -> Self {
        Self::from_sorted(DIGIT_NAMES.iter().map(|s| s.to_string()).collect())
    }

    /// An encoder over an arbitrary class set.
    ///
    /// Identifiers are de-duplicated and sorted numerically when every one of
    /// them parses as an integer, lexicographically otherwise. Fails with
    /// [`Error::InvalidArgument`] on an empty class set.
    pub fn new<I, S>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        if classes.is_empty() {
            return Err(Error::invalid_argument(
                "label encoder needs at least one class",
            ));
        }
        let numeric: Option<Vec<i64>> = classes.iter().map(|c| c.parse().ok()).collect();
        match numeric {
            Some(_) => classes.sort_by_key(|c| c.parse::<i64>().unwrap_or_default()),
            None => classes.sort(),
        }
        classes.dedup();
        Ok(Self::from_sorted(classes))
    }

    fn from_sorted(classes: Vec<String>) -> Self {
        let index = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        LabelEncoder { classes, index }
    }

    /// Class identifiers in column order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Column of `label`, or [`Error::UnknownLabel`].
    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| Error::UnknownLabel {
                label: label.to_string(),
                known: self.classes.join(", "),
            })
    }

    /// One-hot encode a label sequence, keeping its order.
    ///
    /// The first label outside the class set aborts the whole encoding.
    pub fn encode<L: AsRef<str>>(&self, labels: &[L]) -> Result<OneHotLabels> {
        let indices = labels
            .iter()
            .map(|l| self.index_of(l.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        OneHotLabels::from_indices(&indices, self.num_classes())
    }

    /// Map one-hot rows back to their class identifiers.
    pub fn decode<'a>(&'a self, one_hot: &OneHotLabels) -> Result<Vec<&'a str>> {
        if one_hot.num_classes() != self.num_classes() {
            return Err(Error::invalid_argument(format!(
                "one-hot width {} does not match {} classes",
                one_hot.num_classes(),
                self.num_classes()
            )));
        }
        Ok((0..one_hot.len())
            .map(|i| self.classes[one_hot.class_index(i)].as_str())
            .collect())
    }
}

impl Default for LabelEncoder {
    fn default() -> Self {
        Self::digits()
    }
}

/// One-hot encode labels over the ten digit classes.
pub fn encode_labels<L: AsRef<str>>(labels: &[L]) -> Result<OneHotLabels> {
    LabelEncoder::digits().encode(labels)
}
