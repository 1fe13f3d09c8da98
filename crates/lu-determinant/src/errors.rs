// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for matrix loading and determinant tooling.
//!
//! The elimination itself never fails: a singular matrix is reported as a zero
//! determinant. Everything in here belongs to the layers around it (loaders,
//! matrix construction from untrusted rows and the test-matrix generator).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum DeterminantError {
    /// The textual matrix representation was malformed
    #[error("Invalid matrix format: {0}")]
    Format(#[from] FormatError),

    /// Matrix construction errors
    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// Generator parameter errors
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// A file could not be opened, read or written
    #[error("Cannot access file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A terminal stream failed
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),
}

/// Result type alias for this crate.
pub type DeterminantResult<T> = Result<T, DeterminantError>;

/// Format errors raised by the file and interactive loaders.
///
/// Rows are reported 1-based, the way a user counts lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("not enough rows: expected {expected}, found {found}")]
    NotEnoughRows { expected: usize, found: usize },

    #[error("not enough numbers in row {row}: expected {expected}, found {found}")]
    NotEnoughColumns {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("too many numbers in row {row}: expected {expected}")]
    TooManyValues { row: usize, expected: usize },

    #[error("invalid number '{token}' in row {row}")]
    InvalidNumber { row: usize, token: String },

    #[error("invalid matrix size '{input}'")]
    InvalidSize { input: String },

    #[error("matrix size {size} is too large")]
    TooLarge { size: usize },

    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// Errors building a [`crate::Matrix`] from caller supplied data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Row count and column count disagree, or rows are ragged
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },

    /// `size * size` elements cannot be allocated
    #[error("Matrix of size {size}x{size} is too large to allocate")]
    TooLarge { size: usize },
}

/// Invalid parameters for the test-matrix generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("target determinant must be finite, got {0}")]
    NonFiniteDeterminant(f64),

    #[error("generated determinant {actual} does not match the requested {expected}")]
    VerificationFailed { expected: f64, actual: f64 },
}

impl DeterminantError {
    /// Create an I/O error attached to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeterminantError::Io {
            path: path.into(),
            source,
        }
    }
}

impl MatrixError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize, context: impl Into<String>) -> Self {
        MatrixError::DimensionMismatch {
            expected,
            actual,
            context: context.into(),
        }
    }
}
