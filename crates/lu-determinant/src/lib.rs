// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Dense matrix determinants via LU decomposition with partial pivoting.
//!
//! The core is two pieces: [`Matrix`], an owned square row-major buffer, and
//! [`calculate_determinant`], which eliminates that buffer in place and
//! returns the product of the pivots with the sign of the row permutation.
//!
//! ## Elimination
//!
//! For each column `k` the row with the largest `|a[i][k]|` (`i >= k`) is
//! swapped into place, its value becomes the pivot and the rows below are
//! reduced by `a[i][k] / pivot`. The multipliers are stored where the zeros
//! would appear, leaving `L` and `U` packed in the matrix. A pivot whose
//! magnitude falls below the singularity threshold ends the elimination with
//! a determinant of exactly zero.
//!
//! ## Around the core
//!
//! [`reader`] turns text into validated matrices, [`report`] times a
//! computation and writes the result, and [`generator`] builds random
//! matrices with a known determinant for testing.

pub mod determinant;
pub mod errors;
pub mod generator;
pub mod matrix;
pub mod reader;
pub mod report;
pub mod telemetry;

/// Scalar type used by the loaders, the reporter and the binaries.
pub type Scalar = f64;

// Re-export commonly used types for convenience
pub use determinant::{
    calculate_determinant, calculate_determinant_with, DeterminantConfig, ThresholdMode,
    DEFAULT_SINGULARITY_THRESHOLD,
};
pub use errors::{DeterminantError, DeterminantResult, FormatError, GeneratorError, MatrixError};
pub use matrix::Matrix;
