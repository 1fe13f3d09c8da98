// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Random test matrices with a prescribed determinant.
//!
//! Generation starts from a diagonal matrix whose entries multiply to the
//! target and then mixes it with determinant preserving row operations, so
//! the result is dense but its determinant is known up to rounding.

use crate::determinant::{calculate_determinant, DEFAULT_SINGULARITY_THRESHOLD};
use crate::errors::{DeterminantError, DeterminantResult, GeneratorError};
use crate::matrix::Matrix;
use crate::Scalar;
use rand::seq::index::sample;
use rand::Rng;
use std::f64::consts::TAU;
use std::io::Write;
use std::path::Path;
use tracing::{debug, trace};

/// Minimum number of mixing operations applied to a generated matrix.
pub const MIN_OPERATIONS: usize = 15;

/// Configuration for matrix generation
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Dimension of the generated matrix
    pub size: usize,
    /// Target determinant
    pub determinant: Scalar,
}

impl GeneratorConfig {
    /// Number of mixing operations: `max(15, 2 * size)`.
    pub fn operations(&self) -> usize {
        MIN_OPERATIONS.max(self.size * 2)
    }
}

#[derive(Debug, Clone, Copy)]
enum Mixing {
    RowAddition,
    CompensatedScaling,
    Rotation,
}

/// Generates a random `size x size` matrix whose determinant is `determinant`.
///
/// # Errors
///
/// Returns an error if the target determinant is not finite.
pub fn generate_matrix<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> DeterminantResult<Matrix<Scalar>> {
    let target = config.determinant;
    if !target.is_finite() {
        return Err(GeneratorError::NonFiniteDeterminant(target).into());
    }

    let n = config.size;
    match n {
        0 => return Ok(Matrix::new(0)),
        1 => {
            let mut m = Matrix::new(1);
            m[(0, 0)] = target;
            return Ok(m);
        }
        _ => {}
    }

    let mut matrix = initial_matrix(n, target, rng);

    for _ in 0..config.operations() {
        let op = match rng.gen_range(0..3) {
            0 => Mixing::RowAddition,
            1 => Mixing::CompensatedScaling,
            _ => Mixing::Rotation,
        };
        let pair = sample(rng, n, 2);
        let (i, j) = (pair.index(0), pair.index(1));
        trace!(?op, i, j, "mixing rows");

        match op {
            Mixing::RowAddition => {
                let c = rng.gen_range(-2.0..=2.0);
                for k in 0..n {
                    matrix[(i, k)] += c * matrix[(j, k)];
                }
            }
            Mixing::CompensatedScaling => {
                let s = rng.gen_range(0.3..=3.0);
                for k in 0..n {
                    matrix[(i, k)] *= s;
                    matrix[(j, k)] /= s;
                }
            }
            Mixing::Rotation => {
                let (sin, cos) = rng.gen_range(0.0..TAU).sin_cos();
                for k in 0..n {
                    let (a, b) = (matrix[(i, k)], matrix[(j, k)]);
                    matrix[(i, k)] = cos * a - sin * b;
                    matrix[(j, k)] = sin * a + cos * b;
                }
            }
        }
    }

    Ok(adjust_to_determinant(matrix, target, rng))
}

/// Diagonal matrix with entries of magnitude `|target|^(1/n)` whose signs
/// multiply to the sign of `target`.
fn initial_matrix<R: Rng + ?Sized>(n: usize, target: Scalar, rng: &mut R) -> Matrix<Scalar> {
    let mut m = Matrix::identity(n);

    if target.abs() < DEFAULT_SINGULARITY_THRESHOLD {
        m[(0, 0)] = 0.0;
        return m;
    }

    let base = target.abs().powf(1.0 / n as Scalar);
    let mut signs: Vec<Scalar> = (0..n)
        .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
        .collect();
    if signs.iter().product::<Scalar>() != target.signum() {
        signs[0] = -signs[0];
    }

    for (i, sign) in signs.into_iter().enumerate() {
        m[(i, i)] = base * sign;
    }
    m
}

/// Rescales the matrix to remove the rounding drift accumulated while mixing.
fn adjust_to_determinant<R: Rng + ?Sized>(
    matrix: Matrix<Scalar>,
    target: Scalar,
    rng: &mut R,
) -> Matrix<Scalar> {
    let n = matrix.size();
    let current = calculate_determinant(&mut matrix.duplicate());

    if current.abs() < DEFAULT_SINGULARITY_THRESHOLD {
        if target.abs() < DEFAULT_SINGULARITY_THRESHOLD {
            return matrix;
        }
        debug!(current, target, "mixed matrix collapsed, starting over");
        return initial_matrix(n, target, rng);
    }

    let ratio = target / current;
    if ratio <= 0.0 {
        return matrix;
    }

    let scale = ratio.powf(1.0 / n as Scalar);
    let mut matrix = matrix;
    for i in 0..n {
        for j in 0..n {
            matrix[(i, j)] *= scale;
        }
    }
    matrix
}

/// Checks that `matrix` has the `expected` determinant within a relative `tolerance`.
///
/// A `0 x 0` matrix only verifies against a target that is zero within
/// `tolerance`, which is what `generate_matrix` produces for size 0.
pub fn verify_determinant(
    matrix: &Matrix<Scalar>,
    expected: Scalar,
    tolerance: Scalar,
) -> Result<Scalar, GeneratorError> {
    if matrix.is_empty() {
        return if expected.abs() < tolerance {
            Ok(expected)
        } else {
            Err(GeneratorError::VerificationFailed {
                expected,
                actual: calculate_determinant(&mut matrix.duplicate()),
            })
        };
    }

    let actual = calculate_determinant(&mut matrix.duplicate());
    if (actual - expected).abs() <= tolerance * expected.abs().max(1.0) {
        Ok(actual)
    } else {
        Err(GeneratorError::VerificationFailed { expected, actual })
    }
}

/// Writes `matrix` in the loader's text format: space separated values, rows
/// separated by newlines, no trailing newline. An empty matrix writes nothing.
pub fn write_matrix<W: Write>(matrix: &Matrix<Scalar>, writer: &mut W) -> std::io::Result<()> {
    for (i, row) in matrix.rows().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(writer, "{}", line)?;
    }
    writer.flush()
}

/// Writes `matrix` to a file at `path`.
pub fn save_matrix(matrix: &Matrix<Scalar>, path: impl AsRef<Path>) -> DeterminantResult<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path).map_err(|e| DeterminantError::io(path, e))?;
    write_matrix(matrix, &mut file).map_err(|e| DeterminantError::io(path, e))
}
