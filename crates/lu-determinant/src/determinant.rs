// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Determinant via in-place LU decomposition with partial pivoting.
//!
//! The elimination overwrites the caller's matrix: on return the upper
//! triangle holds `U`, the strict lower triangle holds the multipliers of `L`
//! and the rows are permuted by the pivoting. Duplicate the matrix first if
//! the original values are still needed (see [`crate::report::compute`]).

use crate::matrix::Matrix;
use num_traits::Float;
use tracing::{debug, trace};

/// Pivots with an absolute value below this are treated as zero.
pub const DEFAULT_SINGULARITY_THRESHOLD: f64 = 1e-15;

/// How the singularity threshold is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    /// Compare pivots against the threshold directly.
    #[default]
    Absolute,
    /// Scale the threshold by the largest absolute entry of the input matrix.
    Relative,
}

/// Configuration for determinant calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeterminantConfig {
    /// Singularity threshold
    pub threshold: f64,
    /// Whether the threshold is absolute or relative to the matrix scale
    pub mode: ThresholdMode,
}

impl Default for DeterminantConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SINGULARITY_THRESHOLD,
            mode: ThresholdMode::Absolute,
        }
    }
}

impl DeterminantConfig {
    fn tolerance<T: Float>(&self, matrix: &Matrix<T>) -> T {
        let threshold = T::from(self.threshold).unwrap_or_else(T::min_positive_value);
        match self.mode {
            ThresholdMode::Absolute => threshold,
            ThresholdMode::Relative => threshold * matrix.max_abs(),
        }
    }
}

/// Computes the determinant of `matrix` with the default absolute threshold.
///
/// The matrix is left in its LU-factored, row-permuted state.
///
/// ```
/// use lu_determinant::{calculate_determinant, Matrix};
///
/// let mut m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(calculate_determinant(&mut m), -2.0);
/// ```
pub fn calculate_determinant<T: Float>(matrix: &mut Matrix<T>) -> T {
    calculate_determinant_with(matrix, &DeterminantConfig::default())
}

/// Computes the determinant of `matrix` using the given singularity settings.
///
/// A numerically singular matrix yields exactly zero. Elimination stops at the
/// first column whose pivot falls below the tolerance, so the matrix may be
/// only partially factored in that case.
pub fn calculate_determinant_with<T: Float>(
    matrix: &mut Matrix<T>,
    config: &DeterminantConfig,
) -> T {
    let n = matrix.size();

    if n == 0 {
        return T::one();
    }
    if n == 1 {
        return matrix[(0, 0)];
    }

    let tolerance = config.tolerance(matrix);

    // permutation[k] is the original index of the row now at position k
    let mut permutation: Vec<usize> = (0..n).collect();
    let mut det = T::one();
    let mut sign = T::one();

    for k in 0..n {
        // First row holding the largest |a[i][k]| wins
        let mut pivot_row = k;
        let mut max_val = matrix[(k, k)].abs();
        for i in (k + 1)..n {
            let val = matrix[(i, k)].abs();
            if val > max_val {
                max_val = val;
                pivot_row = i;
            }
        }

        if pivot_row != k {
            matrix.swap_rows(k, pivot_row);
            permutation.swap(k, pivot_row);
            sign = -sign;
            trace!(column = k, pivot_row, "swapped pivot row");
        }

        let pivot_val = matrix[(k, k)];
        if pivot_val.abs() < tolerance || pivot_val.is_zero() {
            debug!(column = k, size = n, "matrix is numerically singular");
            return T::zero();
        }

        det = det * pivot_val;

        for i in (k + 1)..n {
            let factor = matrix[(i, k)] / pivot_val;
            matrix[(i, k)] = factor;

            for j in (k + 1)..n {
                let ukj = matrix[(k, j)];
                matrix[(i, j)] = matrix[(i, j)] - factor * ukj;
            }
        }
    }

    debug!(size = n, ?permutation, "elimination finished");
    det * sign
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matrix(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn det(m: &Matrix) -> f64 {
        calculate_determinant(&mut m.duplicate())
    }

    fn assert_close(actual: f64, expected: f64) {
        let tol = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_matrix_is_one() {
        assert_eq!(calculate_determinant(&mut Matrix::<f64>::new(0)), 1.0);
    }

    #[test]
    fn test_single_element() {
        assert_eq!(det(&matrix(&[&[5.0]])), 5.0);
        // No singularity check for 1x1
        assert_eq!(det(&matrix(&[&[1e-20]])), 1e-20);
    }

    #[test]
    fn test_two_by_two() {
        assert_eq!(det(&matrix(&[&[1.0, 2.0], &[3.0, 4.0]])), -2.0);
    }

    #[test]
    fn test_diagonal() {
        let m = matrix(&[&[2.0, 0.0, 0.0], &[0.0, 3.0, 0.0], &[0.0, 0.0, 4.0]]);
        assert_eq!(det(&m), 24.0);
    }

    #[test]
    fn test_singular_returns_exact_zero() {
        let m = matrix(&[&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], &[7.0, 8.0, 9.0]]);
        assert_eq!(det(&m), 0.0);
    }

    #[test]
    fn test_identity() {
        for n in 0..12 {
            assert_eq!(det(&Matrix::identity(n)), 1.0, "identity of size {n}");
        }
    }

    #[test]
    fn test_zero_row_and_duplicate_rows() {
        let zero_row = matrix(&[&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0], &[4.0, 5.0, 6.0]]);
        assert_eq!(det(&zero_row), 0.0);

        let same_rows = matrix(&[&[1.0, 5.0, 3.0], &[2.0, 7.0, 1.0], &[1.0, 5.0, 3.0]]);
        assert_eq!(det(&same_rows), 0.0);
    }

    #[test]
    fn test_triangular_is_diagonal_product() {
        let upper = matrix(&[&[2.0, 7.0, -1.0], &[0.0, -3.0, 4.0], &[0.0, 0.0, 0.5]]);
        assert_close(det(&upper), -3.0);

        let lower = matrix(&[&[1.5, 0.0, 0.0], &[2.0, 4.0, 0.0], &[-6.0, 9.0, 2.0]]);
        assert_close(det(&lower), 12.0);
    }

    #[test]
    fn test_leaves_lu_factors_in_place() {
        let mut m = matrix(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let d = calculate_determinant(&mut m);
        assert_eq!(d, -2.0);
        // Rows swapped, multiplier 1/3 stored below the diagonal
        assert_eq!(m[(0, 0)], 3.0);
        assert_eq!(m[(0, 1)], 4.0);
        assert_eq!(m[(1, 0)], 1.0 / 3.0);
        assert_eq!(m[(1, 1)], 2.0 - (1.0 / 3.0) * 4.0);
    }

    #[test]
    fn test_duplicate_leaves_original_untouched() {
        let original = matrix(&[&[4.0, 3.0, 2.0], &[1.0, 3.0, 1.0], &[2.0, 1.0, 5.0]]);
        let snapshot: Vec<u64> = original.as_slice().iter().map(|v| v.to_bits()).collect();

        let mut copy = original.duplicate();
        calculate_determinant(&mut copy);

        let after: Vec<u64> = original.as_slice().iter().map(|v| v.to_bits()).collect();
        assert_eq!(snapshot, after);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_pivot_tie_keeps_first_row() {
        // |2| ties with |-2|, the current row stays so no sign flip happens
        let mut m = matrix(&[&[2.0, 1.0], &[-2.0, 3.0]]);
        assert_eq!(calculate_determinant(&mut m), 8.0);
        assert_eq!(m[(0, 1)], 1.0);
    }

    #[test]
    fn test_relative_threshold() {
        // Tiny but well conditioned: absolute mode calls it singular
        let tiny = matrix(&[&[1e-16, 0.0], &[0.0, 1e-16]]);
        assert_eq!(det(&tiny), 0.0);

        let relative = DeterminantConfig {
            threshold: 1e-12,
            mode: ThresholdMode::Relative,
        };
        let d = calculate_determinant_with(&mut tiny.duplicate(), &relative);
        assert!((d - 1e-32).abs() < 1e-40, "got {d}");

        // Huge entries with a near dependent row: only relative mode sees it
        let huge = matrix(&[&[1e20, 1e20], &[1e20, 1e20 + 1e4]]);
        assert_eq!(calculate_determinant_with(&mut huge.duplicate(), &relative), 0.0);
    }

    #[test]
    fn test_all_zero_matrix_in_relative_mode() {
        let relative = DeterminantConfig {
            threshold: 1e-12,
            mode: ThresholdMode::Relative,
        };
        let mut zeros = Matrix::<f64>::new(3);
        assert_eq!(calculate_determinant_with(&mut zeros, &relative), 0.0);
    }

    #[test]
    fn test_f32_matrix() {
        let mut m = Matrix::<f32>::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let d = calculate_determinant(&mut m);
        assert!((d + 2.0).abs() < 1e-5, "got {d}");
    }

    fn arb_matrix(max: usize) -> impl Strategy<Value = Matrix> {
        (2..=max).prop_flat_map(|n| {
            prop::collection::vec(-10i32..=10, n * n).prop_map(move |values| {
                let rows: Vec<Vec<f64>> = values
                    .chunks(n)
                    .map(|r| r.iter().map(|&v| v as f64).collect())
                    .collect();
                Matrix::from_rows(rows).unwrap()
            })
        })
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-7 * a.abs().max(b.abs()).max(1.0)
    }

    proptest! {
        #[test]
        fn swapping_rows_negates(m in arb_matrix(6), a in 0usize..6, b in 0usize..6) {
            let n = m.size();
            let (a, b) = (a % n, b % n);
            prop_assume!(a != b);

            let mut swapped = m.duplicate();
            swapped.swap_rows(a, b);
            let (d, ds) = (det(&m), det(&swapped));
            prop_assert!(close(ds, -d), "det {} vs swapped {}", d, ds);
        }

        #[test]
        fn scaling_row_scales(m in arb_matrix(6), row in 0usize..6, c in -4i32..=4) {
            let n = m.size();
            let row = row % n;
            let c = c as f64;

            let mut scaled = m.duplicate();
            for j in 0..n {
                scaled[(row, j)] = scaled[(row, j)] * c;
            }
            let (d, dc) = (det(&m), det(&scaled));
            prop_assert!(close(dc, c * d), "det {} * {} vs scaled {}", d, c, dc);
        }

        #[test]
        fn copied_row_is_singular(m in arb_matrix(6), src in 0usize..6, dst in 0usize..6) {
            let n = m.size();
            let (src, dst) = (src % n, dst % n);
            prop_assume!(src != dst);

            let mut dup = m.duplicate();
            for j in 0..n {
                dup[(dst, j)] = dup[(src, j)];
            }
            prop_assert_eq!(det(&dup), 0.0);
        }

        #[test]
        fn upper_triangular_is_diagonal_product(
            diag in prop::collection::vec(1i32..=5, 2..7),
            fill in -5i32..=5,
        ) {
            let n = diag.len();
            let mut m = Matrix::new(n);
            let mut expected = 1.0;
            for i in 0..n {
                m[(i, i)] = diag[i] as f64;
                expected *= diag[i] as f64;
                for j in (i + 1)..n {
                    m[(i, j)] = fill as f64;
                }
            }
            prop_assert!(close(det(&m), expected));
        }
    }
}
