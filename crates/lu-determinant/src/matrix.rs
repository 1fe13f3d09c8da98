// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Square matrix storage.

use crate::errors::MatrixError;
use num_traits::Float;
use std::fmt;
use std::ops::{Index, IndexMut};

/// A dense square matrix stored as one contiguous row-major buffer.
///
/// The buffer always holds exactly `size * size` elements. A matrix cannot be
/// resized in place; build a new one and replace the old value instead.
///
/// # Example
///
/// ```
/// use lu_determinant::Matrix;
///
/// let mut m = Matrix::<f64>::new(2);
/// m[(0, 0)] = 1.0;
/// m[(1, 1)] = 4.0;
/// m.swap_rows(0, 1);
/// assert_eq!(m[(0, 1)], 4.0);
/// assert_eq!(m.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Float = f64> {
    data: Vec<T>,
    size: usize,
}

impl<T: Float> Matrix<T> {
    /// Creates a zero-filled `n x n` matrix. `n == 0` gives an empty matrix.
    pub fn new(n: usize) -> Self {
        Self {
            data: vec![T::zero(); n * n],
            size: n,
        }
    }

    /// Creates a zero-filled `n x n` matrix without panicking on huge `n`.
    ///
    /// # Errors
    ///
    /// Returns an error if `n * n` overflows or the buffer cannot be reserved.
    pub fn try_new(n: usize) -> Result<Self, MatrixError> {
        let mut data = allocate(n)?;
        data.resize(n * n, T::zero());
        Ok(Self { data, size: n })
    }

    /// Creates the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Creates a matrix from nested rows, validating that they form a square.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of rows differs from the length of any row.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(MatrixError::dimension_mismatch(
                size,
                row.len(),
                format!("columns in row {}", i),
            ));
        }

        let mut data = allocate(size)?;
        for row in rows {
            data.extend(row);
        }

        Ok(Self { data, size })
    }

    /// Returns the dimension of the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` for the `0 x 0` matrix.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the element at `(i, j)`, or `None` when out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.size && j < self.size {
            self.data.get(i * self.size + j)
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at `(i, j)`, or `None` when out of range.
    pub fn get_mut(&mut self, i: usize, j: usize) -> Option<&mut T> {
        if i < self.size && j < self.size {
            self.data.get_mut(i * self.size + j)
        } else {
            None
        }
    }

    /// Writes `value` at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self[(i, j)] = value;
    }

    /// Exchanges rows `i` and `j` in place. A no-op when `i == j`.
    ///
    /// # Panics
    ///
    /// Panics if either row is out of range.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        self.check_row(i);
        self.check_row(j);
        if i == j {
            return;
        }

        let n = self.size;
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let (head, tail) = self.data.split_at_mut(hi * n);
        head[lo * n..(lo + 1) * n].swap_with_slice(&mut tail[..n]);
    }

    /// Returns an independent deep copy of this matrix.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Moves the contents out, leaving `self` as an empty `0 x 0` matrix.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Iterates over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.data.chunks(self.size.max(1))
    }

    /// Returns the row-major buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Largest absolute value over all entries, zero for an empty matrix.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, value| acc.max(value.abs()))
    }

    #[inline]
    fn index_of(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.size && j < self.size,
            "index ({}, {}) out of bounds for {}x{} matrix",
            i,
            j,
            self.size,
            self.size
        );
        i * self.size + j
    }

    #[inline]
    fn check_row(&self, i: usize) {
        assert!(
            i < self.size,
            "row {} out of bounds for {}x{} matrix",
            i,
            self.size,
            self.size
        );
    }
}

/// Reserves room for `n * n` elements.
fn allocate<T>(n: usize) -> Result<Vec<T>, MatrixError> {
    let len = n.checked_mul(n).ok_or(MatrixError::TooLarge { size: n })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| MatrixError::TooLarge { size: n })?;
    Ok(data)
}

impl<T: Float> Default for Matrix<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Float> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[self.index_of(i, j)]
    }
}

impl<T: Float> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        let idx = self.index_of(i, j);
        &mut self.data[idx]
    }
}

impl<T: Float> From<Matrix<T>> for Vec<Vec<T>> {
    fn from(matrix: Matrix<T>) -> Self {
        matrix.rows().map(<[T]>::to_vec).collect()
    }
}

impl<T: Float + fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.size, self.size)?;

        let width = self
            .data
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);

        for row in self.rows() {
            write!(f, "\n  [")?;
            for (j, val) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:>width$}", val.to_string(), width = width)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
