// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Text loaders producing fully validated matrices.
//!
//! The text format is one row per line with whitespace separated values. The
//! dimension is the number of values on the first line and every one of the
//! following rows must carry exactly that many values. An empty input is a
//! `0 x 0` matrix. Lines after the last expected row are not read.
//!
//! Rows are collected as they are read and the matrix is only built once all
//! of them are present, so a large claimed dimension costs no memory until
//! the input actually supplies the values.

use crate::errors::{DeterminantError, DeterminantResult, FormatError};
use crate::matrix::Matrix;
use crate::Scalar;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, instrument};

/// Reads a matrix from a text file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_from_file(path: impl AsRef<Path>) -> DeterminantResult<Matrix<Scalar>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| DeterminantError::io(path, e))?;
    let matrix = parse_matrix(&text)?;
    debug!(size = matrix.size(), "matrix loaded");
    Ok(matrix)
}

/// Parses the textual matrix representation.
///
/// ```
/// use lu_determinant::reader::parse_matrix;
///
/// let m = parse_matrix("1 2\n3 4\n").unwrap();
/// assert_eq!(m.size(), 2);
/// assert_eq!(m[(1, 0)], 3.0);
/// ```
pub fn parse_matrix(text: &str) -> Result<Matrix<Scalar>, FormatError> {
    let mut lines = text.lines();

    let first = match lines.next() {
        Some(line) => parse_values(line, 1)?,
        None => return Ok(Matrix::new(0)),
    };
    let size = first.len();
    if size == 0 {
        return Ok(Matrix::new(0));
    }
    check_size(size)?;

    let mut rows = vec![first];
    for i in 1..size {
        let line = lines.next().ok_or(FormatError::NotEnoughRows {
            expected: size,
            found: i,
        })?;
        rows.push(parse_row(line, i + 1, size)?);
    }

    build(rows)
}

/// Prompts for a dimension and then for each row of the matrix.
///
/// Prompts go to `prompt`; answers are read line by line from `input`.
#[instrument(skip_all)]
pub fn read_from_user_input<R, W>(input: &mut R, prompt: &mut W) -> DeterminantResult<Matrix<Scalar>>
where
    R: BufRead,
    W: Write,
{
    write!(prompt, "Enter matrix size N: ")?;
    prompt.flush()?;

    let answer = read_answer(input)?;
    let size: usize = answer
        .trim()
        .parse()
        .map_err(|_| FormatError::InvalidSize {
            input: answer.trim().to_string(),
        })?;

    if size == 0 {
        return Ok(Matrix::new(0));
    }
    check_size(size)?;

    writeln!(prompt, "Enter {size}x{size} matrix elements row by row:")?;

    let mut rows = Vec::new();
    for i in 0..size {
        write!(prompt, "Row {}: ", i + 1)?;
        prompt.flush()?;

        let line = read_answer(input)?;
        rows.push(parse_row(&line, i + 1, size)?);
    }

    debug!(size, "matrix entered interactively");
    Ok(build(rows)?)
}

fn read_answer<R: BufRead>(input: &mut R) -> DeterminantResult<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(FormatError::UnexpectedEof.into());
    }
    Ok(line)
}

/// Parses one row and checks it holds exactly `size` values. `row` is 1-based.
fn parse_row(line: &str, row: usize, size: usize) -> Result<Vec<Scalar>, FormatError> {
    let values = parse_values(line, row)?;
    match values.len() {
        n if n < size => Err(FormatError::NotEnoughColumns {
            row,
            expected: size,
            found: n,
        }),
        n if n > size => Err(FormatError::TooManyValues {
            row,
            expected: size,
        }),
        _ => Ok(values),
    }
}

fn parse_values(line: &str, row: usize) -> Result<Vec<Scalar>, FormatError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<Scalar>().map_err(|_| FormatError::InvalidNumber {
                row,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Rejects dimensions whose element count does not fit in `usize`.
fn check_size(size: usize) -> Result<(), FormatError> {
    match size.checked_mul(size) {
        Some(_) => Ok(()),
        None => Err(FormatError::TooLarge { size }),
    }
}

fn build(rows: Vec<Vec<Scalar>>) -> Result<Matrix<Scalar>, FormatError> {
    let size = rows.len();
    Matrix::from_rows(rows).map_err(|_| FormatError::TooLarge { size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn interactive(input: &str) -> (DeterminantResult<Matrix>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut prompts = Vec::new();
        let result = read_from_user_input(&mut reader, &mut prompts);
        (result, String::from_utf8(prompts).unwrap())
    }

    #[test]
    fn test_parse_square_matrix() {
        let m = parse_matrix("1 2 3\n4.5 -5 6e1\n  7\t8 9  \n").unwrap();
        assert_eq!(
            Vec::<Vec<f64>>::from(m),
            vec![
                vec![1.0, 2.0, 3.0],
                vec![4.5, -5.0, 60.0],
                vec![7.0, 8.0, 9.0]
            ]
        );
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_matrix("").unwrap().size(), 0);
        assert_eq!(parse_matrix("\n1 2\n").unwrap().size(), 0);
    }

    #[test]
    fn test_parse_crlf_and_trailing_rows() {
        let m = parse_matrix("1 2\r\n3 4\r\nthis line is never read\r\n").unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_parse_not_enough_rows() {
        assert_eq!(
            parse_matrix("1 2 3\n4 5 6\n").unwrap_err(),
            FormatError::NotEnoughRows {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_parse_row_arity() {
        assert_eq!(
            parse_matrix("1 2\n3\n").unwrap_err(),
            FormatError::NotEnoughColumns {
                row: 2,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            parse_matrix("1 2\n3 4 5\n").unwrap_err(),
            FormatError::TooManyValues {
                row: 2,
                expected: 2
            }
        );
    }

    #[test]
    fn test_parse_invalid_number() {
        assert_eq!(
            parse_matrix("1 2\n3 x4\n").unwrap_err(),
            FormatError::InvalidNumber {
                row: 2,
                token: "x4".to_string()
            }
        );
    }

    #[test]
    fn test_interactive_reads_rows() {
        let (result, prompts) = interactive("2\n1 2\n3 4\n");
        let m = result.unwrap();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            prompts,
            "Enter matrix size N: Enter 2x2 matrix elements row by row:\nRow 1: Row 2: "
        );
    }

    #[test]
    fn test_interactive_oversized_dimension() {
        let (result, prompts) = interactive("5000000000\n1\n");
        assert!(matches!(
            result,
            Err(DeterminantError::Format(FormatError::TooLarge { size: 5_000_000_000 }))
        ));
        assert_eq!(prompts, "Enter matrix size N: ");

        // Claimed size is only backed by the rows actually typed
        let (result, _) = interactive("100000\n1 2\n");
        assert!(matches!(
            result,
            Err(DeterminantError::Format(FormatError::NotEnoughColumns {
                row: 1,
                expected: 100000,
                found: 2
            }))
        ));
    }

    #[test]
    fn test_parse_wide_first_line_without_rows() {
        let first_line = vec!["1"; 100_000].join(" ");
        assert_eq!(
            parse_matrix(&first_line).unwrap_err(),
            FormatError::NotEnoughRows {
                expected: 100_000,
                found: 1
            }
        );
    }

    #[test]
    fn test_interactive_zero_size() {
        let (result, prompts) = interactive("0\n");
        assert!(result.unwrap().is_empty());
        assert_eq!(prompts, "Enter matrix size N: ");
    }

    #[test]
    fn test_interactive_errors() {
        let (result, _) = interactive("two\n");
        assert!(matches!(
            result,
            Err(DeterminantError::Format(FormatError::InvalidSize { ref input })) if input == "two"
        ));

        let (result, _) = interactive("2\n1 2 3\n");
        assert!(matches!(
            result,
            Err(DeterminantError::Format(FormatError::TooManyValues { row: 1, expected: 2 }))
        ));

        let (result, _) = interactive("2\n1 2\n3\n");
        assert!(matches!(
            result,
            Err(DeterminantError::Format(FormatError::NotEnoughColumns { row: 2, .. }))
        ));

        let (result, _) = interactive("2\n1 2\n");
        assert!(matches!(
            result,
            Err(DeterminantError::Format(FormatError::UnexpectedEof))
        ));

        let (result, _) = interactive("");
        assert!(matches!(
            result,
            Err(DeterminantError::Format(FormatError::UnexpectedEof))
        ));
    }
}
