// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Timed determinant computation and result reporting.
//!
//! The result goes to the primary stream and the diagnostics (timing and
//! size) to a secondary one, so the primary output stays machine readable.

use crate::determinant::{calculate_determinant_with, DeterminantConfig};
use crate::matrix::Matrix;
use crate::Scalar;
use serde::{Serialize, Serializer};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of one determinant computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Computation {
    pub determinant: Scalar,
    pub size: usize,
    #[serde(rename = "calculation_time_us", serialize_with = "as_micros")]
    pub elapsed: Duration,
}

fn as_micros<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
}

/// Computes the determinant of a copy of `matrix`, leaving `matrix` untouched.
pub fn compute(matrix: &Matrix<Scalar>, config: &DeterminantConfig) -> Computation {
    compute_in_place(&mut matrix.duplicate(), config)
}

/// Computes the determinant of `matrix`, overwriting it with its LU factors.
pub fn compute_in_place(matrix: &mut Matrix<Scalar>, config: &DeterminantConfig) -> Computation {
    let size = matrix.size();
    let start = Instant::now();
    let determinant = calculate_determinant_with(matrix, config);
    let elapsed = start.elapsed();

    info!(size, ?elapsed, "determinant computed");
    Computation {
        determinant,
        size,
        elapsed,
    }
}

/// How the primary result line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// The bare value
    #[default]
    Plain,
    /// `Determinant: <value>`
    Labelled,
    /// A JSON document with the value, size and timing
    Json,
}

/// Writes results to a primary stream and diagnostics to a secondary stream.
pub struct Reporter<O: Write, E: Write> {
    out: O,
    diag: E,
    format: ReportFormat,
}

impl Reporter<io::Stdout, io::Stderr> {
    /// Reports on stdout, diagnostics on stderr.
    pub fn stdio(format: ReportFormat) -> Self {
        Self::new(io::stdout(), io::stderr(), format)
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, diag: E, format: ReportFormat) -> Self {
        Self { out, diag, format }
    }

    pub fn report(&mut self, computation: &Computation) -> io::Result<()> {
        match self.format {
            ReportFormat::Plain => {
                writeln!(self.out, "{}", format_scalar(computation.determinant))?
            }
            ReportFormat::Labelled => writeln!(
                self.out,
                "Determinant: {}",
                format_scalar(computation.determinant)
            )?,
            ReportFormat::Json => {
                serde_json::to_writer(&mut self.out, computation)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;

        writeln!(
            self.diag,
            "Calculation time: {} μs",
            computation.elapsed.as_micros()
        )?;
        writeln!(
            self.diag,
            "Matrix size: {}x{}",
            computation.size, computation.size
        )?;
        self.diag.flush()
    }

    /// Consumes the reporter, returning both streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.diag)
    }
}

/// Shortest round-trip rendering, switching to exponent form for very large
/// or very small magnitudes.
pub fn format_scalar(value: Scalar) -> String {
    let magnitude = value.abs();
    if value == 0.0 || !value.is_finite() || (1e-5..1e16).contains(&magnitude) {
        format!("{}", value)
    } else {
        format!("{:e}", value)
    }
}
