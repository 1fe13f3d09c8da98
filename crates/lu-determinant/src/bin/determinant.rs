// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Determinant calculator CLI
//!
//! With a file argument the matrix is read from that file and the bare
//! determinant is printed. Without one the matrix is entered interactively.
//! Timing and size diagnostics always go to stderr.

use clap::{ArgAction, Parser};
use lu_determinant::reader::{read_from_file, read_from_user_input};
use lu_determinant::report::{compute_in_place, ReportFormat, Reporter};
use lu_determinant::telemetry::{log_level, setup_simple_tracing};
use lu_determinant::{
    DeterminantConfig, DeterminantResult, ThresholdMode, DEFAULT_SINGULARITY_THRESHOLD,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Calculate the determinant of a square matrix using LU decomposition with partial pivoting.",
    after_help = "Without FILE the matrix size and rows are read interactively from stdin.\nUsing f64 precision with partial pivoting LU decomposition."
)]
struct Args {
    /// Matrix file: one row per line, whitespace separated values
    file: Option<PathBuf>,

    /// Pivots smaller than this in magnitude mark the matrix as singular
    #[arg(long, default_value_t = DEFAULT_SINGULARITY_THRESHOLD)]
    threshold: f64,

    /// Scale the threshold by the largest absolute entry of the matrix
    #[arg(long, default_value_t = false)]
    relative: bool,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors. Cannot be used alongside `-v`
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn config(&self) -> DeterminantConfig {
        DeterminantConfig {
            threshold: self.threshold,
            mode: if self.relative {
                ThresholdMode::Relative
            } else {
                ThresholdMode::Absolute
            },
        }
    }

    fn format(&self) -> ReportFormat {
        match (self.json, &self.file) {
            (true, _) => ReportFormat::Json,
            (false, Some(_)) => ReportFormat::Plain,
            (false, None) => ReportFormat::Labelled,
        }
    }
}

fn main() {
    let args = Args::parse();
    setup_simple_tracing(log_level(args.verbose, args.quiet));

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> DeterminantResult<()> {
    let config = args.config();

    let mut matrix = match &args.file {
        Some(path) => read_from_file(path)?,
        None => {
            let stdin = std::io::stdin();
            read_from_user_input(&mut stdin.lock(), &mut std::io::stdout())?
        }
    };
    debug!("input matrix {}", matrix);

    let computation = compute_in_place(&mut matrix, &config);
    Reporter::stdio(args.format()).report(&computation)?;

    Ok(())
}
