// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Test matrix generator CLI
//!
//! Writes a random dense matrix with a requested determinant in the format
//! accepted by the `determinant` binary.

use clap::{ArgAction, Parser};
use lu_determinant::generator::{
    generate_matrix, save_matrix, verify_determinant, write_matrix, GeneratorConfig,
};
use lu_determinant::telemetry::{log_level, setup_simple_tracing};
use lu_determinant::DeterminantResult;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Generate a random N x N matrix with a given determinant.")]
struct Args {
    /// Matrix size N
    #[arg(long, short = 'n')]
    size: usize,

    /// Target determinant D
    #[arg(long, short = 'd', allow_negative_numbers = true)]
    determinant: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output file. Defaults to `matrix_<N>_<D>.txt`; use `-` for stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Relative tolerance when checking the generated determinant
    #[arg(long, default_value_t = 1e-7)]
    tolerance: f64,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    setup_simple_tracing(log_level(args.verbose, false));

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> DeterminantResult<()> {
    let config = GeneratorConfig {
        size: args.size,
        determinant: args.determinant,
    };

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    eprintln!(
        "Generating {}x{} matrix with determinant {}...",
        config.size, config.size, config.determinant
    );
    let matrix = generate_matrix(&config, &mut rng)?;
    let actual = verify_determinant(&matrix, config.determinant, args.tolerance)?;
    eprintln!("Success: matrix generated, determinant {}", actual);

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "matrix_{}_{:.2}.txt",
            config.size, config.determinant
        ))
    });

    if output.as_os_str() == "-" {
        let mut stdout = std::io::stdout();
        write_matrix(&matrix, &mut stdout)?;
        println!();
    } else {
        save_matrix(&matrix, &output)?;
        info!(path = %output.display(), "matrix written");
        eprintln!("Matrix written to {}", output.display());
    }

    Ok(())
}
