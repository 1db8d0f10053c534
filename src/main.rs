mod convert;
mod error;
mod input;
mod metrics;
mod pipeline;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::EvalError;

#[derive(Debug, Parser)]
#[command(
    name = "drp-eval",
    version,
    about = "Convert drug-response prediction bundles and aggregate accuracy metrics"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert serialized result bundles into prediction CSV tables.
    Convert {
        /// Directory containing the bundle files.
        path: PathBuf,
        /// Directory where the CSV files are written.
        conv_path: PathBuf,
    },
    /// Compute aggregate metrics over prediction CSV files.
    Metrics {
        /// Prediction file, or directory whose direct children are runs.
        /// Each path is processed and reported independently.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Persist the per-run raw metric values as <path>_metrics.json.
        #[arg(long, alias = "save_metrics")]
        save_metrics: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), EvalError> {
    match cli.command {
        Command::Convert { path, conv_path } => convert::convert(&path, &conv_path),
        Command::Metrics {
            paths,
            save_metrics,
        } => {
            for path in &paths {
                pipeline::process_predictions(path, save_metrics)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
