#![deny(clippy::all)]
#![forbid(unsafe_code)]

use clap::Parser;
use colored::Colorize;
use error_iter::ErrorIter as _;
use splice::{BudgetMode, DecodeOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Print the contents of .splice drum machine pattern files.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Pattern files to decode
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Reject files whose track data does not exactly fill the declared content length
    #[arg(long)]
    exact: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let budget_mode = if args.exact {
        BudgetMode::Exact
    } else {
        BudgetMode::Lenient
    };
    let options = DecodeOptions::default().with_budget_mode(budget_mode);

    let mut status = ExitCode::SUCCESS;
    for path in &args.files {
        if let Err(e) = dump(path, &options) {
            eprintln!("{} {}: {}", "error:".red(), path.display(), e);

            for cause in e.sources().skip(1) {
                eprintln!("{} {}", "caused by:".bright_red(), cause);
            }

            if let Some(tracks) = e.partial_tracks() {
                eprintln!("{} {} track(s) decoded", "partial:".yellow(), tracks.len());
                for track in tracks {
                    eprintln!("{}", track);
                }
            }

            status = ExitCode::FAILURE;
        }
    }

    status
}

fn dump(path: &Path, options: &DecodeOptions) -> Result<(), splice::Error> {
    let pattern = splice::decode_file_with(path, options)?;
    print!("{}", pattern);

    Ok(())
}
