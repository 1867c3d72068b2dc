//! rapport - sentiment scoring and person highlighting for journal text.

use clap::Parser;
use std::process::ExitCode;

use rapport::cli::output::color;
use rapport::cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
