//! Command-line front end for the `rapport` binary.
//!
//! Kept in the library so argument parsing and command output can be
//! tested without spawning a process.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use parser::{Cli, Commands, OutputFormat};

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Some(Commands::Score(args)) => commands::score::cmd_score(args),
        Some(Commands::Annotate(args)) => commands::annotate::cmd_annotate(args),
        Some(Commands::Render(args)) => commands::render::cmd_render(args),
        None => {
            // Bare text scores it, like `rapport score <text>`.
            if cli.text.is_empty() {
                return Err("No input provided. Run `rapport --help` for usage.".to_string());
            }
            commands::score::cmd_score(commands::ScoreArgs {
                input: parser::InputArgs {
                    text: Some(cli.text.join(" ")),
                    ..parser::InputArgs::default()
                },
                ..commands::ScoreArgs::default()
            })
        }
    }
}
