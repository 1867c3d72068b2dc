//! CLI argument parsing and structure definitions

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Journal text analysis: sentiment scores and person highlighting
#[derive(Parser, Debug)]
#[command(name = "rapport")]
#[command(
    author,
    version,
    about = "Journal text analysis: sentiment scores and person highlighting",
    long_about = r##"
rapport - sentiment scoring and person-mention annotation for journal text

COMMANDS:
  score     - valence in [-1, 1] with a positive/neutral/negative label
  annotate  - spans for known people (from a roster) and candidate names
  render    - HTML markup with highlighted people

ROSTER FORMAT (--roster):
  [{"id": 1, "name": "Alice", "color": "#ff0000"}, {"id": "b7", "name": "Bob"}]

EXAMPLES:
  rapport "Today was really great!"
  rapport score --explain -t "I am not happy"
  rapport annotate --roster people.json -f entry.txt --format json
  echo "Alice met Bob" | rapport render --roster people.json
"##
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Text to score (shorthand for `rapport score`)
    #[arg(trailing_var_arg = true)]
    pub text: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score the sentiment of a text
    #[command(visible_alias = "s")]
    Score(crate::cli::commands::ScoreArgs),

    /// Find known and candidate people in a text
    #[command(visible_alias = "a")]
    Annotate(crate::cli::commands::AnnotateArgs),

    /// Render a text as highlighted markup
    #[command(visible_alias = "r")]
    Render(crate::cli::commands::RenderArgs),
}

/// Where the input text comes from. Falls back to stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Input text to process
    #[arg(short, long)]
    pub text: Option<String>,

    /// Read input from file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<String>,

    /// Positional text argument
    #[arg(trailing_var_arg = true)]
    pub positional: Vec<String>,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}
