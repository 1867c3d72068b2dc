//! Output formatting utilities for CLI commands

use crate::sentiment::LABEL_THRESHOLD;
use is_terminal::IsTerminal;
use std::io::{self, Write};

/// Format error message for display
pub fn format_error(operation: &str, details: &str) -> String {
    format!("{} - {}", operation, details)
}

/// Log info message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content).map_err(|e| format_error("write file", &format!("{}: {}", path, e)))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format_error("flush stdout", &e.to_string()))?;
    }
    Ok(())
}

/// Wrap `text` in an ANSI color when stdout is a terminal.
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Color code for a sentiment score.
pub fn score_color(score: f64) -> &'static str {
    if score > LABEL_THRESHOLD {
        "1;32"
    } else if score < -LABEL_THRESHOLD {
        "1;31"
    } else {
        "1;37"
    }
}

/// Serialize a value as pretty JSON with a trailing newline.
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| format_error("serialize output", &e.to_string()))
}
