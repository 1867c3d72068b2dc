//! Utility functions for CLI commands

use is_terminal::IsTerminal;
use std::io::{self, Read};

use super::output::format_error;
use super::parser::InputArgs;
use crate::{Config, EntityIndex, Lexicon};

/// Get input text from `--text`, `--file`, positional args, or piped stdin.
pub fn get_input_text(input: &InputArgs) -> Result<String, String> {
    if let Some(t) = &input.text {
        return Ok(t.clone());
    }
    if let Some(f) = &input.file {
        return read_input_file(f);
    }
    if !input.positional.is_empty() {
        return Ok(input.positional.join(" "));
    }

    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format_error("read stdin", &e.to_string()))?;
        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    Err("No input text provided. Use -t 'text' or -f file or pipe via stdin".to_string())
}

/// Read a file with consistent error handling
pub fn read_input_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format_error("read file", &format!("{}: {}", path, e)))
}

/// Load `--config`, or the defaults.
pub fn load_config(path: Option<&str>) -> Result<Config, String> {
    match path {
        Some(p) => Config::load(p).map_err(|e| format_error("load config", &format!("{}: {}", p, e))),
        None => Ok(Config::default()),
    }
}

/// Load `--roster`, or an empty index.
pub fn load_roster(path: Option<&str>) -> Result<EntityIndex, String> {
    let Some(p) = path else {
        return Ok(EntityIndex::new());
    };
    let json = read_input_file(p)?;
    EntityIndex::from_json_str(&json).map_err(|e| format_error("load roster", &format!("{}: {}", p, e)))
}

/// Load `--lexicon`, if given.
pub fn load_lexicon(path: Option<&str>) -> Result<Option<Lexicon>, String> {
    path.map(|p| Lexicon::load(p).map_err(|e| format_error("load lexicon", &format!("{}: {}", p, e))))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_input_precedence() {
        let input = InputArgs {
            text: Some("from flag".into()),
            file: None,
            positional: vec!["from".into(), "args".into()],
        };
        assert_eq!(get_input_text(&input).unwrap(), "from flag");

        let input = InputArgs {
            positional: vec!["from".into(), "args".into()],
            ..InputArgs::default()
        };
        assert_eq!(get_input_text(&input).unwrap(), "from args");
    }

    #[test]
    fn test_load_roster_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"[{{"id": 1, "name": "Alice"}}, {{"id": "x", "name": "B"}}]"#).unwrap();
        let idx = load_roster(f.path().to_str()).unwrap();
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.ignored(), 1);
    }

    #[test]
    fn test_load_roster_reports_path() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        let path = f.path().to_str().unwrap().to_string();
        let err = load_roster(Some(&path)).unwrap_err();
        assert!(err.contains("load roster"));
        assert!(err.contains(&path));
    }

    #[test]
    fn test_missing_files() {
        assert!(load_config(Some("/nonexistent/rapport.json")).is_err());
        assert!(load_lexicon(Some("/nonexistent/lexicon.json")).is_err());
        assert!(load_lexicon(None).unwrap().is_none());
        assert!(load_roster(None).unwrap().is_empty());
    }
}
