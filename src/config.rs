//! Declarative configuration for scoring, annotation and rendering.
//!
//! Every field has a default that reproduces the journal editor's behavior,
//! so an empty JSON object (or no file at all) is a valid configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sentiment scoring constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplier applied to every term in a sentence containing an amplifier.
    pub amplifier_multiplier: f64,
    /// Multiplier applied when a sentence has a diminisher and no amplifier.
    pub diminisher_multiplier: f64,
    /// Negated terms contribute `-(weight * modifier) * negation_factor`.
    pub negation_factor: f64,
    /// Final score multiplier when a complex-emotion phrase is present.
    pub complex_dampening: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            amplifier_multiplier: 1.5,
            diminisher_multiplier: 0.5,
            negation_factor: 0.8,
            complex_dampening: 0.7,
        }
    }
}

impl ScoringConfig {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("amplifier_multiplier", self.amplifier_multiplier),
            ("diminisher_multiplier", self.diminisher_multiplier),
            ("negation_factor", self.negation_factor),
            ("complex_dampening", self.complex_dampening),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Candidate-detection policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Skip capitalized tokens that open a sentence.
    ///
    /// Off by default: the editor flags sentence-initial names too.
    pub suppress_sentence_initial: bool,
    /// Minimum candidate length in characters.
    pub min_candidate_len: usize,
    /// Additional words never offered as candidates (exact, case-sensitive).
    pub extra_stop_words: Vec<String>,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            suppress_sentence_initial: false,
            min_candidate_len: 2,
            extra_stop_words: Vec::new(),
        }
    }
}

/// Markup styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Color of candidate (new person) highlights.
    pub candidate_color: String,
    /// Color of known-person highlights whose roster entry has no color.
    pub default_known_color: String,
    /// Prefix of the CSS classes put on wrapper elements.
    pub class_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            candidate_color: "#f0ad4e".to_string(),
            default_known_color: "#5bc0de".to_string(),
            class_prefix: "rapport".to_string(),
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        let prefix_ok = !self.class_prefix.is_empty()
            && self
                .class_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !prefix_ok {
            return Err(Error::config(format!(
                "render.class_prefix must be a non-empty CSS identifier, got {:?}",
                self.class_prefix
            )));
        }
        for (name, color) in [
            ("candidate_color", &self.candidate_color),
            ("default_known_color", &self.default_known_color),
        ] {
            if crate::render::css_color(color).is_none() {
                return Err(Error::config(format!(
                    "render.{} is not a CSS color: {:?}",
                    name, color
                )));
            }
        }
        Ok(())
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sentiment scoring constants.
    pub scoring: ScoringConfig,
    /// Candidate-detection policy.
    pub annotator: AnnotatorConfig,
    /// Markup styling.
    pub render: RenderConfig,
}

impl Config {
    /// Parse and validate a JSON configuration.
    ///
    /// ```
    /// use rapport::Config;
    ///
    /// let config = Config::from_json_str(r#"{"annotator": {"suppress_sentence_initial": true}}"#).unwrap();
    /// assert!(config.annotator.suppress_sentence_initial);
    /// assert_eq!(config.scoring.amplifier_multiplier, 1.5);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.render.validate()
    }
}
