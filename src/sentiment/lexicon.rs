//! Weighted sentiment lexicon and modifier word lists.
//!
//! The built-in tables are the ones the journal editor has always used.
//! Weights are grouped by intensity: strong (0.8 to 1.0), moderate (0.6 to
//! 0.7) and mild (0.5), mirrored for negative terms.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// =============================================================================
// Built-in tables
// =============================================================================

const POSITIVE_TERMS: &[(&str, f64)] = &[
    // Strong
    ("ecstatic", 1.0),
    ("overjoyed", 1.0),
    ("elated", 0.9),
    ("thrilled", 0.9),
    ("absolutely love", 0.9),
    ("incredibly happy", 0.9),
    ("fantastic", 0.9),
    ("exhilarated", 0.9),
    ("couldn't be happier", 0.9),
    ("perfect", 0.8),
    ("amazing", 0.8),
    ("wonderful", 0.8),
    ("brilliant", 0.8),
    ("exceptional", 0.8),
    // Moderate
    ("happy", 0.7),
    ("joy", 0.7),
    ("delighted", 0.7),
    ("great", 0.7),
    ("love", 0.7),
    ("excited", 0.7),
    ("pleased", 0.6),
    ("glad", 0.6),
    ("satisfied", 0.6),
    ("enjoyed", 0.6),
    ("proud", 0.6),
    ("impressed", 0.6),
    ("grateful", 0.6),
    // Mild
    ("good", 0.5),
    ("nice", 0.5),
    ("fine", 0.5),
    ("ok", 0.5),
    ("okay", 0.5),
    ("content", 0.5),
    ("comfortable", 0.5),
    ("thankful", 0.5),
    ("pleasant", 0.5),
    ("positive", 0.5),
    ("calm", 0.5),
    ("relaxed", 0.5),
    ("relieved", 0.5),
];

const NEGATIVE_TERMS: &[(&str, f64)] = &[
    // Strong
    ("devastated", -1.0),
    ("heartbroken", -1.0),
    ("miserable", -0.9),
    ("despair", -0.9),
    ("absolutely hate", -0.9),
    ("terrible", -0.9),
    ("horrible", -0.9),
    ("furious", -0.9),
    ("completely failed", -0.9),
    ("disaster", -0.8),
    ("awful", -0.8),
    ("disgusted", -0.8),
    ("dreadful", -0.8),
    ("terrified", -0.8),
    ("depressed", -0.8),
    // Moderate
    ("sad", -0.7),
    ("angry", -0.7),
    ("upset", -0.7),
    ("hate", -0.7),
    ("annoyed", -0.7),
    ("disappointed", -0.7),
    ("frustrated", -0.6),
    ("hurt", -0.6),
    ("anxious", -0.6),
    ("worried", -0.6),
    ("unhappy", -0.6),
    ("regret", -0.6),
    ("troubled", -0.6),
    // Mild
    ("bad", -0.5),
    ("dislike", -0.5),
    ("meh", -0.5),
    ("uncomfortable", -0.5),
    ("concerned", -0.5),
    ("tired", -0.5),
    ("bored", -0.5),
    ("confused", -0.5),
    ("unsure", -0.5),
    ("uncertain", -0.5),
    ("not great", -0.5),
    ("mediocre", -0.5),
];

// Ambivalence markers; most carry no polarity of their own.
const COMPLEX_EMOTIONS: &[(&str, f64)] = &[
    ("mixed feelings", 0.0),
    ("bittersweet", 0.1),
    ("complicated feelings", 0.0),
    ("emotional rollercoaster", 0.0),
    ("conflicted", -0.1),
    ("unsure how to feel", 0.0),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "wouldn't", "couldn't", "isn't", "aren't",
    "wasn't", "weren't",
];

const AMPLIFIERS: &[&str] = &[
    "very",
    "really",
    "extremely",
    "incredibly",
    "absolutely",
    "completely",
    "totally",
    "utterly",
    "so",
];

const DIMINISHERS: &[&str] = &[
    "somewhat", "slightly", "a bit", "a little", "kind of", "sort of", "barely",
];

static BUILTIN: Lazy<Lexicon> = Lazy::new(|| Lexicon {
    positive: entries(POSITIVE_TERMS),
    negative: entries(NEGATIVE_TERMS),
    complex: entries(COMPLEX_EMOTIONS),
    modifiers: ModifierSet {
        negations: ModifierClass::new(NEGATIONS.iter().copied()),
        amplifiers: ModifierClass::new(AMPLIFIERS.iter().copied()),
        diminishers: ModifierClass::new(DIMINISHERS.iter().copied()),
    },
});

fn entries(table: &[(&str, f64)]) -> Vec<LexiconEntry> {
    table
        .iter()
        .map(|&(term, weight)| LexiconEntry {
            term: term.to_string(),
            weight,
        })
        .collect()
}

// =============================================================================
// Types
// =============================================================================

/// A weighted term or phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Lowercase term; phrases may contain spaces and apostrophes.
    pub term: String,
    /// Signed weight in [-1, 1].
    pub weight: f64,
}

impl LexiconEntry {
    /// Normalize and validate an entry.
    ///
    /// Terms are trimmed and lowercased. Weights outside [-1, 1] are clamped
    /// with a warning; non-finite weights and empty terms are rejected.
    pub fn new(term: &str, weight: f64) -> Result<Self> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Err(Error::lexicon("empty term"));
        }
        if !weight.is_finite() {
            return Err(Error::lexicon(format!(
                "term {:?} has non-finite weight",
                term
            )));
        }
        let clamped = weight.clamp(-1.0, 1.0);
        if clamped != weight {
            log::warn!(
                "lexicon term {:?} weight {} clamped to {}",
                term,
                weight,
                clamped
            );
        }
        Ok(Self {
            term,
            weight: clamped,
        })
    }
}

/// One category of modifier words.
///
/// Modifiers are checked against individual tokens. A multi-word entry such
/// as "kind of" is kept in the table but can never equal a single token, so
/// it never fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierClass {
    words: HashSet<String>,
}

impl ModifierClass {
    /// Build from modifier words (trimmed and lowercased).
    pub fn new<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        let words = items
            .into_iter()
            .map(|item| item.trim().to_lowercase())
            .filter(|item| !item.is_empty())
            .collect();
        Self { words }
    }

    /// Whether any token is a modifier of this class.
    #[must_use]
    pub fn matches(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|t| self.words.contains(*t))
    }

    /// Number of entries in this class.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if this class is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Negation, amplifier and diminisher word lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierSet {
    /// Words that flip (and dampen) every term in their sentence.
    pub negations: ModifierClass,
    /// Words that strengthen every term in their sentence.
    pub amplifiers: ModifierClass,
    /// Words that weaken every term in their sentence.
    pub diminishers: ModifierClass,
}

/// Sentiment lexicon: polarity tables, complex-emotion phrases and modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    positive: Vec<LexiconEntry>,
    negative: Vec<LexiconEntry>,
    complex: Vec<LexiconEntry>,
    modifiers: ModifierSet,
}

impl Lexicon {
    /// The built-in lexicon, initialized on first use.
    #[must_use]
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// Positive entries, in table order.
    #[must_use]
    pub fn positive(&self) -> &[LexiconEntry] {
        &self.positive
    }

    /// Negative entries, in table order.
    #[must_use]
    pub fn negative(&self) -> &[LexiconEntry] {
        &self.negative
    }

    /// Positive then negative entries.
    pub fn polarity_terms(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.positive.iter().chain(self.negative.iter())
    }

    /// Complex-emotion phrases.
    #[must_use]
    pub fn complex(&self) -> &[LexiconEntry] {
        &self.complex
    }

    /// Modifier word lists.
    #[must_use]
    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    /// Parse a JSON lexicon.
    ///
    /// ```json
    /// {
    ///   "positive": [{"term": "happy", "weight": 0.7}],
    ///   "negative": [{"term": "sad", "weight": -0.7}],
    ///   "complex": [{"term": "mixed feelings", "weight": 0.0}],
    ///   "negations": ["not"],
    ///   "amplifiers": ["very"],
    ///   "diminishers": ["slightly", "kind of"]
    /// }
    /// ```
    ///
    /// Missing sections are empty.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(json)?;
        let normalize = |raw: Vec<LexiconEntry>| -> Result<Vec<LexiconEntry>> {
            raw.into_iter()
                .map(|e| LexiconEntry::new(&e.term, e.weight))
                .collect()
        };
        let lexicon = Self {
            positive: normalize(file.positive)?,
            negative: normalize(file.negative)?,
            complex: normalize(file.complex)?,
            modifiers: ModifierSet {
                negations: ModifierClass::new(file.negations.iter().map(String::as_str)),
                amplifiers: ModifierClass::new(file.amplifiers.iter().map(String::as_str)),
                diminishers: ModifierClass::new(file.diminishers.iter().map(String::as_str)),
            },
        };
        log::debug!(
            "lexicon loaded: {} positive, {} negative, {} complex",
            lexicon.positive.len(),
            lexicon.negative.len(),
            lexicon.complex.len()
        );
        Ok(lexicon)
    }

    /// Load a JSON lexicon file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct LexiconFile {
    positive: Vec<LexiconEntry>,
    negative: Vec<LexiconEntry>,
    complex: Vec<LexiconEntry>,
    negations: Vec<String>,
    amplifiers: Vec<String>,
    diminishers: Vec<String>,
}
