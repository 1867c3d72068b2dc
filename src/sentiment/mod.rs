//! Lexicon-and-rule sentiment scoring.
//!
//! # Algorithm
//!
//! ```text
//! text ──lowercase──► whole-text scan for complex-emotion phrases
//!   │
//!   └──split on [.!?]+──► per sentence:
//!          tokens ─► negated?  amplified? / diminished?
//!          every lexicon term contained in the sentence contributes
//!              weight × modifier            (not negated)
//!             −weight × modifier × 0.8      (negated)
//!
//! score = clamp(Σ contributions / term_count × (0.7 if complex), −1, 1)
//! ```
//!
//! Terms match by substring containment, so "unhappy" also contains "happy"
//! and both count. This is the live score shown while an entry is edited;
//! the score saved with an entry comes from [`entry::EntryScorer`].

pub mod entry;
pub mod lexicon;

pub use entry::{score_entry, EntryScorer};
pub use lexicon::{Lexicon, LexiconEntry, ModifierClass, ModifierSet};

use crate::config::ScoringConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w']+\b").expect("TOKEN regex is invalid"));

static DEFAULT_SCORER: Lazy<SentimentScorer> = Lazy::new(SentimentScorer::new);

/// Scores above this are positive, below its negation negative.
pub const LABEL_THRESHOLD: f64 = 0.3;

/// Outcome of scoring one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Valence in [-1, 1]; 0 is neutral.
    pub score: f64,
    /// Number of lexicon and complex-emotion matches that went into the score.
    pub term_count: usize,
    /// Whether an ambivalence phrase ("mixed feelings") was found.
    pub has_complex_emotion: bool,
}

impl SentimentResult {
    /// The neutral result returned when nothing matched.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            score: 0.0,
            term_count: 0,
            has_complex_emotion: false,
        }
    }

    /// Coarse label for badges.
    #[must_use]
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.score)
    }
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Coarse sentiment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Score above [`LABEL_THRESHOLD`].
    Positive,
    /// Score within ±[`LABEL_THRESHOLD`].
    Neutral,
    /// Score below −[`LABEL_THRESHOLD`].
    Negative,
}

impl SentimentLabel {
    /// Classify a score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > LABEL_THRESHOLD {
            Self::Positive
        } else if score < -LABEL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        })
    }
}

/// One term that contributed to a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermMatch<'a> {
    /// The lexicon term or phrase.
    pub term: &'a str,
    /// Its lexicon weight.
    pub weight: f64,
    /// What it added to the accumulator after modifiers and negation.
    pub contribution: f64,
    /// Sentence index, or `None` for whole-text complex-emotion phrases.
    pub sentence: Option<usize>,
    /// Whether the sentence was negated.
    pub negated: bool,
}

/// A score together with the matches that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation<'a> {
    /// The final result.
    pub result: SentimentResult,
    /// Contributions in the order they were accumulated.
    pub matches: Vec<TermMatch<'a>>,
}

/// Sentiment scorer over a lexicon.
///
/// Scoring is a pure function of the text, the lexicon and the
/// [`ScoringConfig`]; a scorer can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: Cow<'static, Lexicon>,
    config: ScoringConfig,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer {
    /// Scorer over the built-in lexicon with default constants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexicon: Cow::Borrowed(Lexicon::builtin()),
            config: ScoringConfig::default(),
        }
    }

    /// Scorer over a custom lexicon.
    #[must_use]
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            lexicon: Cow::Owned(lexicon),
            config: ScoringConfig::default(),
        }
    }

    /// Replace the scoring constants.
    #[must_use]
    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    /// The lexicon in use.
    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score a text.
    ///
    /// Empty or whitespace-only text yields [`SentimentResult::neutral`].
    #[must_use]
    pub fn score(&self, text: &str) -> SentimentResult {
        self.explain(text).result
    }

    /// Score a text and report each contributing match.
    #[must_use]
    pub fn explain(&self, text: &str) -> Explanation<'_> {
        let lower = text.to_lowercase();
        let mut matches = Vec::new();
        let mut total = 0.0;
        let mut has_complex = false;

        for entry in self.lexicon.complex() {
            if lower.contains(entry.term.as_str()) {
                has_complex = true;
                total += entry.weight;
                matches.push(TermMatch {
                    term: &entry.term,
                    weight: entry.weight,
                    contribution: entry.weight,
                    sentence: None,
                    negated: false,
                });
            }
        }

        let modifiers = self.lexicon.modifiers();
        for (index, sentence) in split_sentences(&lower).enumerate() {
            let tokens: Vec<&str> = TOKEN.find_iter(sentence).map(|m| m.as_str()).collect();
            let negated = modifiers.negations.matches(&tokens);
            let modifier = if modifiers.amplifiers.matches(&tokens) {
                self.config.amplifier_multiplier
            } else if modifiers.diminishers.matches(&tokens) {
                self.config.diminisher_multiplier
            } else {
                1.0
            };

            for entry in self.lexicon.polarity_terms() {
                if !sentence.contains(entry.term.as_str()) {
                    continue;
                }
                let mut contribution = entry.weight * modifier;
                if negated {
                    contribution = -contribution * self.config.negation_factor;
                }
                total += contribution;
                matches.push(TermMatch {
                    term: &entry.term,
                    weight: entry.weight,
                    contribution,
                    sentence: Some(index),
                    negated,
                });
            }
        }

        let result = if matches.is_empty() {
            SentimentResult::neutral()
        } else {
            let mut score = total / matches.len() as f64;
            if has_complex {
                score *= self.config.complex_dampening;
            }
            SentimentResult {
                score: score.clamp(-1.0, 1.0),
                term_count: matches.len(),
                has_complex_emotion: has_complex,
            }
        };

        log::trace!(
            "scored {} bytes: {:.3} over {} terms",
            text.len(),
            result.score,
            result.term_count
        );
        Explanation { result, matches }
    }
}

/// Split on runs of `.`, `!` and `?`, dropping blank segments.
fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
}

/// Score a text with the built-in lexicon and default constants.
///
/// ```
/// let result = rapport::score("I am so happy today!");
/// assert!(result.score > 0.0);
/// assert_eq!(rapport::score("").term_count, 0);
/// ```
#[must_use]
pub fn score(text: &str) -> SentimentResult {
    DEFAULT_SCORER.score(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_is_neutral() {
        assert_eq!(score(""), SentimentResult::neutral());
        assert_eq!(score("   \n\t "), SentimentResult::neutral());
        assert_eq!(score("...!?"), SentimentResult::neutral());
    }

    #[test]
    fn test_no_terms_is_neutral() {
        let r = score("We walked to the station and waited for the train.");
        assert_eq!(r, SentimentResult::neutral());
    }

    #[test]
    fn test_base_positive() {
        let r = score("I am happy");
        assert!(approx(r.score, 0.7));
        assert_eq!(r.term_count, 1);
        assert!(!r.has_complex_emotion);
    }

    #[test]
    fn test_amplifier_ordering() {
        let amplified = score("I am very happy").score;
        let base = score("I am happy").score;
        let diminished = score("I am slightly happy").score;
        assert!(amplified > base, "{} <= {}", amplified, base);
        assert!(base > diminished, "{} <= {}", base, diminished);
        // 0.7 * 1.5 overflows and is clamped.
        assert!(approx(amplified, 1.0));
        assert!(approx(diminished, 0.35));
    }

    #[test]
    fn test_amplifier_beats_diminisher() {
        let r = score("I am very slightly happy");
        assert!(approx(r.score, 1.0));
    }

    #[test]
    fn test_multiword_diminisher_does_not_fire() {
        // Modifiers are single tokens; "a little" and "kind of" never match.
        assert!(approx(score("I have a little sister and I am happy").score, 0.7));
        assert!(approx(score("I am kind of happy").score, 0.7));
    }

    #[test]
    fn test_negation_inverts_and_dampens() {
        let r = score("I am not happy");
        assert!(approx(r.score, -0.56), "got {}", r.score);
        assert_eq!(r.term_count, 1);
        assert!(!approx(r.score, -score("I am happy").score));
    }

    #[test]
    fn test_negation_is_per_sentence() {
        // Negation in the first sentence leaves the second alone.
        let r = score("I was not sad. I am happy.");
        let expected = (0.7 * 0.8 + 0.7) / 2.0;
        assert!(approx(r.score, expected), "got {}", r.score);
    }

    #[test]
    fn test_overlapping_terms_all_count() {
        // "unhappy" contains "happy": both match.
        let r = score("I feel unhappy");
        assert_eq!(r.term_count, 2);
        assert!(approx(r.score, (0.7 - 0.6) / 2.0));
    }

    #[test]
    fn test_phrase_and_negation_quirk() {
        // "not great" is itself a negative phrase; "not" also negates the
        // sentence, flipping both "great" and "not great".
        let r = score("It was not great");
        let expected = (-0.7 * 0.8 + 0.5 * 0.8) / 2.0;
        assert!(approx(r.score, expected), "got {}", r.score);
    }

    #[test]
    fn test_complex_emotion_dampens() {
        let r = score("I have mixed feelings but I am happy");
        assert!(r.has_complex_emotion);
        assert_eq!(r.term_count, 2);
        assert!(approx(r.score, (0.0 + 0.7) / 2.0 * 0.7));
    }

    #[test]
    fn test_complex_emotion_spans_sentences() {
        // Whole-text scan: the phrase is found even across a sentence break.
        let r = score("So bittersweet. Really.");
        assert!(r.has_complex_emotion);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(score("I AM HAPPY"), score("i am happy"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(score("I am happy").label(), SentimentLabel::Positive);
        assert_eq!(score("I am sad").label(), SentimentLabel::Negative);
        assert_eq!(score("").label(), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.3), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.31), SentimentLabel::Negative);
    }

    #[test]
    fn test_explain_lists_contributions() {
        let scorer = SentimentScorer::new();
        let ex = scorer.explain("Not happy. Glad though!");
        assert_eq!(ex.matches.len(), 2);
        assert_eq!(ex.matches[0].term, "happy");
        assert!(ex.matches[0].negated);
        assert_eq!(ex.matches[0].sentence, Some(0));
        assert_eq!(ex.matches[1].term, "glad");
        assert_eq!(ex.matches[1].sentence, Some(1));
        assert!(approx(ex.matches[1].contribution, 0.6));
    }

    #[test]
    fn test_custom_lexicon_and_config() {
        let lexicon = Lexicon::from_json_str(
            r#"{"positive": [{"term": "sunny", "weight": 0.4}], "negations": ["hardly"]}"#,
        )
        .unwrap();
        let scorer = SentimentScorer::with_lexicon(lexicon).with_config(ScoringConfig {
            negation_factor: 1.0,
            ..ScoringConfig::default()
        });
        assert!(approx(scorer.score("a sunny day").score, 0.4));
        assert!(approx(scorer.score("hardly sunny").score, -0.4));
        assert_eq!(scorer.score("happy").term_count, 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Scores never leave [-1, 1].
        #[test]
        fn score_in_range(text in ".{0,200}") {
            let r = score(&text);
            prop_assert!((-1.0..=1.0).contains(&r.score));
        }

        /// Sentences built from lexicon words stay in range and count terms.
        #[test]
        fn lexicon_sentences_in_range(
            words in prop::collection::vec(
                prop::sample::select(vec![
                    "very", "not", "slightly", "happy", "sad", "mixed feelings",
                    "terrible", "great", "okay", ".", "!", "and",
                ]),
                0..30,
            )
        ) {
            let text = words.join(" ");
            let r = score(&text);
            prop_assert!((-1.0..=1.0).contains(&r.score));
            if r.term_count == 0 {
                prop_assert_eq!(r.score, 0.0);
                prop_assert!(!r.has_complex_emotion);
            }
        }

        /// Scoring is deterministic.
        #[test]
        fn score_deterministic(text in ".{0,100}") {
            prop_assert_eq!(score(&text), score(&text));
        }
    }
}
