//! Entry scoring: the score persisted with a saved journal entry.
//!
//! This is a separate, simpler scorer than [`SentimentScorer`](super::SentimentScorer).
//! It runs when an entry is created or edited, and its output is what the
//! journal list shows afterwards.
//!
//! ```text
//! text ──lowercase──► every tier word, counted as \bword\b matches
//!                     every phrase pattern, counted as plain regex matches
//!
//! score = clamp(Σ count × weight / Σ count, −1, 1)     (0 when nothing matched)
//! ```
//!
//! Words and phrases are counted independently: "not happy" counts the
//! word "happy" and the phrase "not happy", and "impressed" is both a word
//! and a phrase. There are no negation or modifier rules.

use super::SentimentResult;
use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// Tables
// =============================================================================

/// Word tiers: (weight, words).
const WORD_TIERS: &[(f64, &[&str])] = &[
    (
        1.0,
        &[
            "love", "amazing", "excellent", "fantastic", "outstanding", "perfect", "wonderful",
            "brilliant", "delightful", "exceptional", "thrilled",
        ],
    ),
    (
        0.7,
        &[
            "good", "great", "happy", "pleased", "enjoy", "nice", "joy", "excited", "grateful",
            "thankful", "awesome", "best", "positive", "comfortable", "fun", "caring", "helpful",
            "thoughtful", "considerate", "impressed",
        ],
    ),
    (
        0.4,
        &[
            "fine", "okay", "decent", "pleasant", "satisfactory", "content", "calm", "relaxed",
            "refreshing", "interesting", "promising", "sweet",
        ],
    ),
    (
        -1.0,
        &[
            "hate", "terrible", "horrible", "awful", "dreadful", "miserable", "devastating",
            "disgusting", "furious", "despise", "disaster",
        ],
    ),
    (
        -0.7,
        &[
            "bad", "sad", "upset", "angry", "annoyed", "disappointed", "frustrated", "unhappy",
            "sorry", "regret", "difficult", "unfortunate", "unpleasant", "troubled", "worried",
            "painful", "negative", "problem", "concerned",
        ],
    ),
    (
        -0.4,
        &[
            "not great", "not good", "mediocre", "uneasy", "uncomfortable", "tired", "boring",
            "dull", "bland", "awkward", "challenging",
        ],
    ),
];

/// Phrase patterns: (regex, weight). Matched without word boundaries.
const PHRASES: &[(&str, f64)] = &[
    (r"was so (sweet|nice|kind|helpful|thoughtful)", 0.8),
    (r"made me (smile|laugh|happy)", 0.8),
    (r"really (enjoyed|appreciated|liked|loved)", 0.9),
    (r"very (supportive|understanding|patient)", 0.8),
    (r"had a great time", 0.7),
    (r"was a pleasure", 0.7),
    (r"went well", 0.6),
    (r"felt comfortable", 0.6),
    (r"was helpful", 0.5),
    (r"helped me", 0.6),
    (r"good conversation", 0.5),
    (r"looking forward to", 0.5),
    (r"impressed", 0.6),
    (r"proud of", 0.7),
    (r"grateful for", 0.7),
    (r"thankful for", 0.7),
    (r"had a (bad|terrible|awful|uncomfortable) experience", -0.8),
    (r"made me (uncomfortable|upset|angry|sad)", -0.8),
    (r"did not (like|enjoy|appreciate)", -0.6),
    (r"was not (helpful|pleasant|kind|nice)", -0.6),
    (r"was (rude|impolite|inconsiderate|mean)", -0.8),
    (r"felt (awkward|uncomfortable|uneasy)", -0.5),
    (r"didn't go well", -0.6),
    (r"wasn't (good|great|pleasant)", -0.5),
    (r"struggled with", -0.4),
    (r"don't like", -0.6),
    (r"not comfortable", -0.5),
    (r"disappointed", -0.5),
    (r"frustrating", -0.6),
    (r"not happy", -0.6),
    (r"concerned about", -0.4),
    (r"worried about", -0.4),
];

static PATTERNS: Lazy<Vec<(Regex, f64)>> = Lazy::new(|| {
    let words = WORD_TIERS.iter().flat_map(|&(weight, words)| {
        words.iter().map(move |w| {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(w)))
                .expect("entry word pattern is invalid");
            (re, weight)
        })
    });
    let phrases = PHRASES.iter().map(|&(pattern, weight)| {
        let re = Regex::new(pattern).expect("entry phrase pattern is invalid");
        (re, weight)
    });
    words.chain(phrases).collect()
});

static DEFAULT_ENTRY_SCORER: Lazy<EntryScorer> = Lazy::new(EntryScorer::new);

// =============================================================================
// Scorer
// =============================================================================

/// Scores a saved journal entry.
///
/// `term_count` in the result is the total number of word and phrase
/// matches; `has_complex_emotion` is always `false`.
#[derive(Debug, Clone)]
pub struct EntryScorer {
    patterns: &'static [(Regex, f64)],
}

impl EntryScorer {
    /// Scorer over the built-in word tiers and phrase patterns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: PATTERNS.as_slice(),
        }
    }

    /// Score `text`. Never fails; text with no matches is neutral.
    #[must_use]
    pub fn score(&self, text: &str) -> SentimentResult {
        let lower = text.to_lowercase();
        let mut total = 0.0;
        let mut count = 0usize;
        for (re, weight) in self.patterns {
            let hits = re.find_iter(&lower).count();
            if hits > 0 {
                log::trace!("entry pattern {:?} matched {} time(s)", re.as_str(), hits);
                total += hits as f64 * weight;
                count += hits;
            }
        }

        if count == 0 {
            return SentimentResult::neutral();
        }
        SentimentResult {
            score: (total / count as f64).clamp(-1.0, 1.0),
            term_count: count,
            has_complex_emotion: false,
        }
    }
}

impl Default for EntryScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Score a journal entry the way it is persisted.
#[must_use]
pub fn score_entry(text: &str) -> SentimentResult {
    DEFAULT_ENTRY_SCORER.score(text)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn entry_score_in_range(text in ".{0,200}") {
            let r = score_entry(&text);
            prop_assert!((-1.0..=1.0).contains(&r.score));
            if r.term_count == 0 {
                prop_assert_eq!(r.score, 0.0);
            }
        }
    }
}
