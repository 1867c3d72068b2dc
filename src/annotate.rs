//! Two-pass text annotation: known people, then candidate new people.
//!
//! # Passes
//!
//! ```text
//! text ─► EntityIndex::find_known_mentions ─► known spans (claimed regions)
//!   │
//!   └──► capitalized-word scan (\b\p{Lu}\p{Ll}+\b) over the whole text,
//!        keeping only words that lie entirely outside claimed regions
//!        and pass the stop list ─► candidate spans
//!
//! known ∪ candidate, gaps filled with Plain ─► gapless span list
//! ```
//!
//! Both passes work on byte offsets of the source text; no markup exists
//! until [`crate::render`]. Word boundaries for candidates are judged on the
//! original text, so the tail of a partially claimed word ("Ann|a") is never
//! re-offered as a name.

use crate::config::AnnotatorConfig;
use crate::EntityIndex;
use once_cell::sync::Lazy;
use rapport_core::{Entity, EntityId, Span};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;

static CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\p{Lu}\p{Ll}+\b").expect("CANDIDATE regex is invalid"));

static DEFAULT_ANNOTATOR: Lazy<TextAnnotator> = Lazy::new(TextAnnotator::new);

/// Capitalized words that are almost never people.
pub const RESERVED_WORDS: &[&str] = &[
    // Days
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
    // Months
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
    // Sentence starters
    "The",
    "This",
    "That",
    "These",
    "Those",
    "They",
    "There",
    "Today",
    "Tomorrow",
    "Yesterday",
];

/// What the annotator found for one distinct name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Whether the name is a roster entity.
    pub is_known: bool,
    /// Roster id, for known names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    /// Roster color, for known names that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Number of spans with this exact text.
    pub mentions: usize,
}

/// Distinct names found in a text, keyed by their literal text.
///
/// Ordered by name so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Detected {
    entries: BTreeMap<String, Detection>,
}

impl Detected {
    /// Look up a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Detection> {
        self.entries.get(name)
    }

    /// All names with their detections.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Detection> {
        self.entries.iter()
    }

    /// Known names only.
    pub fn known(&self) -> impl Iterator<Item = (&str, &Detection)> {
        self.iter()
            .filter(|(_, d)| d.is_known)
            .map(|(n, d)| (n.as_str(), d))
    }

    /// Candidate names only.
    pub fn candidates(&self) -> impl Iterator<Item = (&str, &Detection)> {
        self.iter()
            .filter(|(_, d)| !d.is_known)
            .map(|(n, d)| (n.as_str(), d))
    }

    /// Candidate names, sorted.
    #[must_use]
    pub fn candidate_names(&self) -> Vec<&str> {
        self.candidates().map(|(n, _)| n).collect()
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, name: &str, fresh: impl FnOnce() -> Detection) {
        match self.entries.get_mut(name) {
            Some(existing) => existing.mentions += 1,
            None => {
                self.entries.insert(name.to_string(), fresh());
            }
        }
    }
}

impl<'a> IntoIterator for &'a Detected {
    type Item = (&'a String, &'a Detection);
    type IntoIter = btree_map::Iter<'a, String, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Annotator output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Gapless covering of the text, in order.
    pub spans: Vec<Span>,
    /// Distinct names found.
    pub detected: Detected,
}

impl Annotation {
    /// Known and candidate spans only.
    pub fn entity_spans(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(|s| s.is_entity())
    }
}

/// Splits text into plain, known-entity and candidate spans.
#[derive(Debug, Clone)]
pub struct TextAnnotator {
    config: AnnotatorConfig,
    extra_stop_words: HashSet<String>,
}

impl Default for TextAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnnotator {
    /// Annotator with the default (relaxed) candidate policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AnnotatorConfig::default())
    }

    /// Annotator with a custom candidate policy.
    #[must_use]
    pub fn with_config(config: AnnotatorConfig) -> Self {
        let extra_stop_words = config.extra_stop_words.iter().cloned().collect();
        Self {
            config,
            extra_stop_words,
        }
    }

    /// The candidate policy in use.
    #[must_use]
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Annotate `text` against a roster snapshot.
    ///
    /// The returned spans cover the text exactly: concatenating their text
    /// reproduces the input. Identical inputs give identical output.
    #[must_use]
    pub fn annotate(&self, text: &str, index: &EntityIndex) -> Annotation {
        let known = index.find_known_mentions(text);
        let mut detected = Detected::default();
        let mut entity_spans: Vec<Span> = Vec::with_capacity(known.len());

        // Candidates come out of the regex in text order, as do the known
        // mentions; merge the two streams while walking.
        let mut known_iter = known.iter().peekable();
        for m in CANDIDATE.find_iter(text) {
            while let Some(k) = known_iter.next_if(|k| k.start < m.start()) {
                push_known(&mut entity_spans, &mut detected, text, k.start, k.end, k.entity);
            }
            let inside_previous = entity_spans.last().is_some_and(|s| s.end > m.start());
            let overlaps_next = known_iter.peek().is_some_and(|k| k.start < m.end());
            if inside_previous || overlaps_next {
                continue;
            }
            if !self.is_candidate(text, m.start(), m.as_str(), index) {
                continue;
            }
            entity_spans.push(Span::candidate(m.start(), m.end()));
            detected.record(m.as_str(), || Detection {
                is_known: false,
                entity_id: None,
                color: None,
                mentions: 1,
            });
        }
        for k in known_iter {
            push_known(&mut entity_spans, &mut detected, text, k.start, k.end, k.entity);
        }

        let spans = fill_gaps(entity_spans, text.len());
        log::trace!(
            "annotated {} bytes: {} spans, {} known, {} candidates",
            text.len(),
            spans.len(),
            known.len(),
            detected.candidates().count()
        );
        Annotation { spans, detected }
    }

    fn is_candidate(&self, text: &str, start: usize, word: &str, index: &EntityIndex) -> bool {
        if word.chars().count() < self.config.min_candidate_len {
            return false;
        }
        if RESERVED_WORDS.contains(&word) || self.extra_stop_words.contains(word) {
            return false;
        }
        if index.is_known_name(word) {
            return false;
        }
        !(self.config.suppress_sentence_initial && is_sentence_initial(text, start))
    }
}

fn push_known(
    spans: &mut Vec<Span>,
    detected: &mut Detected,
    text: &str,
    start: usize,
    end: usize,
    entity: &Entity,
) {
    spans.push(Span::known(start, end, entity.id.clone()));
    detected.record(&text[start..end], || Detection {
        is_known: true,
        entity_id: Some(entity.id.clone()),
        color: entity.color.clone(),
        mentions: 1,
    });
}

/// Whether nothing but punctuation and whitespace separates `start` from the
/// previous sentence terminator (or the start of the text).
fn is_sentence_initial(text: &str, start: usize) -> bool {
    for c in text[..start].chars().rev() {
        match c {
            '.' | '!' | '?' => return true,
            c if c.is_alphanumeric() => return false,
            _ => {}
        }
    }
    true
}

/// Interleave sorted, disjoint entity spans with plain spans.
fn fill_gaps(entity_spans: Vec<Span>, len: usize) -> Vec<Span> {
    let mut spans = Vec::with_capacity(entity_spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in entity_spans {
        if span.start > cursor {
            spans.push(Span::plain(cursor, span.start));
        }
        cursor = span.end;
        spans.push(span);
    }
    if cursor < len {
        spans.push(Span::plain(cursor, len));
    }
    spans
}

/// Annotate `text` with the default candidate policy.
///
/// ```
/// use rapport::{annotate, Entity, EntityId, EntityIndex, SpanKind};
///
/// let index = EntityIndex::from_entities(vec![Entity::new(1, "Alice")]);
/// let annotation = annotate("Alice met Bob", &index);
///
/// let kinds: Vec<_> = annotation.spans.iter().map(|s| s.kind.clone()).collect();
/// assert_eq!(kinds, vec![SpanKind::Known(EntityId::Int(1)), SpanKind::Plain, SpanKind::Candidate]);
/// assert_eq!(annotation.detected.candidate_names(), vec!["Bob"]);
/// ```
#[must_use]
pub fn annotate(text: &str, index: &EntityIndex) -> Annotation {
    DEFAULT_ANNOTATOR.annotate(text, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_core::coverage_issues;

    fn roster(names: &[&str]) -> EntityIndex {
        EntityIndex::from_entities(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| Entity::new(i as i64 + 1, *n)),
        )
    }

    fn texts<'a>(a: &Annotation, text: &'a str) -> Vec<(&'a str, &'static str)> {
        a.spans.iter().map(|s| (s.text(text), s.kind.role())).collect()
    }

    #[test]
    fn test_known_then_candidate() {
        let text = "Alice met Bob";
        let a = annotate(text, &roster(&["Alice"]));
        assert_eq!(
            texts(&a, text),
            vec![("Alice", "known"), (" met ", "plain"), ("Bob", "candidate")]
        );
        assert_eq!(a.spans[0].entity_id(), Some(&EntityId::Int(1)));

        let alice = a.detected.get("Alice").unwrap();
        assert!(alice.is_known);
        assert_eq!(alice.entity_id, Some(EntityId::Int(1)));
        let bob = a.detected.get("Bob").unwrap();
        assert!(!bob.is_known);
        assert!(bob.entity_id.is_none());
    }

    #[test]
    fn test_first_claim_wins_leaves_short_tail() {
        let text = "Anna is here";
        let a = annotate(text, &roster(&["Ann", "Anna"]));
        assert_eq!(
            texts(&a, text),
            vec![("Ann", "known"), ("a is here", "plain")]
        );
        assert_eq!(a.detected.len(), 1);
        assert!(a.detected.get("Anna").is_none());
    }

    #[test]
    fn test_known_name_never_candidate_even_when_blocked() {
        // Every "Anna" is claimed by "Ann" first; the capitalized words
        // overlapping those claims are not re-offered.
        let text = "Anna and Anna";
        let idx = roster(&["Ann", "Anna"]);
        let a = annotate(text, &idx);
        assert!(a.detected.candidates().next().is_none());
        assert_eq!(a.spans.iter().filter(|s| s.is_entity()).count(), 2);
    }

    #[test]
    fn test_blocked_roster_name_not_flagged() {
        // "Bob Smith" is blocked by the earlier "Smith" claim; "Bob" is
        // an ordinary candidate, "Smith" is known.
        let text = "Bob Smith called";
        let a = annotate(text, &roster(&["Smith", "Bob Smith"]));
        assert_eq!(
            texts(&a, text),
            vec![
                ("Bob", "candidate"),
                (" ", "plain"),
                ("Smith", "known"),
                (" called", "plain")
            ]
        );
    }

    #[test]
    fn test_reserved_words_excluded() {
        let text = "Monday. On Monday the Today show, then May with June";
        let a = annotate(text, &EntityIndex::new());
        let names = a.detected.candidate_names();
        assert_eq!(names, vec!["On"]);
    }

    #[test]
    fn test_sentence_initial_flagged_by_default() {
        let text = "Yesterday was long. Priya called.";
        let a = annotate(text, &EntityIndex::new());
        assert_eq!(a.detected.candidate_names(), vec!["Priya"]);
    }

    #[test]
    fn test_strict_mode_suppresses_sentence_initial() {
        let annotator = TextAnnotator::with_config(AnnotatorConfig {
            suppress_sentence_initial: true,
            ..AnnotatorConfig::default()
        });
        let text = "Priya called. \"Omar\" laughed with Priya";
        let a = annotator.annotate(text, &EntityIndex::new());
        assert_eq!(a.detected.candidate_names(), vec!["Priya"]);
        let priya = a.detected.get("Priya").unwrap();
        assert_eq!(priya.mentions, 1);
    }

    #[test]
    fn test_roster_names_rejected_as_candidates() {
        let idx = roster(&["Alice"]);
        let annotator = TextAnnotator::new();
        assert!(!annotator.is_candidate("Alice x", 0, "Alice", &idx));
        assert!(annotator.is_candidate("Bob x", 0, "Bob", &idx));
    }

    #[test]
    fn test_extra_stop_words_and_min_len() {
        let annotator = TextAnnotator::with_config(AnnotatorConfig {
            extra_stop_words: vec!["Mom".into()],
            min_candidate_len: 3,
            ..AnnotatorConfig::default()
        });
        let a = annotator.annotate("Mom and Jo met Kai", &EntityIndex::new());
        assert_eq!(a.detected.candidate_names(), vec!["Kai"]);
    }

    #[test]
    fn test_candidate_pattern_shape() {
        let a = annotate("NASA, McDonald, I and O'Brien met Zoë", &EntityIndex::new());
        assert_eq!(a.detected.candidate_names(), vec!["Brien", "Zoë"]);
    }

    #[test]
    fn test_mentions_counted_first_occurrence_wins() {
        let text = "Bob, Alice, Bob and Alice";
        let idx = EntityIndex::from_entities(vec![Entity::new(1, "Alice").with_color("#f00")]);
        let a = annotate(text, &idx);
        assert_eq!(a.detected.get("Bob").unwrap().mentions, 2);
        let alice = a.detected.get("Alice").unwrap();
        assert_eq!(alice.mentions, 2);
        assert_eq!(alice.color.as_deref(), Some("#f00"));
    }

    #[test]
    fn test_empty_and_plain_text() {
        let a = annotate("", &EntityIndex::new());
        assert!(a.spans.is_empty());
        assert!(a.detected.is_empty());

        let text = "all lowercase here";
        let a = annotate(text, &EntityIndex::new());
        assert_eq!(a.spans, vec![Span::plain(0, text.len())]);
    }

    #[test]
    fn test_covering_with_adjacent_entities() {
        let text = "Alice Bob";
        let a = annotate(text, &roster(&["Alice", "Bob"]));
        assert!(coverage_issues(&a.spans, text).is_empty());
        assert_eq!(a.spans.len(), 3);
    }

    #[test]
    fn test_deterministic() {
        let text = "Alice met Bob and Carol on Friday. Dave? Eve!";
        let idx = roster(&["Carol", "Eve"]);
        assert_eq!(annotate(text, &idx), annotate(text, &idx));
        assert_eq!(
            serde_json::to_string(&annotate(text, &idx)).unwrap(),
            serde_json::to_string(&annotate(text, &idx)).unwrap()
        );
    }

    #[test]
    fn test_detected_serializes_as_map() {
        let a = annotate("Alice met Bob", &roster(&["Alice"]));
        let json = serde_json::to_value(&a.detected).unwrap();
        assert_eq!(json["Alice"]["is_known"], true);
        assert_eq!(json["Alice"]["entity_id"], 1);
        assert_eq!(json["Bob"]["is_known"], false);
        assert!(json["Bob"].get("entity_id").is_none());
    }
}
