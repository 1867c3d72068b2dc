//! Spans: offset-addressed, classified slices of a source text.
//!
//! A span list produced by the annotator is a *covering* of its source:
//! sorted, non-overlapping, gapless, and ending exactly at the text length.
//! [`coverage_issues`] checks that property.

use crate::entity::EntityId;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Classification of a span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SpanKind {
    /// Ordinary text.
    Plain,
    /// A mention of a roster entity.
    Known(EntityId),
    /// A capitalized token that may be a person not yet on the roster.
    Candidate,
}

impl SpanKind {
    /// Role name used in rendered markup (`plain`, `known`, `candidate`).
    #[must_use]
    pub const fn role(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Known(_) => "known",
            Self::Candidate => "candidate",
        }
    }
}

/// A half-open byte range `[start, end)` of the source text plus its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// What the covered text is.
    #[serde(flatten)]
    pub kind: SpanKind,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub const fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        Self { start, end, kind }
    }

    /// Create a plain span.
    #[must_use]
    pub const fn plain(start: usize, end: usize) -> Self {
        Self::new(start, end, SpanKind::Plain)
    }

    /// Create a known-entity span.
    #[must_use]
    pub fn known(start: usize, end: usize, id: impl Into<EntityId>) -> Self {
        Self::new(start, end, SpanKind::Known(id.into()))
    }

    /// Create a candidate-entity span.
    #[must_use]
    pub const fn candidate(start: usize, end: usize) -> Self {
        Self::new(start, end, SpanKind::Candidate)
    }

    /// Byte range.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Byte length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether this span is a known or candidate entity.
    #[must_use]
    pub const fn is_entity(&self) -> bool {
        !matches!(self.kind, SpanKind::Plain)
    }

    /// The entity id of a known span.
    #[must_use]
    pub fn entity_id(&self) -> Option<&EntityId> {
        match &self.kind {
            SpanKind::Known(id) => Some(id),
            _ => None,
        }
    }

    /// Extract the covered text, or `""` if the range is not valid for `text`.
    #[must_use]
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or("")
    }
}

/// A way in which a span list fails to cover its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageIssue {
    /// A span has `start >= end`.
    EmptySpan {
        /// Index of the span in the list.
        index: usize,
    },
    /// A span does not start where the previous one ended.
    Discontinuity {
        /// Index of the span in the list.
        index: usize,
        /// Offset the span should have started at.
        expected: usize,
        /// Offset it actually starts at.
        found: usize,
    },
    /// A span ends past the end of the text.
    OutOfBounds {
        /// Index of the span in the list.
        index: usize,
        /// Span end.
        end: usize,
        /// Text length in bytes.
        len: usize,
    },
    /// A span boundary falls inside a UTF-8 sequence.
    NotCharBoundary {
        /// Index of the span in the list.
        index: usize,
        /// Offending offset.
        offset: usize,
    },
    /// The spans stop before the end of the text.
    Incomplete {
        /// Bytes covered.
        covered: usize,
        /// Text length in bytes.
        len: usize,
    },
}

impl fmt::Display for CoverageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpan { index } => write!(f, "span #{} is empty", index),
            Self::Discontinuity {
                index,
                expected,
                found,
            } => write!(
                f,
                "span #{} starts at {} but previous span ended at {}",
                index, found, expected
            ),
            Self::OutOfBounds { index, end, len } => {
                write!(f, "span #{} ends at {} past text length {}", index, end, len)
            }
            Self::NotCharBoundary { index, offset } => {
                write!(f, "span #{} boundary {} splits a character", index, offset)
            }
            Self::Incomplete { covered, len } => {
                write!(f, "spans cover {} of {} bytes", covered, len)
            }
        }
    }
}

/// List every way `spans` fails to be a gapless covering of `text`.
///
/// An empty list is a valid covering of the empty string only.
#[must_use]
pub fn coverage_issues(spans: &[Span], text: &str) -> Vec<CoverageIssue> {
    let mut issues = Vec::new();
    let len = text.len();
    let mut cursor = 0;

    for (index, span) in spans.iter().enumerate() {
        if span.is_empty() {
            issues.push(CoverageIssue::EmptySpan { index });
        }
        if span.start != cursor {
            issues.push(CoverageIssue::Discontinuity {
                index,
                expected: cursor,
                found: span.start,
            });
        }
        if span.end > len {
            issues.push(CoverageIssue::OutOfBounds {
                index,
                end: span.end,
                len,
            });
        } else {
            for offset in [span.start, span.end] {
                if offset <= len && !text.is_char_boundary(offset) {
                    issues.push(CoverageIssue::NotCharBoundary { index, offset });
                }
            }
        }
        cursor = span.end;
    }

    if cursor < len {
        issues.push(CoverageIssue::Incomplete {
            covered: cursor,
            len,
        });
    }
    issues
}

/// Check that `spans` is a gapless covering of `text`.
///
/// Returns the first issue found as [`Error::InvalidSpans`].
pub fn check_coverage(spans: &[Span], text: &str) -> Result<()> {
    match coverage_issues(spans, text).into_iter().next() {
        Some(issue) => Err(Error::invalid_spans(issue.to_string())),
        None => Ok(()),
    }
}
