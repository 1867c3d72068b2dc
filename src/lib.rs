//! # rapport
//!
//! Sentiment scoring and person highlighting for journal text.
//!
//! - **Sentiment**: lexicon and rule based valence in `[-1, 1]`, with
//!   negation, intensity modifiers and ambivalence dampening, plus the
//!   simpler [`score_entry`] used for the score saved with an entry
//! - **People**: known roster names and capitalized candidate names as a
//!   gapless span list over the source text
//! - **Markup**: escaped HTML with inline highlights and an offset map back
//!   into the source
//!
//! Everything is deterministic and synchronous; a call costs microseconds,
//! so it can run on every keystroke.
//!
//! ## Quick Start
//!
//! ```rust
//! use rapport::{annotate, render, score, Entity, EntityIndex, SentimentLabel};
//!
//! let result = score("I am very happy today");
//! assert_eq!(result.label(), SentimentLabel::Positive);
//!
//! let roster = EntityIndex::from_entities(vec![Entity::new(1, "Alice")]);
//! let text = "Alice met Bob";
//! let annotation = annotate(text, &roster);
//! assert_eq!(annotation.detected.candidate_names(), vec!["Bob"]);
//!
//! let html = render(&annotation.spans, text);
//! assert!(html.contains("data-role=\"known\""));
//! ```
//!
//! ## Spans
//!
//! ```text
//! "Alice met Bob"
//!  ├─────┤├───┤├──┤
//!  Known  Plain Candidate
//!  (1)
//! ```
//!
//! Spans are byte offsets, strictly increasing and gapless. Concatenating
//! their slices reproduces the input exactly. Use [`offset::SpanConverter`]
//! for character or UTF-16 positions.
//!
//! ## Sharing a roster
//!
//! [`SharedIndex`] holds the current [`EntityIndex`] snapshot behind a
//! pointer swap, so a roster rebuild never races an in-flight annotation.
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! rapport = "0.1"                                      # library only
//! rapport = { version = "0.1", features = ["fast-lock"] } # parking_lot mutex
//! rapport = { version = "0.1", features = ["cli"] }       # `rapport` binary
//! ```

#![warn(missing_docs)]

pub mod annotate;
#[cfg(feature = "cli")]
#[allow(missing_docs)]
pub mod cli;
pub mod config;
mod error;
pub mod index;
pub mod offset;
pub mod render;
pub mod sentiment;
pub mod sync;

pub use rapport_core::{
    check_coverage, coverage_issues, CoverageIssue, Entity, EntityId, Span, SpanKind,
};

pub use annotate::{annotate, Annotation, Detected, Detection, TextAnnotator, RESERVED_WORDS};
pub use config::{AnnotatorConfig, Config, RenderConfig, ScoringConfig};
pub use error::{Error, Result};
pub use index::{EntityIndex, KnownMention};
pub use render::{render, render_with_index, strip_markup, MarkupRenderer, Rendered};
pub use sentiment::{
    score, score_entry, EntryScorer, Lexicon, LexiconEntry, SentimentLabel, SentimentResult,
    SentimentScorer,
};
pub use sync::SharedIndex;
