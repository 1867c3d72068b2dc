//! # rapport-core
//!
//! Core types for rapport: the data structures shared by the scorer, the
//! annotator, the renderer and the CLI.
//!
//! This crate provides:
//! - **Roster types**: `Entity`, `EntityId`
//! - **Span types**: `Span`, `SpanKind`, `CoverageIssue`
//! - **Errors**: `Error`, `Result`

pub mod entity;
pub mod error;
pub mod span;

pub use entity::{Entity, EntityId};
pub use error::{Error, Result};
pub use span::{check_coverage, coverage_issues, CoverageIssue, Span, SpanKind};
