//! Roster entities: the people a journal can mention.
//!
//! Entities are owned by whatever service lists people; rapport only ever
//! sees a snapshot of them. Nothing here mutates a roster.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum name length (in characters) for a roster name to be matchable.
pub const MIN_NAME_CHARS: usize = 2;

/// Identifier of a roster entity.
///
/// Rosters coming from a database use integer keys, rosters assembled by
/// hand often use strings. Both serialize as their bare JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for EntityId {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// A known person from the external roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier within the roster.
    pub id: EntityId,
    /// Display name, matched verbatim against text.
    pub name: String,
    /// Display color (any CSS color), if the roster assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Entity {
    /// Create an entity without a color.
    #[must_use]
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
        }
    }

    /// Set the display color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// The name with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// Whether this entity's name is long enough to be matched in text.
    ///
    /// Empty names and names shorter than [`MIN_NAME_CHARS`] characters
    /// never match anything.
    #[must_use]
    pub fn is_matchable(&self) -> bool {
        self.trimmed_name().chars().count() >= MIN_NAME_CHARS
    }
}
