//! Roster index: finds mentions of known people in text.
//!
//! # Matching rule
//!
//! ```text
//! roster order ──► for each matchable name, every occurrence that starts
//!                  on a word boundary is offered in text order
//!                        │
//!                        ▼
//!                  claimed?  ── overlaps an earlier claim ──► discarded
//!                        │
//!                        └── otherwise ──► claimed
//! ```
//!
//! Claims are first-come in roster order, not longest-match: with roster
//! `["Ann", "Anna"]`, "Anna is here" yields a mention of `Ann` at `0..3` and
//! `Anna` is never matched. Only the leading edge of a name needs a word
//! boundary, which is what lets `Ann` claim the front of `Anna`.
//!
//! The index is an immutable snapshot. A changed roster means a new index
//! (see [`crate::SharedIndex`] for swapping snapshots between threads).

use rapport_core::{Entity, EntityId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;

use crate::Result;

/// A known-entity mention found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownMention<'a> {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// The roster entity mentioned.
    pub entity: &'a Entity,
}

impl KnownMention<'_> {
    /// Byte range of the mention.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Id of the mentioned entity.
    #[must_use]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity.id
    }
}

/// Read-only snapshot of the roster, prepared for matching.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    /// Matchable entities in roster order, names trimmed.
    entities: Vec<Entity>,
    /// First roster position of each id.
    by_id: HashMap<EntityId, usize>,
    /// Every trimmed roster name, matchable or not.
    names: HashSet<String>,
    /// Roster entries dropped for having unusable names.
    ignored: usize,
}

impl EntityIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a roster.
    #[must_use]
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut index = Self::new();
        index.rebuild(entities);
        index
    }

    /// Build an index from a JSON roster: `[{"id": 1, "name": "Alice", "color": "#f00"}]`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entities: Vec<Entity> = serde_json::from_str(json)?;
        Ok(Self::from_entities(entities))
    }

    /// Replace the whole roster.
    ///
    /// Entities whose trimmed name is shorter than two characters are
    /// skipped silently; they never match and never block candidates.
    pub fn rebuild(&mut self, entities: impl IntoIterator<Item = Entity>) {
        self.entities.clear();
        self.by_id.clear();
        self.names.clear();
        self.ignored = 0;

        for mut entity in entities {
            let trimmed = entity.trimmed_name();
            if !trimmed.is_empty() {
                self.names.insert(trimmed.to_string());
            }
            if !entity.is_matchable() {
                self.ignored += 1;
                continue;
            }
            if trimmed.len() != entity.name.len() {
                entity.name = trimmed.to_string();
            }
            self.by_id
                .entry(entity.id.clone())
                .or_insert(self.entities.len());
            self.entities.push(entity);
        }

        log::debug!(
            "entity index rebuilt: {} matchable, {} ignored",
            self.entities.len(),
            self.ignored
        );
    }

    /// Matchable entities in roster order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of matchable entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if no entity can match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of roster entries skipped at the last rebuild.
    #[must_use]
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Look up a matchable entity by id.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.by_id.get(id).map(|&i| &self.entities[i])
    }

    /// Whether `name` is exactly (case-sensitively) a roster name.
    #[must_use]
    pub fn is_known_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Find mentions of known entities, ordered by start offset.
    ///
    /// Mentions never overlap: an occurrence touching a region already
    /// claimed by an earlier roster entry is discarded.
    #[must_use]
    pub fn find_known_mentions<'a>(&'a self, text: &str) -> Vec<KnownMention<'a>> {
        // start -> (end, roster position)
        let mut claimed: BTreeMap<usize, (usize, usize)> = BTreeMap::new();

        for (pos, entity) in self.entities.iter().enumerate() {
            let name = entity.name.as_str();
            let mut from = 0;
            while let Some(found) = text[from..].find(name) {
                let start = from + found;
                let end = start + name.len();
                if !starts_on_boundary(text, start, name) || overlaps_claim(&claimed, start, end) {
                    // A rejected hit may hide a valid occurrence inside it.
                    from = start + text[start..].chars().next().map_or(1, char::len_utf8);
                    continue;
                }
                claimed.insert(start, (end, pos));
                from = end;
            }
        }

        claimed
            .into_iter()
            .map(|(start, (end, pos))| KnownMention {
                start,
                end,
                entity: &self.entities[pos],
            })
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A name beginning with a word character must not continue a word.
fn starts_on_boundary(text: &str, start: usize, name: &str) -> bool {
    match name.chars().next() {
        Some(first) if is_word_char(first) => text[..start]
            .chars()
            .next_back()
            .map_or(true, |prev| !is_word_char(prev)),
        _ => true,
    }
}

fn overlaps_claim(claimed: &BTreeMap<usize, (usize, usize)>, start: usize, end: usize) -> bool {
    let before = claimed
        .range(..=start)
        .next_back()
        .is_some_and(|(_, &(claim_end, _))| claim_end > start);
    let after = claimed
        .range(start..)
        .next()
        .is_some_and(|(&claim_start, _)| claim_start < end);
    before || after
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(names: &[&str]) -> EntityIndex {
        EntityIndex::from_entities(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| Entity::new(i as i64 + 1, *n)),
        )
    }

    fn found<'a>(idx: &'a EntityIndex, text: &str) -> Vec<(usize, usize, &'a str)> {
        idx.find_known_mentions(text)
            .into_iter()
            .map(|m| (m.start, m.end, m.entity.name.as_str()))
            .collect()
    }

    #[test]
    fn test_simple_mention() {
        let idx = index(&["Alice"]);
        assert_eq!(found(&idx, "Alice met Bob"), vec![(0, 5, "Alice")]);
    }

    #[test]
    fn test_all_occurrences_sorted() {
        let idx = index(&["Bob", "Alice"]);
        assert_eq!(
            found(&idx, "Alice, Bob and Alice again"),
            vec![(0, 5, "Alice"), (7, 10, "Bob"), (15, 20, "Alice")]
        );
    }

    #[test]
    fn test_first_claim_wins_over_longer_match() {
        let idx = index(&["Ann", "Anna"]);
        assert_eq!(found(&idx, "Anna is here"), vec![(0, 3, "Ann")]);

        // Reversed roster order lets the longer name claim first.
        let idx = index(&["Anna", "Ann"]);
        assert_eq!(found(&idx, "Anna is here"), vec![(0, 4, "Anna")]);
    }

    #[test]
    fn test_later_match_starting_before_claim_discarded() {
        let idx = index(&["Smith", "Bob Smith"]);
        assert_eq!(found(&idx, "Bob Smith"), vec![(4, 9, "Smith")]);
    }

    #[test]
    fn test_leading_boundary_required() {
        let idx = index(&["Ann"]);
        assert!(found(&idx, "JoAnn").is_empty());
        assert!(found(&idx, "_Ann").is_empty());
        assert_eq!(found(&idx, "(Ann)"), vec![(1, 4, "Ann")]);
    }

    #[test]
    fn test_rejected_hit_does_not_hide_later_occurrence() {
        let idx = index(&["Bo Bo"]);
        assert_eq!(found(&idx, "xBo Bo Bo"), vec![(4, 9, "Bo Bo")]);
    }

    #[test]
    fn test_names_with_spaces_and_punctuation() {
        let idx = index(&["Mary Ann", "Ann", "Jean-Luc", "Luc"]);
        assert_eq!(
            found(&idx, "Mary Ann met Ann and Jean-Luc"),
            vec![(0, 8, "Mary Ann"), (13, 16, "Ann"), (21, 29, "Jean-Luc")]
        );
        // The leading boundary applies to the whole name; a bare "Ann" inside
        // the rejected hit is still found.
        assert_eq!(found(&idx, "RoseMary Annex"), vec![(9, 12, "Ann")]);
        assert_eq!(found(&idx, "LeJean-Luc"), vec![(7, 10, "Luc")]);
        // Only a leading boundary is required.
        assert_eq!(found(&idx, "Mary Anne"), vec![(0, 8, "Mary Ann")]);
    }

    #[test]
    fn test_inner_name_claims_when_listed_first() {
        let idx = index(&["Luc", "Jean-Luc"]);
        assert_eq!(found(&idx, "Jean-Luc"), vec![(5, 8, "Luc")]);
    }

    #[test]
    fn test_case_sensitive() {
        let idx = index(&["Alice"]);
        assert!(found(&idx, "alice").is_empty());
    }

    #[test]
    fn test_short_and_empty_names_ignored() {
        let idx = EntityIndex::from_entities(vec![
            Entity::new(1, "A"),
            Entity::new(2, ""),
            Entity::new(3, " "),
            Entity::new(4, "Al"),
        ]);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.ignored(), 3);
        assert_eq!(found(&idx, "A and Al"), vec![(6, 8, "Al")]);
        assert!(idx.is_known_name("A"));
        assert!(!idx.is_known_name(""));
    }

    #[test]
    fn test_names_are_trimmed() {
        let idx = EntityIndex::from_entities(vec![Entity::new(1, "  Bob ")]);
        assert_eq!(found(&idx, "with Bob."), vec![(5, 8, "Bob")]);
        assert!(idx.is_known_name("Bob"));
    }

    #[test]
    fn test_rebuild_replaces_roster() {
        let mut idx = index(&["Alice"]);
        idx.rebuild(vec![Entity::new(9, "Carol").with_color("#123456")]);
        assert!(found(&idx, "Alice").is_empty());
        assert!(!idx.is_known_name("Alice"));
        let carol = idx.get(&EntityId::Int(9)).unwrap();
        assert_eq!(carol.color.as_deref(), Some("#123456"));
        assert!(idx.get(&EntityId::Int(1)).is_none());
    }

    #[test]
    fn test_multibyte_text() {
        let idx = index(&["Zoë"]);
        let text = "Café with Zoë";
        let m = idx.find_known_mentions(text);
        assert_eq!(m.len(), 1);
        assert_eq!(&text[m[0].range()], "Zoë");
    }

    #[test]
    fn test_from_json_roster() {
        let idx = EntityIndex::from_json_str(
            r##"[{"id": 1, "name": "Alice", "color": "#f00"}, {"id": "x", "name": "Bob"}]"##,
        )
        .unwrap();
        assert_eq!(idx.len(), 2);
        assert!(idx.get(&EntityId::from("x")).is_some());
        assert!(EntityIndex::from_json_str("{").is_err());
    }
}
