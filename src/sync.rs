//! Roster snapshot sharing across threads.
//!
//! The lock only guards a pointer: readers clone the current
//! `Arc<EntityIndex>` and release the lock before annotating, writers build a
//! new index outside the lock and swap it in. An annotate call therefore
//! always sees one complete roster, never a half-rebuilt one.
//!
//! Uses `parking_lot::Mutex` when the `fast-lock` feature is enabled, falling
//! back to `std::sync::Mutex` otherwise.

use crate::EntityIndex;
use rapport_core::Entity;
use std::sync::Arc;

#[cfg(feature = "fast-lock")]
use parking_lot::Mutex as ParkingLotMutex;

#[cfg(not(feature = "fast-lock"))]
use std::sync::Mutex as StdMutex;

/// Mutex type that conditionally uses parking_lot or std::sync::Mutex.
#[cfg(feature = "fast-lock")]
pub type Mutex<T> = ParkingLotMutex<T>;

/// Mutex type that conditionally uses parking_lot or std::sync::Mutex.
#[cfg(not(feature = "fast-lock"))]
pub type Mutex<T> = StdMutex<T>;

/// Lock a mutex and return the guard, handling poisoning gracefully.
///
/// For `parking_lot::Mutex`, this is just `mutex.lock()`.
/// For `std::sync::Mutex`, this handles poisoning by recovering the guard.
#[cfg(feature = "fast-lock")]
pub fn lock<T>(mutex: &Mutex<T>) -> parking_lot::MutexGuard<'_, T> {
    mutex.lock()
}

/// Lock a mutex and return the guard, handling poisoning gracefully.
///
/// For `parking_lot::Mutex`, this is just `mutex.lock()`.
/// For `std::sync::Mutex`, this handles poisoning by recovering the guard.
#[cfg(not(feature = "fast-lock"))]
pub fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// A swappable, shareable [`EntityIndex`] snapshot.
///
/// ```rust
/// use rapport::{annotate, Entity, SharedIndex};
///
/// let shared = SharedIndex::new();
/// shared.replace(vec![Entity::new(1, "Alice")]);
///
/// let snapshot = shared.snapshot();
/// let annotation = annotate("Alice called", &snapshot);
/// assert_eq!(annotation.detected.known().count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SharedIndex {
    current: Mutex<Arc<EntityIndex>>,
}

impl SharedIndex {
    /// Start with an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing index.
    #[must_use]
    pub fn from_index(index: EntityIndex) -> Self {
        Self {
            current: Mutex::new(Arc::new(index)),
        }
    }

    /// The current snapshot. Holding it never blocks writers.
    #[must_use]
    pub fn snapshot(&self) -> Arc<EntityIndex> {
        Arc::clone(&lock(&self.current))
    }

    /// Build an index from `entities` and install it.
    pub fn replace(&self, entities: impl IntoIterator<Item = Entity>) {
        self.install(EntityIndex::from_entities(entities));
    }

    /// Install a prebuilt index, returning the previous snapshot.
    pub fn install(&self, index: EntityIndex) -> Arc<EntityIndex> {
        let next = Arc::new(index);
        std::mem::replace(&mut *lock(&self.current), next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_snapshot_survives_replace() {
        let shared = SharedIndex::new();
        shared.replace(vec![Entity::new(1, "Alice")]);
        let old = shared.snapshot();

        shared.replace(vec![Entity::new(2, "Bob")]);
        let new = shared.snapshot();

        assert!(old.is_known_name("Alice"));
        assert!(!old.is_known_name("Bob"));
        assert!(new.is_known_name("Bob"));
        assert!(!new.is_known_name("Alice"));
    }

    #[test]
    fn test_install_returns_previous() {
        let shared = SharedIndex::from_index(EntityIndex::from_entities(vec![Entity::new(
            1, "Alice",
        )]));
        let prev = shared.install(EntityIndex::new());
        assert_eq!(prev.len(), 1);
        assert!(shared.snapshot().is_empty());
    }

    #[test]
    fn test_concurrent_readers_see_whole_rosters() {
        let shared = Arc::new(SharedIndex::new());
        shared.replace(vec![Entity::new(1, "Alice"), Entity::new(2, "Bob")]);

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..200 {
                    if i % 2 == 0 {
                        shared.replace(vec![Entity::new(3, "Carol"), Entity::new(4, "Dave")]);
                    } else {
                        shared.replace(vec![Entity::new(1, "Alice"), Entity::new(2, "Bob")]);
                    }
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snap = shared.snapshot();
                        // Either roster, never a mix.
                        assert_eq!(snap.len(), 2);
                        assert_eq!(snap.is_known_name("Alice"), snap.is_known_name("Bob"));
                        assert_eq!(snap.is_known_name("Carol"), snap.is_known_name("Dave"));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
    }
}
