//! Canonical state sets.
//!
//! A `StateSet` is the value type for epsilon-closure results and the
//! determinization cache key. Members are kept sorted and deduplicated, so
//! two sets compare equal iff they contain the same ids, independently of
//! insertion order, and hashing a set never depends on how it was built.
//!
//! Hash equality alone is never trusted: the sets live in an `FxHashMap`,
//! whose lookups confirm candidates with full `Eq` on the sorted members.

use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use super::graph::StateId;

/// A canonical, order-independent set of states from one automaton.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateSet {
    // Sorted ascending, no duplicates.
    ids: SmallVec<[StateId; 8]>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(id: StateId) -> Self {
        let mut ids = SmallVec::new();
        ids.push(id);
        StateSet { ids }
    }

    /// Insert an id, keeping the members sorted. Returns true if the id was
    /// not already present.
    pub fn insert(&mut self, id: StateId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.ids.insert(pos, id);
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, id: StateId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateId>>(iter: T) -> Self {
        let mut ids: SmallVec<[StateId; 8]> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        StateSet { ids }
    }
}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Members are sorted, so this is a content hash.
        for id in &self.ids {
            state.write_u32(id.0);
        }
    }
}
