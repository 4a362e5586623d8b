//! Deterministic automaton.
//!
//! Each state maps a byte to at most one successor; there are no epsilon
//! edges. Per-state edge lists stay in insertion order - the native code
//! emitter relies on that - and lookups are a linear scan, which beats a
//! hash map at the alphabet sizes subset construction produces.

use std::fmt;

use smallvec::SmallVec;

use super::graph::{byte_label, AutomatonError, StateGraph, StateId};

type EdgeList = SmallVec<[(u8, StateId); 4]>;

/// A deterministic automaton over bytes.
#[derive(Clone, Debug, Default)]
pub struct Dfa {
    graph: StateGraph<EdgeList>,
}

impl Dfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh state.
    pub fn add_state(&mut self) -> StateId {
        self.graph.add_state()
    }

    /// Designate the start state. May be called exactly once.
    pub fn set_start(&mut self, state: StateId) -> Result<(), AutomatonError> {
        self.graph.set_start(state)
    }

    /// Add a state to the accepting set.
    pub fn add_match(&mut self, state: StateId) -> Result<(), AutomatonError> {
        self.graph.add_match(state)
    }

    /// Add the unique edge for `byte` out of `from`.
    ///
    /// Fails with [`AutomatonError::DuplicateEdge`] if `from` already has an
    /// edge for that byte; the existing edge is left intact.
    pub fn add_edge(&mut self, from: StateId, byte: u8, to: StateId) -> Result<(), AutomatonError> {
        self.graph.check(from)?;
        self.graph.check(to)?;
        if self.graph.edges(from).iter().any(|&(b, _)| b == byte) {
            return Err(AutomatonError::DuplicateEdge { from, byte });
        }
        self.graph.edges_mut(from).push((byte, to));
        Ok(())
    }

    #[inline]
    pub fn start(&self) -> Option<StateId> {
        self.graph.start()
    }

    #[inline]
    pub fn is_match(&self, state: StateId) -> bool {
        self.graph.is_match(state)
    }

    #[inline]
    pub fn num_states(&self) -> usize {
        self.graph.len()
    }

    #[inline]
    pub fn is_usable(&self) -> bool {
        self.graph.is_usable()
    }

    /// The edges out of a state, in insertion order.
    #[inline]
    pub fn edges(&self, state: StateId) -> &[(u8, StateId)] {
        self.graph.edges(state)
    }

    /// The successor of `state` on `byte`, if any.
    #[inline]
    pub fn step(&self, state: StateId, byte: u8) -> Option<StateId> {
        self.graph
            .edges(state)
            .iter()
            .find(|&&(b, _)| b == byte)
            .map(|&(_, to)| to)
    }

    /// Walk the automaton over `input`.
    ///
    /// A byte with no edge at the current state rejects immediately; the
    /// rest of the input is never scanned. Accepts iff the walk ends on an
    /// accepting state.
    ///
    /// Panics if the automaton is unusable (construction bug, not a match
    /// failure).
    pub fn test_match(&self, input: &[u8]) -> bool {
        assert!(self.is_usable(), "test_match on unusable automaton");

        let mut state = self.graph.start().expect("usable");
        for &byte in input {
            match self.step(state, byte) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.graph.is_match(state)
    }

    /// Diagnostic listing of every state and its outgoing edges.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (id, edges) in self.graph.iter() {
            out.push_str(&format!("state {}", id));
            if self.graph.start() == Some(id) {
                out.push_str(" (start)");
            }
            if self.graph.is_match(id) {
                out.push_str(" (match)");
            }
            out.push('\n');
            for &(byte, to) in edges {
                out.push_str(&format!("    {} -> {}\n", byte_label(byte), to));
            }
        }
        out
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_dfa() -> (Dfa, StateId, StateId) {
        let mut dfa = Dfa::new();
        let a = dfa.add_state();
        let b = dfa.add_state();
        dfa.set_start(a).unwrap();
        dfa.add_match(b).unwrap();
        (dfa, a, b)
    }

    #[test]
    fn test_duplicate_edge_rejected_first_intact() {
        let (mut dfa, a, b) = two_state_dfa();
        dfa.add_edge(a, b'a', b).unwrap();
        assert_eq!(
            dfa.add_edge(a, b'a', a),
            Err(AutomatonError::DuplicateEdge { from: a, byte: b'a' })
        );
        assert_eq!(dfa.step(a, b'a'), Some(b));
        assert_eq!(dfa.edges(a).len(), 1);
    }

    #[test]
    fn test_walk_and_reject() {
        let (mut dfa, a, b) = two_state_dfa();
        dfa.add_edge(a, b'a', b).unwrap();
        dfa.add_edge(b, b'b', b).unwrap();

        assert!(dfa.test_match(b"a"));
        assert!(dfa.test_match(b"ab"));
        assert!(dfa.test_match(b"abbb"));
        assert!(!dfa.test_match(b""));
        assert!(!dfa.test_match(b"b"));
        assert!(!dfa.test_match(b"aa"));
    }

    #[test]
    fn test_missing_edge_rejects_immediately() {
        let (mut dfa, a, b) = two_state_dfa();
        dfa.add_edge(a, b'a', b).unwrap();
        // 'z' has no edge from the start; the trailing "a"s are irrelevant.
        assert!(!dfa.test_match(b"zaaaaaaa"));
    }

    #[test]
    fn test_empty_input_matches_iff_start_accepting() {
        let mut dfa = Dfa::new();
        let a = dfa.add_state();
        dfa.set_start(a).unwrap();
        dfa.add_match(a).unwrap();
        assert!(dfa.test_match(b""));
    }

    #[test]
    #[should_panic]
    fn test_match_unusable_panics() {
        let dfa = Dfa::new();
        dfa.test_match(b"a");
    }

    #[test]
    fn test_edges_keep_insertion_order() {
        let (mut dfa, a, b) = two_state_dfa();
        dfa.add_edge(a, b'z', b).unwrap();
        dfa.add_edge(a, b'a', b).unwrap();
        dfa.add_edge(a, b'm', b).unwrap();
        let bytes: Vec<u8> = dfa.edges(a).iter().map(|&(byte, _)| byte).collect();
        assert_eq!(bytes, vec![b'z', b'a', b'm']);
    }
}
