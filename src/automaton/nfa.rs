//! Nondeterministic automaton.
//!
//! Edges are either epsilon (consume no input) or a single byte. A state may
//! carry any number of edges, including several for the same byte and
//! several epsilons. Simulation keeps the epsilon-closed set of live states
//! in a [`SparseSets`] pair, swapping current/next per input byte.

use std::fmt;

use smallvec::SmallVec;

use super::graph::{byte_label, AutomatonError, StateGraph, StateId};
use super::sparse_set::{SparseSet, SparseSets};
use super::state_set::StateSet;

/// An edge out of an NFA state. `None` is epsilon.
pub type NfaEdge = (Option<u8>, StateId);

type EdgeList = SmallVec<[NfaEdge; 4]>;

/// A nondeterministic automaton over bytes.
#[derive(Clone, Debug, Default)]
pub struct Nfa {
    graph: StateGraph<EdgeList>,
}

impl Nfa {
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

    /// Append an edge. `None` for `cond` is an epsilon edge. Duplicate edges
    /// are legal; this is where the nondeterminism lives.
    pub fn add_edge(
        &mut self,
        from: StateId,
        cond: Option<u8>,
        to: StateId,
    ) -> Result<(), AutomatonError> {
        self.graph.check(from)?;
        self.graph.check(to)?;
        self.graph.edges_mut(from).push((cond, to));
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
    pub fn edges(&self, state: StateId) -> &[NfaEdge] {
        self.graph.edges(state)
    }

    /// Epsilon-close a sparse working set in place.
    fn close_epsilon(&self, set: &mut SparseSet) {
        let mut stack: Vec<StateId> = set.iter().collect();
        while let Some(state) = stack.pop() {
            set.insert(state);
            for &(cond, to) in self.graph.edges(state) {
                if cond.is_none() && !set.contains(to) {
                    set.insert(to);
                    stack.push(to);
                }
            }
        }
    }

    /// The canonical set reachable from `states` via epsilon edges alone,
    /// including `states` itself. Idempotent and insertion-order independent.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut scratch = SparseSet::new(self.graph.len());
        for id in states.iter() {
            scratch.insert(id);
        }
        self.close_epsilon(&mut scratch);
        scratch.iter().collect()
    }

    /// Simulate the automaton over `input`.
    ///
    /// Maintains the epsilon-closed set of live states; each byte moves
    /// every live state along its matching edges, then re-closes. Accepts
    /// iff the final set intersects the accepting set.
    ///
    /// Panics if the automaton is unusable (no states, no start, or no
    /// accepting states) - that is a construction bug, not a match failure.
    pub fn test_match(&self, input: &[u8]) -> bool {
        assert!(self.is_usable(), "test_match on unusable automaton");

        let mut sets = SparseSets::new(self.graph.len());
        sets.current.insert(self.graph.start().expect("usable"));
        self.close_epsilon(&mut sets.current);

        for &byte in input {
            if sets.current.is_empty() {
                // No live states can ever come back.
                break;
            }

            for state in sets.current.iter() {
                for &(cond, to) in self.graph.edges(state) {
                    if cond == Some(byte) {
                        sets.next.insert(to);
                    }
                }
            }

            self.close_epsilon(&mut sets.next);
            sets.swap();
            sets.next.clear();
        }

        let matched = sets.current.iter().any(|state| self.graph.is_match(state));
        matched
    }

    /// Splice a copy of `fragment` into this automaton at `at`.
    ///
    /// Every fragment state is copied under a fresh id (edge topology
    /// preserved through the remap), an epsilon edge connects `at` to the
    /// image of the fragment's start, and a new join state collects an
    /// epsilon edge from the image of every fragment accepting state. The
    /// join state is returned as the new accepting point; marking it
    /// accepting is the caller's decision.
    ///
    /// The fragment is borrowed, never mutated, so it can be spliced into
    /// any number of destinations.
    pub fn splice(&mut self, at: StateId, fragment: &Nfa) -> Result<StateId, AutomatonError> {
        self.graph.check(at)?;
        let frag_start = fragment
            .graph
            .start()
            .expect("fragment has a start state");

        let remap: Vec<StateId> = (0..fragment.graph.len())
            .map(|_| self.graph.add_state())
            .collect();

        for (id, edges) in fragment.graph.iter() {
            for &(cond, to) in edges {
                self.graph
                    .edges_mut(remap[id.index()])
                    .push((cond, remap[to.index()]));
            }
        }

        self.graph
            .edges_mut(at)
            .push((None, remap[frag_start.index()]));

        let join = self.graph.add_state();
        for (id, _) in fragment.graph.iter() {
            if fragment.graph.is_match(id) {
                self.graph.edges_mut(remap[id.index()]).push((None, join));
            }
        }

        Ok(join)
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
            for &(cond, to) in edges {
                match cond {
                    Some(byte) => out.push_str(&format!("    {} -> {}\n", byte_label(byte), to)),
                    None => out.push_str(&format!("    eps -> {}\n", to)),
                }
            }
        }
        out
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
