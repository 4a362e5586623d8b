//! Byte-level finite automata and their lowering.
//!
//! Two automaton kinds share one state container:
//!
//! - `Nfa`: epsilon and byte edges, simulated over a live state set
//! - `Dfa`: one successor per byte per state, simulated by a direct walk
//!
//! # Module Organization
//!
//! - `graph`: `StateId`, the shared `StateGraph` container, construction errors
//! - `state_set`: canonical sorted state sets (closure results, cache keys)
//! - `sparse_set`: constant-time-clear scratch sets for traversal
//! - `nfa`: nondeterministic automaton, epsilon closure, fragment splicing
//! - `dfa`: deterministic automaton
//! - `subset`: `Nfa::lower()` subset construction

mod dfa;
mod graph;
mod nfa;
mod sparse_set;
mod state_set;
mod subset;

pub use dfa::Dfa;
pub use graph::{AutomatonError, StateId};
pub use nfa::{Nfa, NfaEdge};
pub use sparse_set::{SparseSet, SparseSets};
pub use state_set::StateSet;
