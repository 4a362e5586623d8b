//! Subset construction: lowering an [`Nfa`] to a [`Dfa`].
//!
//! Epsilon-closed sets of NFA states become single DFA states. A cache keyed
//! by the canonical [`StateSet`] bounds the DFA to the number of distinct
//! reachable subsets; a set is registered in the cache before its successors
//! are explored, so cyclic epsilon structure terminates.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use super::dfa::Dfa;
use super::graph::StateId;
use super::nfa::Nfa;
use super::state_set::StateSet;

impl Nfa {
    /// Lower to an equivalent deterministic automaton.
    ///
    /// Out-edges of each subset are grouped by byte in ascending byte order,
    /// so the resulting DFA's state numbering and edge order are a pure
    /// function of this automaton. Cannot fail on a usable automaton.
    ///
    /// Panics if the automaton is unusable.
    pub fn lower(&self) -> Dfa {
        assert!(self.is_usable(), "lower on unusable automaton");

        let mut dfa = Dfa::new();
        let mut cache: FxHashMap<StateSet, StateId> = FxHashMap::default();
        let mut worklist: Vec<StateSet> = Vec::new();

        let start_set =
            self.epsilon_closure(&StateSet::singleton(self.start().expect("usable")));
        let dfa_start = dfa.add_state();
        if start_set.iter().any(|s| self.is_match(s)) {
            dfa.add_match(dfa_start).expect("fresh state");
        }
        cache.insert(start_set.clone(), dfa_start);
        dfa.set_start(dfa_start).expect("first set_start");
        worklist.push(start_set);

        while let Some(current) = worklist.pop() {
            let from = *cache.get(&current).expect("worklist sets are cached");

            // Union the byte-labeled targets of every member, per byte.
            let mut moves: BTreeMap<u8, StateSet> = BTreeMap::new();
            for state in current.iter() {
                for &(cond, to) in self.edges(state) {
                    if let Some(byte) = cond {
                        moves.entry(byte).or_default().insert(to);
                    }
                }
            }

            for (byte, targets) in moves {
                let closed = self.epsilon_closure(&targets);
                let to = match cache.get(&closed) {
                    Some(&existing) => existing,
                    None => {
                        let fresh = dfa.add_state();
                        if closed.iter().any(|s| self.is_match(s)) {
                            dfa.add_match(fresh).expect("fresh state");
                        }
                        cache.insert(closed.clone(), fresh);
                        worklist.push(closed);
                        fresh
                    }
                };
                dfa.add_edge(from, byte, to).expect("one edge per byte");
            }
        }

        dfa
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // a|b through shared epsilon structure
    fn alt_nfa() -> Nfa {
        let mut nfa = Nfa::new();
        let start = nfa.add_state();
        let left = nfa.add_state();
        let right = nfa.add_state();
        let done = nfa.add_state();
        nfa.set_start(start).unwrap();
        nfa.add_match(done).unwrap();
        nfa.add_edge(start, None, left).unwrap();
        nfa.add_edge(start, None, right).unwrap();
        nfa.add_edge(left, Some(b'a'), done).unwrap();
        nfa.add_edge(right, Some(b'b'), done).unwrap();
        nfa
    }

    #[test]
    fn test_lower_preserves_language() {
        let nfa = alt_nfa();
        let dfa = nfa.lower();
        for input in [&b"a"[..], b"b", b"", b"ab", b"c"] {
            assert_eq!(nfa.test_match(input), dfa.test_match(input), "{:?}", input);
        }
    }

    #[test]
    fn test_lower_terminates_on_epsilon_cycle() {
        let mut nfa = Nfa::new();
        let a = nfa.add_state();
        let b = nfa.add_state();
        nfa.set_start(a).unwrap();
        nfa.add_match(b).unwrap();
        nfa.add_edge(a, None, b).unwrap();
        nfa.add_edge(b, None, a).unwrap();
        nfa.add_edge(b, Some(b'x'), b).unwrap();

        let dfa = nfa.lower();
        assert!(dfa.test_match(b""));
        assert!(dfa.test_match(b"xxx"));
        assert!(!dfa.test_match(b"y"));
    }

    #[test]
    fn test_lower_output_is_deterministic() {
        let nfa = alt_nfa();
        assert_eq!(nfa.lower().render(), nfa.lower().render());
    }

    #[test]
    fn test_lower_targets_in_range() {
        let dfa = alt_nfa().lower();
        for i in 0..dfa.num_states() {
            for &(_, to) in dfa.edges(StateId::from_index(i)) {
                assert!(to.index() < dfa.num_states());
            }
        }
    }

    #[test]
    fn test_equal_subsets_share_a_dfa_state() {
        // Both branches lead to the same singleton subset {done}; the DFA
        // must not duplicate it.
        let dfa = alt_nfa().lower();
        assert_eq!(dfa.num_states(), 2);
    }
}
