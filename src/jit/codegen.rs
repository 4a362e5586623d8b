//! C source emission for a deterministic automaton.
//!
//! The emitted routine is a direct transliteration of the transition table:
//! one labeled block per state. A block returns the state's match flag when
//! no input remains, otherwise consumes one byte and compares it against the
//! state's edges in insertion order, falling through to reject. Bytes are
//! emitted as hex integer literals so quote and escape bytes need no special
//! casing.

use crate::automaton::{Dfa, StateId};

/// Name of the generated entry point.
///
/// Contract: `int remex_match(const unsigned char *input, size_t len)`,
/// returning nonzero on match.
pub const ENTRY_SYMBOL: &str = "remex_match";

/// Emit the matcher routine for `dfa`.
///
/// Panics if the automaton is unusable.
pub fn emit_source(dfa: &Dfa) -> String {
    assert!(dfa.is_usable(), "emit_source on unusable automaton");

    let mut src = String::new();
    src.push_str("#include <stddef.h>\n\n");
    src.push_str(&format!(
        "int {}(const unsigned char *input, size_t len) {{\n",
        ENTRY_SYMBOL
    ));
    src.push_str("    unsigned char ch;\n");

    // The start state is not necessarily block zero.
    let start = dfa.start().expect("usable");
    src.push_str(&format!("    goto s{};\n", start.index()));

    for i in 0..dfa.num_states() {
        let id = StateId::from_index(i);
        let flag = if dfa.is_match(id) { 1 } else { 0 };
        src.push_str(&format!("s{}:\n", i));
        src.push_str(&format!("    if (len == 0) {{ return {}; }}\n", flag));
        src.push_str("    ch = *input; ++input; --len;\n");
        for &(byte, to) in dfa.edges(id) {
            src.push_str(&format!(
                "    if (ch == {:#04x}) {{ goto s{}; }}\n",
                byte,
                to.index()
            ));
        }
        src.push_str("    return 0;\n");
    }

    src.push_str("}\n");
    src
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab_dfa() -> Dfa {
        let mut dfa = Dfa::new();
        let a = dfa.add_state();
        let b = dfa.add_state();
        dfa.set_start(a).unwrap();
        dfa.add_match(b).unwrap();
        dfa.add_edge(a, b'a', b).unwrap();
        dfa.add_edge(b, b'b', a).unwrap();
        dfa
    }

    #[test]
    fn test_emit_blocks_and_entry() {
        let src = emit_source(&ab_dfa());
        assert!(src.contains("int remex_match(const unsigned char *input, size_t len)"));
        assert!(src.contains("goto s0;"));
        assert!(src.contains("s0:\n"));
        assert!(src.contains("s1:\n"));
        // 'a' edge out of s0, 'b' edge out of s1
        assert!(src.contains("if (ch == 0x61) { goto s1; }"));
        assert!(src.contains("if (ch == 0x62) { goto s0; }"));
    }

    #[test]
    fn test_emit_match_flags() {
        let src = emit_source(&ab_dfa());
        // s0 rejects at end of input, s1 accepts.
        let s0 = src.find("s0:\n").unwrap();
        let s1 = src.find("s1:\n").unwrap();
        assert!(src[s0..s1].contains("if (len == 0) { return 0; }"));
        assert!(src[s1..].contains("if (len == 0) { return 1; }"));
    }

    #[test]
    fn test_emit_jumps_to_start_block() {
        // Build a DFA whose start is not state zero.
        let mut dfa = Dfa::new();
        let a = dfa.add_state();
        let b = dfa.add_state();
        dfa.set_start(b).unwrap();
        dfa.add_match(a).unwrap();
        dfa.add_edge(b, b'x', a).unwrap();

        let src = emit_source(&dfa);
        assert!(src.contains("goto s1;"));
    }

    #[test]
    #[should_panic]
    fn test_emit_unusable_panics() {
        emit_source(&Dfa::new());
    }
}
