//! Native lowering: DFA to loadable machine code.
//!
//! A deterministic automaton is serialized to a small C routine, compiled by
//! the system toolchain into a shared module, and loaded back into the
//! process. The resulting [`CompiledMatcher`] answers `test_match` through
//! the resolved entry point with exactly the interpreted semantics.
//!
//! # Module Organization
//!
//! - `codegen`: C source emission (`emit_source`, `ENTRY_SYMBOL`)
//! - `loader`: toolchain invocation, dynamic loading, artifact lifecycle

mod codegen;
mod loader;

use std::fmt;

pub use codegen::{emit_source, ENTRY_SYMBOL};
pub use loader::{compile, CompiledMatcher};

/// Errors from the native lowering pipeline.
///
/// These are environment failures (toolchain availability, filesystem,
/// loader), not automaton bugs; callers can fall back to interpreted
/// matching.
#[derive(Debug)]
pub enum JitError {
    /// The toolchain could not be invoked or produced no module.
    CompileFailure(String),
    /// The produced module could not be loaded.
    LoadFailure(String),
    /// The loaded module does not export the entry point.
    SymbolResolution(String),
}

impl fmt::Display for JitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JitError::CompileFailure(msg) => write!(f, "native compile failed: {}", msg),
            JitError::LoadFailure(msg) => write!(f, "loading module failed: {}", msg),
            JitError::SymbolResolution(msg) => {
                write!(f, "resolving {} failed: {}", ENTRY_SYMBOL, msg)
            }
        }
    }
}

impl std::error::Error for JitError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Dfa;
    use crate::regexp::Expr;

    fn pairs_of_bs_dfa() -> Dfa {
        Expr::concat(
            Expr::concat(
                Expr::literal(b'a'),
                Expr::one_or_more(Expr::concat(Expr::literal(b'b'), Expr::literal(b'b'))),
            ),
            Expr::literal(b'a'),
        )
        .to_nfa()
        .lower()
    }

    #[test]
    fn test_compiled_matcher_matches_dfa() {
        let dfa = pairs_of_bs_dfa();
        let matcher = compile(&dfa).unwrap();

        for input in [
            &b"aa"[..],
            b"aba",
            b"abba",
            b"abbba",
            b"abbbba",
            b"",
            b"a",
            b"abbab",
            b"abbbbbbbbbbbbbbbbbbbba",
        ] {
            assert_eq!(
                matcher.test_match(input),
                dfa.test_match(input),
                "diverged on {:?}",
                input
            );
        }
    }

    #[test]
    fn test_compiled_matcher_scenario_cases() {
        let matcher = compile(&pairs_of_bs_dfa()).unwrap();
        assert!(!matcher.test_match(b"aa"));
        assert!(!matcher.test_match(b"aba"));
        assert!(matcher.test_match(b"abba"));
        assert!(!matcher.test_match(b"abbba"));
        assert!(matcher.test_match(b"abbbba"));
    }

    #[test]
    fn test_artifacts_removed_on_drop() {
        let dfa = pairs_of_bs_dfa();
        let matcher = compile(&dfa).unwrap();
        let source = matcher.source_path().to_path_buf();
        let module = matcher.module_path().to_path_buf();
        assert!(source.exists());
        assert!(module.exists());

        drop(matcher);
        assert!(!source.exists());
        assert!(!module.exists());
    }

    #[test]
    fn test_hand_built_scenario_through_all_stages() {
        let nfa = crate::automaton::tests::literal_alternative_nfa();
        let dfa = nfa.lower();
        let matcher = compile(&dfa).unwrap();
        for &(input, expected) in crate::automaton::tests::LITERAL_ALTERNATIVE_CASES {
            assert_eq!(nfa.test_match(input), expected, "nfa {:?}", input);
            assert_eq!(dfa.test_match(input), expected, "dfa {:?}", input);
            assert_eq!(matcher.test_match(input), expected, "native {:?}", input);
        }
    }

    #[test]
    fn test_concurrent_compiles_get_distinct_paths() {
        let dfa = pairs_of_bs_dfa();
        let first = compile(&dfa).unwrap();
        let second = compile(&dfa).unwrap();
        assert_ne!(first.module_path(), second.module_path());
        assert!(first.test_match(b"abba"));
        assert!(second.test_match(b"abba"));
    }
}
