//! remex: a compact regular-language engine.
//!
//! Expressions from a small combinator algebra compile to nondeterministic
//! automata, lower to deterministic automata by subset construction, and can
//! additionally be translated to native code loaded back into the process.
//! All three stages answer `test_match` with identical results for every
//! input.
//!
//! - [`Expr`]: literal / concat / alt / optional / one-or-more combinators
//! - [`Nfa`]: epsilon-capable automaton, simulated over live state sets
//! - [`Dfa`]: the lowered form, simulated by a direct walk
//! - [`jit`]: C emission, toolchain invocation, dynamic loading
//!
//! ```
//! use remex::Expr;
//!
//! // a(bb)+a
//! let expr = Expr::concat(
//!     Expr::concat(
//!         Expr::literal(b'a'),
//!         Expr::one_or_more(Expr::concat(Expr::literal(b'b'), Expr::literal(b'b'))),
//!     ),
//!     Expr::literal(b'a'),
//! );
//!
//! let nfa = expr.to_nfa();
//! let dfa = nfa.lower();
//! assert!(nfa.test_match(b"abba"));
//! assert!(dfa.test_match(b"abbbba"));
//! assert!(!dfa.test_match(b"abbba"));
//! ```
//!
//! Native matching needs a C toolchain on the host:
//!
//! ```no_run
//! # use remex::Expr;
//! let dfa = Expr::literal(b'a').to_nfa().lower();
//! let matcher = remex::compile(&dfa)?;
//! assert!(matcher.test_match(b"a"));
//! # Ok::<(), remex::JitError>(())
//! ```

pub mod automaton;
pub mod jit;
pub mod regexp;

pub use automaton::{AutomatonError, Dfa, Nfa, NfaEdge, StateId, StateSet};
pub use jit::{compile, CompiledMatcher, JitError};
pub use regexp::Expr;
