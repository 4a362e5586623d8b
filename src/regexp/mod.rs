//! Expression combinators compiled to automata.
//!
//! The algebra is deliberately small: byte literals, concatenation,
//! alternation, optional, one-or-more. There is no text syntax; expressions
//! are composed explicitly and lowered through [`Expr::to_nfa`].

mod expr;

pub use expr::Expr;
