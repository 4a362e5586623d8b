//! The expression combinator algebra.
//!
//! An [`Expr`] is a closed tree of five combinators. It can render itself as
//! a conventional pattern string (diagnostics only) and compile itself to an
//! [`Nfa`] fragment. Compilation is Thompson-style: each sub-expression
//! becomes a self-contained fragment spliced exactly once into its parent,
//! so composed automata never share or collide state ids.

use crate::automaton::{AutomatonError, Nfa};

/// A regular-language expression.
///
/// Build trees with the constructor helpers:
///
/// ```
/// use remex::Expr;
///
/// // a(bb)+a
/// let expr = Expr::concat(
///     Expr::concat(
///         Expr::literal(b'a'),
///         Expr::one_or_more(Expr::concat(Expr::literal(b'b'), Expr::literal(b'b'))),
///     ),
///     Expr::literal(b'a'),
/// );
/// assert_eq!(expr.to_pattern(), "a(bb)+a");
/// assert!(expr.to_nfa().test_match(b"abba"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Match exactly one byte.
    Literal(u8),
    /// Match the left then the right expression.
    Concat(Box<Expr>, Box<Expr>),
    /// Match either expression.
    Alt(Box<Expr>, Box<Expr>),
    /// Match the expression zero or one times.
    Optional(Box<Expr>),
    /// Match the expression one or more times.
    OneOrMore(Box<Expr>),
}

impl Expr {
    pub fn literal(byte: u8) -> Expr {
        Expr::Literal(byte)
    }

    pub fn concat(a: Expr, b: Expr) -> Expr {
        Expr::Concat(Box::new(a), Box::new(b))
    }

    pub fn alt(a: Expr, b: Expr) -> Expr {
        Expr::Alt(Box::new(a), Box::new(b))
    }

    pub fn optional(a: Expr) -> Expr {
        Expr::Optional(Box::new(a))
    }

    pub fn one_or_more(a: Expr) -> Expr {
        Expr::OneOrMore(Box::new(a))
    }

    /// Render with the conventional `|`, `?`, `+` operators.
    ///
    /// Purely diagnostic; matching semantics come from [`Expr::to_nfa`].
    pub fn to_pattern(&self) -> String {
        match self {
            Expr::Literal(byte) => {
                if byte.is_ascii_graphic() {
                    (*byte as char).to_string()
                } else {
                    format!("\\x{:02x}", byte)
                }
            }
            Expr::Concat(a, b) => format!("{}{}", a.to_pattern(), b.to_pattern()),
            Expr::Alt(a, b) => format!("({})|({})", a.to_pattern(), b.to_pattern()),
            Expr::Optional(a) => format!("({})?", a.to_pattern()),
            Expr::OneOrMore(a) => format!("({})+", a.to_pattern()),
        }
    }

    /// Compile to a fresh NFA accepting exactly this expression's language.
    pub fn to_nfa(&self) -> Nfa {
        self.build()
            .expect("combinator fragments only use locally issued ids")
    }

    fn build(&self) -> Result<Nfa, AutomatonError> {
        let mut nfa = Nfa::new();
        let start = nfa.add_state();
        nfa.set_start(start)?;

        match self {
            Expr::Literal(byte) => {
                let done = nfa.add_state();
                nfa.add_match(done)?;
                nfa.add_edge(start, Some(*byte), done)?;
            }
            Expr::Concat(a, b) => {
                let mid = nfa.splice(start, &a.build()?)?;
                let done = nfa.splice(mid, &b.build()?)?;
                nfa.add_match(done)?;
            }
            Expr::Alt(a, b) => {
                let left = nfa.splice(start, &a.build()?)?;
                let right = nfa.splice(start, &b.build()?)?;
                nfa.add_match(left)?;
                nfa.add_match(right)?;
            }
            Expr::Optional(a) => {
                let done = nfa.splice(start, &a.build()?)?;
                nfa.add_match(done)?;
                // Zero occurrences: skip straight to the accepting point.
                nfa.add_edge(start, None, done)?;
            }
            Expr::OneOrMore(a) => {
                let done = nfa.splice(start, &a.build()?)?;
                nfa.add_match(done)?;
                // Loop back for another occurrence.
                nfa.add_edge(done, None, start)?;
            }
        }

        Ok(nfa)
    }
}
