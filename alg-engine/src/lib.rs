//! Rewrite-based simplification of symbolic expressions.
//!
//! The engine takes an expression tree, applies a table of bidirectional algebraic equivalences
//! to enumerate structurally different but mathematically equal forms, and best-first searches
//! that space for the form with the fewest operations.
//!
//! The three pieces, leaves first:
//!
//! - [`expr`] — the immutable expression tree, with the structural identity (total order,
//!   equality, hashing) everything else keys on.
//! - [`rewrite`] — the rule table, the placeholder matcher and substituter, and the memoized
//!   [`neighbors`](rewrite::neighbors) enumeration.
//! - [`search`] — the budgeted best-first walk with derivation replay.
//!
//! ```
//! use alg_engine::{parse, simplify_with, SearchLimits};
//!
//! let expr = parse("x + 0").unwrap();
//! let limits = SearchLimits { max_operations: 8, max_iterations: 256 };
//! assert_eq!(simplify_with(&expr, limits), parse("x").unwrap());
//! ```

pub mod expr;
pub mod rewrite;
pub mod search;

pub use expr::Expr;
pub use search::{simplify, simplify_with, simplify_with_steps, SearchLimits, StepCollector};

use alg_parser::parser::{ast::Expr as AstExpr, error::Error};
use alg_parser::Parser;

/// Parses a complete input line into an expression.
pub fn parse(input: &str) -> Result<Expr, Error> {
    let ast = Parser::new(input).try_parse_full::<AstExpr>()?;
    Ok(Expr::from(ast))
}

#[cfg(test)]
mod property_tests;
