use std::ops::Range;
use super::Expr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parenthesized expression, such as `(x + y)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub inner: Box<Expr>,

    /// The region of the source code that this expression was parsed from, including the
    /// parentheses.
    pub span: Range<usize>,
}

impl Paren {
    /// Unwraps nested parentheses, returning the innermost expression.
    pub fn into_innermost(self) -> Expr {
        let mut inner = *self.inner;
        while let Expr::Paren(paren) = inner {
            inner = *paren.inner;
        }
        inner
    }
}
