use std::ops::Range;
use super::{parse_primary, Binary, Expr};
use crate::{
    parser::{
        error::Error,
        op::{BinOp, BinOpKind, UnaryOp},
        Parser,
    },
    tokenizer::TokenKind,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary expression, such as `-x`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operator.
    pub op: UnaryOp,

    /// The operand.
    pub operand: Box<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Parses a unary expression, or anything that binds tighter (an exponentiation or a primary
    /// expression).
    ///
    /// The exponent operator is handled here rather than in the precedence-climbing loop because
    /// it binds tighter than unary minus on its left but looser on its right: `-x^2` is `-(x^2)`,
    /// while `x^-2` is a legal way to write a negative exponent. Making `^` right-associative by
    /// recursing through this function covers both.
    pub fn parse_or_lower<'source>(input: &mut Parser<'source>) -> Result<Expr, Error> {
        let mut ahead = input.clone();
        if let Ok(op) = ahead.try_parse::<UnaryOp>() {
            input.set_cursor(&ahead);
            let operand = Self::parse_or_lower(input)?;
            let span = op.span.start..operand.span().end;
            return Ok(Expr::Unary(Unary {
                op,
                operand: Box::new(operand),
                span,
            }));
        }

        let lhs = parse_primary(input)?;
        if input.peek_kind() == Some(TokenKind::Exp) {
            let op_token = input.next_token()?;
            let rhs = Self::parse_or_lower(input)?;
            let span = lhs.span().start..rhs.span().end;
            return Ok(Expr::Binary(Binary {
                lhs: Box::new(lhs),
                op: BinOp { kind: BinOpKind::Exp, implicit: false, span: op_token.span },
                rhs: Box::new(rhs),
                span,
            }));
        }

        Ok(lhs)
    }
}
