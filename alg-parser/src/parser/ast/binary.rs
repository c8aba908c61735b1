use std::ops::Range;
use super::{Expr, Unary};
use crate::{
    parser::{
        error::Error,
        op::{BinOp, BinOpKind, Precedence},
        Parser,
    },
    tokenizer::TokenKind,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary expression, such as `1 + 2`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns true if the next token opens an operand, which after a complete operand means
    /// implicit multiplication (`2pi`, `3x y`, `2 sin(x)`).
    ///
    /// A leading `-` never starts an implicit factor; it is always taken as subtraction.
    fn peek_starts_operand(input: &Parser) -> bool {
        matches!(
            input.peek_kind(),
            Some(TokenKind::Num | TokenKind::Name | TokenKind::OpenParen)
        )
    }

    /// Precedence-climbing loop: extends `lhs` with every following operator that binds at least
    /// as tightly as `min`.
    pub fn parse_with<'source>(
        input: &mut Parser<'source>,
        mut lhs: Expr,
        min: Precedence,
    ) -> Result<Expr, Error> {
        loop {
            // explicit operator
            let mut ahead = input.clone();
            if let Ok(op) = ahead.try_parse::<BinOp>() {
                if op.precedence() < min {
                    break;
                }

                input.set_cursor(&ahead);
                let operand = Unary::parse_or_lower(input)?;
                // all operators handled here are left-associative, so the right-hand side only
                // absorbs strictly tighter-binding operators
                let rhs = Self::parse_with(input, operand, op.precedence().next())?;
                let span = lhs.span().start..rhs.span().end;
                lhs = Expr::Binary(Binary {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                    span,
                });
                continue;
            }

            // implicit multiplication
            if Precedence::Factor >= min && Self::peek_starts_operand(input) {
                let operand = Unary::parse_or_lower(input)?;
                let rhs = Self::parse_with(input, operand, Precedence::Factor.next())?;
                let op_span = lhs.span().end..rhs.span().start;
                let span = lhs.span().start..rhs.span().end;
                lhs = Expr::Binary(Binary {
                    lhs: Box::new(lhs),
                    op: BinOp { kind: BinOpKind::Mul, implicit: true, span: op_span },
                    rhs: Box::new(rhs),
                    span,
                });
                continue;
            }

            break;
        }

        Ok(lhs)
    }
}
