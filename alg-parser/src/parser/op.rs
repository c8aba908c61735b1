//! Binary and unary operator tokens, with their precedence table.

use std::ops::Range;
use super::{error::{kind, Error}, Parse, Parser};
use crate::tokenizer::TokenKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The precedence levels of the operators, from loosest-binding to tightest-binding.
///
/// Implicit multiplication shares [`Precedence::Factor`] with `*` and `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any expression.
    Any,

    /// The `=` of a rule equation.
    Equation,

    /// Addition and subtraction.
    Term,

    /// Multiplication and division, explicit or implicit.
    Factor,

    /// Unary minus.
    Unary,

    /// Exponentiation.
    Exp,
}

impl Precedence {
    /// Returns the next-tightest precedence level.
    pub fn next(self) -> Precedence {
        match self {
            Self::Any => Self::Equation,
            Self::Equation => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Unary,
            Self::Unary | Self::Exp => Self::Exp,
        }
    }
}

/// The binary operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Eq,
    Add,
    Sub,
    Mul,
    Div,
    Exp,
}

impl BinOpKind {
    /// Returns the precedence of the binary operation.
    pub fn precedence(self) -> Precedence {
        match self {
            Self::Eq => Precedence::Equation,
            Self::Add | Self::Sub => Precedence::Term,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Exp => Precedence::Exp,
        }
    }
}

/// A binary operator together with its source span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of operation.
    pub kind: BinOpKind,

    /// Whether the operator was implied by juxtaposition rather than written out. Only ever true
    /// for multiplication.
    pub implicit: bool,

    /// The region of the source code this operator was parsed from. Empty for implicit
    /// multiplication.
    pub span: Range<usize>,
}

impl BinOp {
    /// Returns the precedence of the operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }
}

/// [`BinOp`] parsing covers the infix operators the climbing loop handles; `^` is bound at the
/// exponent level instead and is intentionally excluded here.
impl<'source> Parse<'source> for BinOp {
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Eq => BinOpKind::Eq,
            TokenKind::Add => BinOpKind::Add,
            TokenKind::Sub => BinOpKind::Sub,
            TokenKind::Mul => BinOpKind::Mul,
            TokenKind::Div => BinOpKind::Div,
            _ => return Err(Error::new(token.span, kind::UnexpectedToken {
                expected: &[
                    TokenKind::Eq,
                    TokenKind::Add,
                    TokenKind::Sub,
                    TokenKind::Mul,
                    TokenKind::Div,
                ],
                found: token.kind,
            })),
        };

        Ok(Self { kind, implicit: false, span: token.span })
    }
}

/// The unary operation being performed. Negation is the only one in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    Neg,
}

/// A unary operator together with its source span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    /// The kind of operation.
    pub kind: UnaryOpKind,

    /// The region of the source code this operator was parsed from.
    pub span: Range<usize>,
}

impl<'source> Parse<'source> for UnaryOp {
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Sub => Ok(Self { kind: UnaryOpKind::Neg, span: token.span }),
            _ => Err(Error::new(token.span, kind::UnexpectedToken {
                expected: &[TokenKind::Sub],
                found: token.kind,
            })),
        }
    }
}
