//! The spanned abstract syntax tree produced by the parser.

pub mod binary;
pub mod call;
pub mod derivative;
pub mod literal;
pub mod paren;
pub mod unary;

pub use binary::Binary;
pub use call::Call;
pub use derivative::Derivative;
pub use literal::{LitNum, LitSym, Literal};
pub use paren::Paren;
pub use unary::Unary;

use std::ops::Range;
use super::{error::{kind, Error}, op::Precedence, Parse, Parser};
use crate::tokenizer::TokenKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Any expression the grammar can produce.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A number or name, such as `2.5` or `pi`.
    Literal(Literal),

    /// A parenthesized expression, such as `(x + y)`.
    Paren(Paren),

    /// A unary operation, such as `-x`.
    Unary(Unary),

    /// A binary operation, such as `x + y`.
    Binary(Binary),

    /// A function call, such as `sin(x)` or `log(x, b)`.
    Call(Call),

    /// A derivative form, such as `d/dx(x ^ 2)`.
    Derivative(Derivative),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Literal(literal) => literal.span(),
            Self::Paren(paren) => paren.span.clone(),
            Self::Unary(unary) => unary.span.clone(),
            Self::Binary(binary) => binary.span.clone(),
            Self::Call(call) => call.span.clone(),
            Self::Derivative(derivative) => derivative.span.clone(),
        }
    }
}

impl<'source> Parse<'source> for Expr {
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error> {
        let lhs = Unary::parse_or_lower(input)?;
        Binary::parse_with(input, lhs, Precedence::Any)
    }
}

/// Parses a primary expression: a literal, a parenthesized expression, a function call, or the
/// derivative form.
pub(crate) fn parse_primary<'source>(input: &mut Parser<'source>) -> Result<Expr, Error> {
    let token = input.next_token()?;
    match token.kind {
        TokenKind::OpenParen => {
            let inner = input.try_parse::<Expr>()?;
            let close = input
                .next_token()
                .map_err(|_| Error::new(token.span.clone(), kind::UnclosedParenthesis))?;
            if close.kind != TokenKind::CloseParen {
                return Err(Error::new(close.span, kind::UnexpectedToken {
                    expected: &[TokenKind::CloseParen],
                    found: close.kind,
                }));
            }

            Ok(Expr::Paren(Paren {
                span: token.span.start..close.span.end,
                inner: Box::new(inner),
            }))
        },
        TokenKind::Num => {
            let value = token
                .lexeme
                .parse::<f64>()
                .expect("the tokenizer only produces valid number literals");
            Ok(Expr::Literal(Literal::Num(LitNum { value, span: token.span })))
        },
        TokenKind::Name => {
            if token.lexeme == "d" {
                if let Some(derivative) = Derivative::parse_after_d(input, &token)? {
                    return Ok(Expr::Derivative(derivative));
                }
            }

            if input.peek_kind() == Some(TokenKind::OpenParen) {
                return Ok(Expr::Call(Call::parse_args(input, token)?));
            }

            Ok(Expr::Literal(Literal::Sym(LitSym {
                name: token.lexeme.to_string(),
                span: token.span,
            })))
        },
        _ => Err(Error::new(token.span, kind::UnexpectedToken {
            expected: &[TokenKind::OpenParen, TokenKind::Num, TokenKind::Name],
            found: token.kind,
        })),
    }
}
