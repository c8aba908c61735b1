use std::ops::Range;
use super::{Expr, LitSym};
use crate::{
    parser::{
        error::{kind, Error},
        Parser,
    },
    tokenizer::{Token, TokenKind},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `sin(x)` or `log(x, b)`.
///
/// The parser does not know which names are built-in functions; every `name(...)` form becomes a
/// call, and the lowering step decides what the name means.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function being called.
    pub name: LitSym,

    /// The comma-separated arguments.
    pub args: Vec<Expr>,

    /// The region of the source code that this call was parsed from.
    pub span: Range<usize>,
}

impl Call {
    /// Parses the parenthesized argument list of a call whose name token has already been
    /// consumed.
    pub(crate) fn parse_args<'source>(
        input: &mut Parser<'source>,
        name: Token<'source>,
    ) -> Result<Self, Error> {
        let open = input.next_token()?;
        debug_assert_eq!(open.kind, TokenKind::OpenParen);

        let mut args = vec![input.try_parse::<Expr>()?];
        loop {
            let token = input
                .next_token()
                .map_err(|_| Error::new(open.span.clone(), kind::UnclosedParenthesis))?;
            match token.kind {
                TokenKind::Comma => args.push(input.try_parse::<Expr>()?),
                TokenKind::CloseParen => {
                    return Ok(Self {
                        name: LitSym { name: name.lexeme.to_string(), span: name.span.clone() },
                        args,
                        span: name.span.start..token.span.end,
                    });
                },
                _ => {
                    return Err(Error::new(token.span, kind::UnexpectedToken {
                        expected: &[TokenKind::Comma, TokenKind::CloseParen],
                        found: token.kind,
                    }));
                },
            }
        }
    }
}
