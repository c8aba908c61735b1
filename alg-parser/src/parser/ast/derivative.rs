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

/// A derivative form, such as `d/dx(x ^ 2)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Derivative {
    /// The differentiation variable (the `x` of `d/dx`).
    pub var: LitSym,

    /// The expression being differentiated.
    pub body: Box<Expr>,

    /// The region of the source code that this form was parsed from.
    pub span: Range<usize>,
}

impl Derivative {
    /// Attempts to parse the remainder of a derivative form after its leading `d` token.
    ///
    /// The form is only committed to once `/`, a two-letter `d<var>` name, and an opening
    /// parenthesis have all been seen; anything short of that returns `Ok(None)` and the caller
    /// falls back to treating the `d` as an ordinary symbol (so `d / dx` without a call is still
    /// a division of two symbols).
    pub(crate) fn parse_after_d<'source>(
        input: &mut Parser<'source>,
        d_token: &Token<'source>,
    ) -> Result<Option<Self>, Error> {
        let mut ahead = input.clone();

        let Ok(slash) = ahead.next_token() else { return Ok(None) };
        if slash.kind != TokenKind::Div {
            return Ok(None);
        }

        let Ok(dvar) = ahead.next_token() else { return Ok(None) };
        if dvar.kind != TokenKind::Name || dvar.lexeme.len() != 2 || !dvar.lexeme.starts_with('d') {
            return Ok(None);
        }
        let var = dvar.lexeme.chars().nth(1).unwrap();
        if !var.is_ascii_lowercase() {
            return Ok(None);
        }

        let Ok(open) = ahead.next_token() else { return Ok(None) };
        if open.kind != TokenKind::OpenParen {
            return Ok(None);
        }

        // the full `d/dx(` prefix is present; errors are real from here on
        let body = ahead.try_parse::<Expr>()?;
        let close = ahead
            .next_token()
            .map_err(|_| Error::new(open.span.clone(), kind::UnclosedParenthesis))?;
        if close.kind != TokenKind::CloseParen {
            return Err(Error::new(close.span, kind::UnexpectedToken {
                expected: &[TokenKind::CloseParen],
                found: close.kind,
            }));
        }

        input.set_cursor(&ahead);
        Ok(Some(Self {
            var: LitSym { name: var.to_string(), span: dvar.span },
            body: Box::new(body),
            span: d_token.span.start..close.span.end,
        }))
    }
}
