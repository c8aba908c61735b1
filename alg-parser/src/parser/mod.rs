pub mod ast;
pub mod error;
pub mod op;

use self::error::{kind, Error};
use alg_error::ErrorKind;
use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// A value that can be parsed from a stream of tokens.
pub trait Parse<'source>: Sized {
    /// Parses the value, advancing the cursor past the consumed tokens on success. On failure the
    /// cursor position is unspecified; use [`Parser::try_parse`] to backtrack automatically.
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error>;
}

/// A high-level parser for the expression grammar. This is the type to use to parse an arbitrary
/// piece of input into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(self.span(), kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Moves the cursor to the same position as the given parser. Used to commit tokens consumed
    /// by a cloned look-ahead parser.
    pub fn set_cursor(&mut self, other: &Self) {
        self.cursor = other.cursor;
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_ignore() {
                continue;
            } else {
                // cloning is cheap: only the Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(Error::new(self.eof_span(), kind::UnexpectedEof))
    }

    /// Returns the kind of the next significant token without advancing the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.cursor..]
            .iter()
            .find(|token| !token.is_ignore())
            .map(|token| token.kind)
    }

    /// Speculatively parses a value from the given stream of tokens, automatically backtracking
    /// the cursor position if parsing fails.
    pub fn try_parse<T: Parse<'source>>(&mut self) -> Result<T, Error> {
        let start = self.cursor;
        T::parse(self).map_err(|err| {
            self.cursor = start;
            err
        })
    }

    /// Parses a value and requires it to consume the entire token stream; trailing tokens are an
    /// [`ExpectedEof`](kind::ExpectedEof) error.
    pub fn try_parse_full<T: Parse<'source>>(&mut self) -> Result<T, Error> {
        let value = self.try_parse::<T>()?;
        match self.peek_kind() {
            Some(_) => Err(self.error(kind::ExpectedEof)),
            None => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::ast::{Expr, Literal};
    use super::op::{BinOpKind, UnaryOpKind};
    use super::*;

    fn parse(input: &str) -> Expr {
        Parser::new(input).try_parse_full::<Expr>().unwrap()
    }

    /// Renders the tree back out with explicit structure, which makes the expectations below much
    /// easier to read than nested node literals.
    fn sexpr(expr: &Expr) -> String {
        match expr {
            Expr::Literal(Literal::Num(num)) => format!("{}", num.value),
            Expr::Literal(Literal::Sym(sym)) => sym.name.clone(),
            Expr::Paren(paren) => sexpr(&paren.inner),
            Expr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => format!("(neg {})", sexpr(&unary.operand)),
            },
            Expr::Binary(binary) => {
                let op = match binary.op.kind {
                    BinOpKind::Eq => "=",
                    BinOpKind::Add => "+",
                    BinOpKind::Sub => "-",
                    BinOpKind::Mul => "*",
                    BinOpKind::Div => "/",
                    BinOpKind::Exp => "^",
                };
                format!("({} {} {})", op, sexpr(&binary.lhs), sexpr(&binary.rhs))
            },
            Expr::Call(call) => {
                let args = call.args.iter().map(sexpr).collect::<Vec<_>>().join(" ");
                format!("({} {})", call.name.name, args)
            },
            Expr::Derivative(derivative) => {
                format!("(d/d{} {})", derivative.var.name, sexpr(&derivative.body))
            },
        }
    }

    #[test]
    fn precedence() {
        assert_eq!(sexpr(&parse("1 + 2 * 3")), "(+ 1 (* 2 3))");
        assert_eq!(sexpr(&parse("1 * 2 + 3")), "(+ (* 1 2) 3)");
        assert_eq!(sexpr(&parse("1 - 2 - 3")), "(- (- 1 2) 3)");
        assert_eq!(sexpr(&parse("2 * x ^ 2 - 1")), "(- (* 2 (^ x 2)) 1)");
    }

    #[test]
    fn exponents_are_right_associative() {
        assert_eq!(sexpr(&parse("x ^ y ^ z")), "(^ x (^ y z))");
        assert_eq!(sexpr(&parse("-x^2")), "(neg (^ x 2))");
        assert_eq!(sexpr(&parse("x^-1")), "(^ x (neg 1))");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(sexpr(&parse("2pi")), "(* 2 pi)");
        assert_eq!(sexpr(&parse("3x y")), "(* (* 3 x) y)");
        assert_eq!(sexpr(&parse("2 sin(x)")), "(* 2 (sin x))");
        assert_eq!(sexpr(&parse("sin(2x)")), "(sin (* 2 x))");
        // a following minus is subtraction, never an implicit factor
        assert_eq!(sexpr(&parse("2pi - x")), "(- (* 2 pi) x)");
    }

    #[test]
    fn calls() {
        assert_eq!(sexpr(&parse("log(x * y, b)")), "(log (* x y) b)");
        assert_eq!(sexpr(&parse("f(x, y, z)")), "(f x y z)");
        assert_eq!(sexpr(&parse("cot(x)")), "(cot x)");
    }

    #[test]
    fn derivative_form() {
        assert_eq!(sexpr(&parse("d/dx(x ^ r)")), "(d/dx (^ x r))");
        assert_eq!(sexpr(&parse("d/dt(sin(t))")), "(d/dt (sin t))");
        // without the call form, `d` is just a symbol divided by another
        assert_eq!(sexpr(&parse("d / dx * 2")), "(* (/ d dx) 2)");
    }

    #[test]
    fn unary_minus() {
        assert_eq!(sexpr(&parse("-x")), "(neg x)");
        assert_eq!(sexpr(&parse("x + (-y)")), "(+ x (neg y))");
        assert_eq!(sexpr(&parse("0 - x")), "(- 0 x)");
        assert_eq!(sexpr(&parse("--x")), "(neg (neg x))");
    }

    #[test]
    fn equations() {
        assert_eq!(
            sexpr(&parse("sin(x + y) = sin(x) * cos(y) + cos(x) * sin(y)")),
            "(= (sin (+ x y)) (+ (* (sin x) (cos y)) (* (cos x) (sin y))))",
        );
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(Parser::new("x + y )").try_parse_full::<Expr>().is_err());
        assert!(Parser::new("").try_parse_full::<Expr>().is_err());
        assert!(Parser::new("x +").try_parse_full::<Expr>().is_err());
        assert!(Parser::new("sin(x").try_parse_full::<Expr>().is_err());
    }
}
