//! Tokenizer and parser for infix algebraic expressions.
//!
//! The surface syntax is deliberately small: the arithmetic operators `+ - * / ^`, equations with
//! `=`, parenthesization, unary minus, implicit multiplication (`2pi`, `3x y`), function calls
//! (`sin(x)`, `log(x, b)`), and the derivative form `d/dx(expr)`. The parser produces a spanned
//! [`ast::Expr`](parser::ast::Expr); consumers lower it into whatever representation they
//! manipulate.

pub mod parser;
pub mod tokenizer;

pub use parser::Parser;
