//! The symbolic expression tree that the rewrite kernel and the search engine operate on.
//!
//! An [`Expr`] is a small immutable tree: operator nodes hold their children in owned boxes, and
//! every other variant is a leaf. Nothing here mutates in place; rewriting always builds fresh
//! trees.
//!
//! # Identity
//!
//! Expressions carry a total order ([`Ord`]) keyed first on the variant, then on the variant's
//! payload (operator kind, then left child, then right child, for operator nodes). [`PartialEq`],
//! [`Eq`] and [`Hash`] all agree with that order — values compare and hash by their bit pattern
//! via [`f64::total_cmp`] — so expressions can key both ordered and hashed collections. This
//! structural identity is what the search's closed set and the neighbor cache dedup on.

mod iter;

use alg_parser::parser::ast::{self, Expr as AstExpr, Literal};
use alg_parser::parser::op::{BinOpKind, UnaryOpKind};
use iter::ExprIter;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The operation performed by an operator node.
///
/// Every node is binary in shape; the unary operations (negative, reciprocal, differential) store
/// [`Expr::Empty`] in their right slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OpKind {
    /// `lhs = rhs`, used by rule equations.
    Equality,
    /// `lhs, rhs`, used to chain call arguments.
    Comma,
    /// `lhs + rhs`
    Sum,
    /// `lhs - rhs`
    Difference,
    /// `-lhs`
    Negative,
    /// `lhs * rhs`
    Product,
    /// `lhs / rhs`
    Quotient,
    /// `1/lhs`
    Reciprocal,
    /// `lhs` raised to the power of `rhs`
    Exponent,
    /// logarithm of `lhs` using base `rhs`
    Logarithm,
    /// application of the function `lhs` (a [`Func`], symbol, or placeholder) to `rhs`
    Call,
    /// derivative of `rhs` with respect to `lhs`
    Derivative,
    /// integral of `lhs` with respect to `rhs`
    Integral,
    /// differential of `lhs` for integration
    Differential,
}

/// Identifier for the built-in unary functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Func {
    Exp,
    Ln,
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
}

impl Func {
    /// The name the function is written with in the surface syntax.
    pub fn name(self) -> &'static str {
        match self {
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sec => "sec",
            Self::Csc => "csc",
            Self::Cot => "cot",
        }
    }

    /// Looks a function up by its surface-syntax name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "exp" => Self::Exp,
            "ln" => Self::Ln,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "sec" => Self::Sec,
            "csc" => Self::Csc,
            "cot" => Self::Cot,
            _ => return None,
        })
    }
}

/// A named transcendental or special constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Const {
    /// The result of operations with no defined value.
    Undefined,
    Pi,
    E,
    I,
}

impl Const {
    /// The name the constant is written with.
    pub fn name(self) -> &'static str {
        match self {
            Self::Undefined => "N/A",
            Self::Pi => "pi",
            Self::E => "e",
            Self::I => "i",
        }
    }
}

/// A pattern variable used inside rewrite rules: one of the 26 letters `a`..`z`.
///
/// Placeholders only ever appear inside rule patterns; a successful substitution produces an
/// expression with none left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placeholder(u8);

impl Placeholder {
    /// Creates the placeholder for the given letter, `'a'..='z'`.
    pub fn from_char(letter: char) -> Option<Self> {
        letter
            .is_ascii_lowercase()
            .then(|| Self(letter as u8 - b'a'))
    }

    /// The letter this placeholder is written with.
    pub fn as_char(self) -> char {
        (b'a' + self.0) as char
    }
}

/// An operator node: an operation applied to two child expressions.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Op {
    /// The operation being performed.
    pub kind: OpKind,

    /// The left operand.
    pub lhs: Box<Expr>,

    /// The right operand; [`Expr::Empty`] for unary operations.
    pub rhs: Box<Expr>,
}

/// A symbolic expression: an immutable tree of operator nodes over leaves.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// The absent operand of a unary operation.
    Empty,

    /// A composite node.
    Op(Op),

    /// A built-in function identifier, the callee of a [`OpKind::Call`] node.
    Func(Func),

    /// A named constant.
    Const(Const),

    /// A numeric literal.
    Value(f64),

    /// A free variable.
    Symbol(String),

    /// A pattern variable; only ever found inside rule patterns.
    Placeholder(Placeholder),
}

impl Expr {
    /// Builds an operator node from its operation and both children.
    pub fn binary(kind: OpKind, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Op(Op {
            kind,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// Builds a unary operator node, filling the right slot with [`Expr::Empty`].
    pub fn unary(kind: OpKind, operand: Expr) -> Expr {
        Self::binary(kind, operand, Expr::Empty)
    }

    /// `lhs = rhs`
    pub fn equality(lhs: Expr, rhs: Expr) -> Expr {
        Self::binary(OpKind::Equality, lhs, rhs)
    }

    /// `lhs, rhs`
    pub fn comma(lhs: Expr, rhs: Expr) -> Expr {
        Self::binary(OpKind::Comma, lhs, rhs)
    }

    /// `lhs + rhs`
    pub fn sum(lhs: Expr, rhs: Expr) -> Expr {
        Self::binary(OpKind::Sum, lhs, rhs)
    }

    /// `lhs - rhs`
    pub fn difference(lhs: Expr, rhs: Expr) -> Expr {
        Self::binary(OpKind::Difference, lhs, rhs)
    }

    /// `-operand`
    pub fn negative(operand: Expr) -> Expr {
        Self::unary(OpKind::Negative, operand)
    }

    /// `lhs * rhs`
    pub fn product(lhs: Expr, rhs: Expr) -> Expr {
        Self::binary(OpKind::Product, lhs, rhs)
    }

    /// `lhs / rhs`
    pub fn quotient(lhs: Expr, rhs: Expr) -> Expr {
        Self::binary(OpKind::Quotient, lhs, rhs)
    }

    /// `1/operand`
    pub fn reciprocal(operand: Expr) -> Expr {
        Self::unary(OpKind::Reciprocal, operand)
    }

    /// `lhs ^ rhs`
    pub fn exponent(lhs: Expr, rhs: Expr) -> Expr {
        Self::binary(OpKind::Exponent, lhs, rhs)
    }

    /// `log(arg, base)`
    pub fn logarithm(arg: Expr, base: Expr) -> Expr {
        Self::binary(OpKind::Logarithm, arg, base)
    }

    /// Applies `target` (a [`Func`], symbol, or placeholder) to `arg`.
    pub fn call(target: Expr, arg: Expr) -> Expr {
        Self::binary(OpKind::Call, target, arg)
    }

    /// Applies the built-in function `func` to `arg`.
    pub fn func(func: Func, arg: Expr) -> Expr {
        Self::call(Expr::Func(func), arg)
    }

    /// `d/d{var}({body})`
    pub fn derivative(var: Expr, body: Expr) -> Expr {
        Self::binary(OpKind::Derivative, var, body)
    }

    /// Integral of `body` with respect to `var`.
    pub fn integral(body: Expr, var: Expr) -> Expr {
        Self::binary(OpKind::Integral, body, var)
    }

    /// `d{operand}`, the differential form used under integrals.
    pub fn differential(operand: Expr) -> Expr {
        Self::unary(OpKind::Differential, operand)
    }

    /// A free variable with the given name.
    pub fn symbol(name: impl Into<String>) -> Expr {
        Expr::Symbol(name.into())
    }

    /// Returns the total number of operator nodes in the expression, the cost metric of the
    /// search.
    pub fn op_count(&self) -> usize {
        match self {
            Expr::Op(op) => 1 + op.lhs.op_count() + op.rhs.op_count(),
            _ => 0,
        }
    }

    /// Returns the set of unique placeholders appearing in the expression.
    pub fn placeholders(&self) -> BTreeSet<Placeholder> {
        self.post_order_iter()
            .filter_map(|expr| match expr {
                Expr::Placeholder(placeholder) => Some(*placeholder),
                _ => None,
            })
            .collect()
    }

    /// Returns true if any placeholder appears in the expression.
    pub fn contains_placeholders(&self) -> bool {
        self.post_order_iter()
            .any(|expr| matches!(expr, Expr::Placeholder(_)))
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// The position of the variant in the total order.
    fn variant_index(&self) -> u8 {
        match self {
            Expr::Empty => 0,
            Expr::Op(_) => 1,
            Expr::Func(_) => 2,
            Expr::Const(_) => 3,
            Expr::Value(_) => 4,
            Expr::Symbol(_) => 5,
            Expr::Placeholder(_) => 6,
        }
    }
}

/// The total order over expressions: variant first, then the variant's payload. Operator nodes
/// compare by kind, then left child, then right child.
impl Ord for Expr {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Expr::Empty, Expr::Empty) => Ordering::Equal,
            (Expr::Op(lhs), Expr::Op(rhs)) => lhs
                .kind
                .cmp(&rhs.kind)
                .then_with(|| lhs.lhs.cmp(&rhs.lhs))
                .then_with(|| lhs.rhs.cmp(&rhs.rhs)),
            (Expr::Func(lhs), Expr::Func(rhs)) => lhs.cmp(rhs),
            (Expr::Const(lhs), Expr::Const(rhs)) => lhs.cmp(rhs),
            (Expr::Value(lhs), Expr::Value(rhs)) => lhs.total_cmp(rhs),
            (Expr::Symbol(lhs), Expr::Symbol(rhs)) => lhs.cmp(rhs),
            (Expr::Placeholder(lhs), Expr::Placeholder(rhs)) => lhs.cmp(rhs),
            _ => self.variant_index().cmp(&other.variant_index()),
        }
    }
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Structural equality, the equivalence induced by the total order. Note that values compare via
/// [`f64::total_cmp`], so `0.0` and `-0.0` are *different* expressions (they print differently
/// and fold differently), and an expression containing NaN still equals itself.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Expr {}

/// [`Hash`] is implemented manually to agree with the manual [`PartialEq`]: values hash by bit
/// pattern, matching the [`f64::total_cmp`] identity used by the total order.
impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.variant_index());
        match self {
            Expr::Empty => {},
            Expr::Op(op) => {
                op.kind.hash(state);
                op.lhs.hash(state);
                op.rhs.hash(state);
            },
            Expr::Func(func) => func.hash(state),
            Expr::Const(constant) => constant.hash(state),
            Expr::Value(value) => state.write_u64(value.to_bits()),
            Expr::Symbol(symbol) => symbol.hash(state),
            Expr::Placeholder(placeholder) => placeholder.hash(state),
        }
    }
}

/// Renders the expression with every operator node fully parenthesized.
///
/// The output is unambiguous but not minimal; its only contract is that structurally equal
/// expressions print equally.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Empty => Ok(()),
            Expr::Op(op) => match op.kind {
                OpKind::Equality => write!(f, "{} = {}", op.lhs, op.rhs),
                OpKind::Comma => write!(f, "{}, {}", op.lhs, op.rhs),
                OpKind::Sum => write!(f, "({} + {})", op.lhs, op.rhs),
                OpKind::Difference => write!(f, "({} - {})", op.lhs, op.rhs),
                OpKind::Negative => write!(f, "(-{})", op.lhs),
                OpKind::Product => write!(f, "({} * {})", op.lhs, op.rhs),
                OpKind::Quotient => write!(f, "({} / {})", op.lhs, op.rhs),
                OpKind::Reciprocal => write!(f, "(1/{})", op.lhs),
                OpKind::Exponent => write!(f, "({} ^ {})", op.lhs, op.rhs),
                OpKind::Logarithm => write!(f, "log({}, {})", op.lhs, op.rhs),
                OpKind::Call => write!(f, "{}({})", op.lhs, op.rhs),
                OpKind::Derivative => write!(f, "d/d{}({})", op.lhs, op.rhs),
                OpKind::Integral => write!(f, "int({}, {})", op.lhs, op.rhs),
                OpKind::Differential => write!(f, "d{}", op.lhs),
            },
            Expr::Func(func) => write!(f, "{}", func.name()),
            Expr::Const(constant) => write!(f, "{}", constant.name()),
            Expr::Value(value) => write!(f, "{}", value),
            Expr::Symbol(symbol) => write!(f, "{}", symbol),
            Expr::Placeholder(placeholder) => write!(f, "{}", placeholder.as_char()),
        }
    }
}

/// Lowers a name literal: the known constants become [`Expr::Const`], everything else is a free
/// symbol.
fn lower_name(name: &str) -> Expr {
    match name {
        "pi" => Expr::Const(Const::Pi),
        "e" => Expr::Const(Const::E),
        "i" => Expr::Const(Const::I),
        _ => Expr::symbol(name),
    }
}

/// Lowers a call: `log` with two arguments becomes the binary logarithm node, the built-in unary
/// functions become [`OpKind::Call`] nodes over a [`Func`] tag, and anything else is a call to a
/// free symbol with comma-chained arguments.
fn lower_call(call: ast::Call) -> Expr {
    let mut args = call.args.into_iter().map(Expr::from);

    if call.name.name == "log" && args.len() == 2 {
        let arg = args.next().unwrap();
        let base = args.next().unwrap();
        return Expr::logarithm(arg, base);
    }

    if args.len() == 1 {
        if let Some(func) = Func::from_name(&call.name.name) {
            return Expr::func(func, args.next().unwrap());
        }
    }

    let first = args.next().expect("the grammar requires at least one argument");
    let chained = match args.next_back() {
        Some(last) => {
            let mut chained = last;
            while let Some(arg) = args.next_back() {
                chained = Expr::comma(arg, chained);
            }
            Expr::comma(first, chained)
        },
        None => first,
    };

    Expr::call(Expr::symbol(call.name.name), chained)
}

impl From<AstExpr> for Expr {
    fn from(expr: AstExpr) -> Self {
        match expr {
            AstExpr::Literal(Literal::Num(num)) => Expr::Value(num.value),
            AstExpr::Literal(Literal::Sym(sym)) => lower_name(&sym.name),
            AstExpr::Paren(paren) => Expr::from(paren.into_innermost()),
            AstExpr::Unary(unary) => match unary.op.kind {
                // a negated number literal lowers to a negative value, the same form numeric
                // folding produces, so negative results print and reparse to themselves
                UnaryOpKind::Neg => match Expr::from(*unary.operand) {
                    Expr::Value(value) => Expr::Value(-value),
                    operand => Expr::negative(operand),
                },
            },
            AstExpr::Binary(binary) => {
                let kind = match binary.op.kind {
                    BinOpKind::Eq => OpKind::Equality,
                    BinOpKind::Add => OpKind::Sum,
                    BinOpKind::Sub => OpKind::Difference,
                    BinOpKind::Mul => OpKind::Product,
                    BinOpKind::Div => OpKind::Quotient,
                    BinOpKind::Exp => OpKind::Exponent,
                };
                Expr::binary(kind, Expr::from(*binary.lhs), Expr::from(*binary.rhs))
            },
            AstExpr::Call(call) => lower_call(call),
            AstExpr::Derivative(derivative) => Expr::derivative(
                Expr::symbol(derivative.var.name),
                Expr::from(*derivative.body),
            ),
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Self) -> Expr {
        Expr::sum(self, rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Self) -> Expr {
        Expr::difference(self, rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Expr {
        Expr::product(self, rhs)
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Self) -> Expr {
        Expr::quotient(self, rhs)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::negative(self)
    }
}
