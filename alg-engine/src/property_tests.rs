//! Property-based tests over randomly generated expressions.
//!
//! The generator only emits placeholder-free trees built from the parseable surface of the
//! model, which keeps every property below meaningful for the round-trip checks too.

use quickcheck::{Arbitrary, Gen, QuickCheck};
use std::cmp::Ordering;
use crate::expr::{Expr, Func};
use crate::parse;
use crate::rewrite::{matches, neighbors, Binding};

/// A random placeholder-free expression, depth-bounded to keep the search spaces tiny.
#[derive(Debug, Clone)]
struct ArbExpr(Expr);

fn arbitrary_expr(g: &mut Gen, depth: usize) -> Expr {
    if depth == 0 {
        return match u8::arbitrary(g) % 6 {
            0 => Expr::symbol("x"),
            1 => Expr::symbol("y"),
            2 => Expr::symbol("z"),
            // both signs: negative values are ordinary leaves, numeric folding produces them
            3 => Expr::Value((i8::arbitrary(g) % 10) as f64),
            4 => parse("pi").unwrap(),
            _ => parse("e").unwrap(),
        };
    }

    match u8::arbitrary(g) % 10 {
        0 => Expr::sum(arbitrary_expr(g, depth - 1), arbitrary_expr(g, depth - 1)),
        1 => Expr::difference(arbitrary_expr(g, depth - 1), arbitrary_expr(g, depth - 1)),
        2 => Expr::product(arbitrary_expr(g, depth - 1), arbitrary_expr(g, depth - 1)),
        3 => Expr::quotient(arbitrary_expr(g, depth - 1), arbitrary_expr(g, depth - 1)),
        4 => Expr::exponent(arbitrary_expr(g, depth - 1), arbitrary_expr(g, depth - 1)),
        // a negation over a number leaf is represented as a negative value, exactly as the
        // lowering normalizes it; anything else keeps the negation node
        5 => match arbitrary_expr(g, depth - 1) {
            Expr::Value(value) => Expr::Value(-value),
            operand => Expr::negative(operand),
        },
        6 => Expr::logarithm(arbitrary_expr(g, depth - 1), arbitrary_expr(g, depth - 1)),
        7 => Expr::derivative(Expr::symbol("x"), arbitrary_expr(g, depth - 1)),
        8 => {
            let func = [
                Func::Exp,
                Func::Ln,
                Func::Sin,
                Func::Cos,
                Func::Tan,
                Func::Sec,
                Func::Csc,
                Func::Cot,
            ][usize::arbitrary(g) % 8];
            Expr::func(func, arbitrary_expr(g, depth - 1))
        },
        _ => arbitrary_expr(g, 0),
    }
}

impl Arbitrary for ArbExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbExpr(arbitrary_expr(g, 3))
    }
}

#[test]
fn total_order_laws() {
    fn prop(a: ArbExpr, b: ArbExpr, c: ArbExpr) -> bool {
        let (a, b, c) = (a.0, b.0, c.0);

        // antisymmetry
        if a.cmp(&b).reverse() != b.cmp(&a) {
            return false;
        }
        // transitivity
        if a <= b && b <= c && !(a <= c) {
            return false;
        }
        // trichotomy: equality agrees with the order
        (a == b) == (a.cmp(&b) == Ordering::Equal)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(ArbExpr, ArbExpr, ArbExpr) -> bool);
}

#[test]
fn match_on_placeholder_free_expressions_is_equality() {
    fn prop(a: ArbExpr, b: ArbExpr) -> bool {
        let (a, b) = (a.0, b.0);
        let mut binding = Binding::new();
        matches(&a, &b, &mut binding) == (a == b) && binding == Binding::new()
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(ArbExpr, ArbExpr) -> bool);
}

#[test]
fn neighbors_are_well_formed() {
    fn prop(a: ArbExpr) -> bool {
        neighbors(&a.0)
            .iter()
            .all(|neighbor| !neighbor.contains_placeholders())
    }

    // each case may enumerate a decent number of rewrites; keep the sample modest
    QuickCheck::new().tests(50).quickcheck(prop as fn(ArbExpr) -> bool);
}

#[test]
fn printing_round_trips_through_the_parser() {
    fn prop(a: ArbExpr) -> bool {
        let expr = a.0;
        match parse(&expr.to_string()) {
            Ok(reparsed) => reparsed == expr,
            Err(_) => false,
        }
    }

    QuickCheck::new().tests(200).quickcheck(prop as fn(ArbExpr) -> bool);
}
