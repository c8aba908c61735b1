//! Enumeration of every expression reachable from another by exactly one rewrite step.

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use crate::expr::{Expr, OpKind};
use super::rules;

/// Process-wide memoization of [`neighbors`], keyed by structural identity.
///
/// The search re-enumerates structurally identical subtrees under many different parents, so the
/// cache is load-bearing for performance, not an optimization garnish. It grows without bound
/// across a long-running session; [`reset_cache`] empties it.
static CACHE: Lazy<RwLock<HashMap<Expr, Arc<BTreeSet<Expr>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns every expression reachable from `expr` by one rewrite step: any rule of the table, in
/// either usable direction, applied at any node, plus the numeric folding of any operator node
/// whose children are both values.
///
/// The result contains no placeholders, and structurally equal inputs always produce the same
/// set.
pub fn neighbors(expr: &Expr) -> Arc<BTreeSet<Expr>> {
    if let Some(cached) = CACHE.read().unwrap().get(expr) {
        return Arc::clone(cached);
    }

    let mut out = BTreeSet::new();

    // rule application at the root, both directions
    for rule in rules() {
        rule.rewrites_into(expr, &mut out);
    }

    if let Expr::Op(op) = expr {
        // one step inside either child, with the rest of the node intact
        for lhs in neighbors(&op.lhs).iter() {
            out.insert(Expr::binary(op.kind, lhs.clone(), (*op.rhs).clone()));
        }
        for rhs in neighbors(&op.rhs).iter() {
            out.insert(Expr::binary(op.kind, (*op.lhs).clone(), rhs.clone()));
        }

        // numeric folding; division by zero and friends surface as plain non-finite values
        if let (Expr::Value(lhs), Expr::Value(rhs)) = (&*op.lhs, &*op.rhs) {
            if let Some(folded) = fold(op.kind, *lhs, *rhs) {
                out.insert(Expr::Value(folded));
            }
        }
    }

    let out = Arc::new(out);
    CACHE
        .write()
        .unwrap()
        .insert(expr.clone(), Arc::clone(&out));
    out
}

/// Empties the process-wide neighbor cache.
pub fn reset_cache() {
    CACHE.write().unwrap().clear();
}

/// Computes the scalar reduction of an operator over two values, for the operations that have
/// one.
fn fold(kind: OpKind, lhs: f64, rhs: f64) -> Option<f64> {
    match kind {
        OpKind::Sum => Some(lhs + rhs),
        OpKind::Difference => Some(lhs - rhs),
        OpKind::Product => Some(lhs * rhs),
        OpKind::Quotient => Some(lhs / rhs),
        OpKind::Exponent => Some(lhs.powf(rhs)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use super::*;

    fn neighbors_of(input: &str) -> Arc<BTreeSet<Expr>> {
        neighbors(&parse(input).unwrap())
    }

    #[test]
    fn applies_rules_at_the_root() {
        assert!(neighbors_of("x + 0").contains(&parse("x").unwrap()));
        assert!(neighbors_of("x * 1").contains(&parse("x").unwrap()));
        assert!(neighbors_of("x + y").contains(&parse("y + x").unwrap()));
    }

    #[test]
    fn applies_rules_inside_children() {
        assert!(neighbors_of("(x + 0) * y").contains(&parse("x * y").unwrap()));
        assert!(neighbors_of("sin((x + y) + z)").contains(&parse("sin(x + (y + z))").unwrap()));
    }

    #[test]
    fn applies_rules_backwards() {
        // x ↦ x + 0 is the reverse of the additive identity
        assert!(neighbors_of("x").contains(&parse("x + 0").unwrap()));
        // log(x, b) + log(y, b) ↦ log(x * y, b) is the reverse of the product rule
        assert!(neighbors_of("log(x, b) + log(y, b)").contains(&parse("log(x * y, b)").unwrap()));
    }

    #[test]
    fn folds_numeric_children() {
        assert!(neighbors_of("2 + 3").contains(&Expr::Value(5.0)));
        assert!(neighbors_of("2 * 3").contains(&Expr::Value(6.0)));
        assert!(neighbors_of("6 / 3").contains(&Expr::Value(2.0)));
        assert!(neighbors_of("2 ^ 3").contains(&Expr::Value(8.0)));
        // differences fold for either ordering of the operands
        assert!(neighbors_of("3 - 2").contains(&Expr::Value(1.0)));
        assert!(neighbors_of("2 - 3").contains(&Expr::Value(-1.0)));
    }

    #[test]
    fn folding_keeps_double_semantics() {
        assert!(neighbors_of("1 / 0").contains(&Expr::Value(f64::INFINITY)));
        // 0^0 is 1 under IEEE powf
        assert!(neighbors_of("0 ^ 0").contains(&Expr::Value(1.0)));
    }

    #[test]
    fn no_placeholders_escape() {
        for input in ["x + 0", "sin(x + y)", "log(x * y, b)", "d/dx(x ^ 2)", "2 + 3"] {
            for neighbor in neighbors_of(input).iter() {
                assert!(
                    !neighbor.contains_placeholders(),
                    "{} leaked a placeholder into {}",
                    input,
                    neighbor,
                );
                assert!(neighbor.op_count() < usize::MAX);
            }
        }
    }

    #[test]
    fn memoizes_by_structural_identity() {
        let first = neighbors(&parse("sec(41 + q)").unwrap());
        let second = neighbors(&parse("sec(41 + (q))").unwrap());
        assert!(Arc::ptr_eq(&first, &second));

        // resetting drops the cached set; a recomputation is a fresh but equal set
        reset_cache();
        let third = neighbors(&parse("sec(41 + q)").unwrap());
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }

    #[test]
    fn empty_has_no_neighbors() {
        assert!(neighbors(&Expr::Empty).is_empty());
    }
}
