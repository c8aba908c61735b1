//! Pattern matching: unifies a rule pattern against a concrete expression while binding
//! placeholders.

use std::collections::{BTreeMap, BTreeSet};
use crate::expr::{Expr, Placeholder};

/// A partial mapping from placeholders to the subtrees they matched.
///
/// Built incrementally by [`matches`]; once a placeholder is bound, any further occurrence must
/// match structurally against the already-bound expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    map: BTreeMap<Placeholder, Expr>,
}

impl Binding {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the expression bound to the given placeholder, if any.
    pub fn get(&self, placeholder: Placeholder) -> Option<&Expr> {
        self.map.get(&placeholder)
    }

    /// Binds the given placeholder to the given expression.
    pub fn bind(&mut self, placeholder: Placeholder, expr: Expr) {
        self.map.insert(placeholder, expr);
    }

    /// Returns true if the binding's domain is exactly the given placeholder set.
    pub fn covers(&self, placeholders: &BTreeSet<Placeholder>) -> bool {
        self.map.len() == placeholders.len()
            && placeholders.iter().all(|p| self.map.contains_key(p))
    }
}

/// Attempts to unify `pattern` against `concrete`, extending `binding`.
///
/// Placeholders on *either* side are treated as free variables. `binding` is only modified if the
/// whole match succeeds; a failed attempt leaves it untouched.
pub fn matches(pattern: &Expr, concrete: &Expr, binding: &mut Binding) -> bool {
    let mut scratch = binding.clone();
    if match_r(pattern, concrete, &mut scratch) {
        *binding = scratch;
        true
    } else {
        false
    }
}

fn match_r(lhs: &Expr, rhs: &Expr, binding: &mut Binding) -> bool {
    match (lhs, rhs) {
        // two placeholders only match if they are the same placeholder
        (Expr::Placeholder(lhs), Expr::Placeholder(rhs)) => lhs == rhs,

        // a lone placeholder matches anything if unbound, and re-matches its bound expression
        // otherwise
        (Expr::Placeholder(placeholder), other) | (other, Expr::Placeholder(placeholder)) => {
            match binding.get(*placeholder).cloned() {
                Some(bound) => {
                    let mut scratch = binding.clone();
                    if match_r(&bound, other, &mut scratch) {
                        *binding = scratch;
                        true
                    } else {
                        false
                    }
                },
                None => {
                    binding.bind(*placeholder, other.clone());
                    true
                },
            }
        },

        (Expr::Value(lhs), Expr::Value(rhs)) => lhs == rhs,
        (Expr::Const(lhs), Expr::Const(rhs)) => lhs == rhs,
        (Expr::Symbol(lhs), Expr::Symbol(rhs)) => lhs == rhs,
        (Expr::Func(lhs), Expr::Func(rhs)) => lhs == rhs,

        // operators match kind-wise, then both children under one accumulating binding; partial
        // bindings from a failed child must not leak into the caller
        (Expr::Op(lhs), Expr::Op(rhs)) => {
            if lhs.kind != rhs.kind {
                return false;
            }

            let mut scratch = binding.clone();
            if match_r(&lhs.lhs, &rhs.lhs, &mut scratch) && match_r(&lhs.rhs, &rhs.rhs, &mut scratch) {
                *binding = scratch;
                true
            } else {
                false
            }
        },

        (Expr::Empty, Expr::Empty) => true,

        _ => false,
    }
}
