//! The rewrite kernel: bidirectional equivalence rules, pattern matching, substitution, and
//! neighbor enumeration.
//!
//! A [`Rule`] is a pair of expressions whose leaves include placeholders. Applying a rule in
//! either direction at any position of an expression produces a structurally different but
//! mathematically equivalent expression; [`neighbors`](neighbors::neighbors) enumerates all of
//! them, and the search engine picks through the results.

mod matcher;
mod neighbors;

pub use matcher::{matches, Binding};
pub use neighbors::{neighbors, reset_cache};

use alg_parser::parser::ast::Expr as AstExpr;
use alg_parser::Parser;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use crate::expr::{Expr, OpKind, Placeholder};

/// The equivalences the kernel rewrites with, written in the surface syntax. Single-letter
/// symbols become placeholders when the table is materialized.
///
/// Every equation is applied in both directions wherever the direction leaves no placeholder
/// free.
const RULE_EQUATIONS: &[&str] = &[
    // associativity of addition and multiplication
    "(x + y) + z = x + (y + z)",
    "(x * y) * z = x * (y * z)",

    // commutativity of addition and multiplication
    "x + y = y + x",
    "x * y = y * x",

    // distributivity of multiplication over addition
    "a * (x + y) = a * x + a * y",

    // additive identity
    "x + 0 = x",

    // multiplicative identity
    "x * 1 = x",

    // multiplicative kernel
    "x * 0 = 0",

    // additive inverse
    "x + (-x) = 0",
    "-x = 0 - x",
    "x + (-y) = x - y",

    // multiplicative inverse
    "x * (x^-1) = 1",
    "x * (1/y) = x / y",

    // merging equal addends and factors
    "x + x = x * 2",
    "x * x = x ^ 2",

    //
    //  exponentiation and logarithms
    //

    "log(x * y, b) = log(x, b) + log(y, b)",
    "log(x ^ y, b) = y * log(x, b)",

    // change of base
    "log(x, b) = log(x, y) / log(b, y)",

    "b ^ log(x, b) = x",

    // product of like-base powers
    "b ^ x * b ^ y = b ^ (x + y)",

    "(b ^ x) ^ y = b ^ (x * y)",

    // distributivity over multiplication
    "(x * y) ^ n = (x ^ n) * (y ^ n)",

    "x ^ 0 = 1",

    "x ^ 1 = x",

    "log(1, x) = 0",

    "log(b, b) = 1",

    // function equivalence
    "log(x, e) = ln(x)",
    "log(x, y) = ln(x) / ln(y)",

    "e ^ x = exp(x)",
    "a ^ x = exp(x * ln(a))",

    //
    //  complex numbers
    //

    // fundamental property of i
    "i ^ 2 = -1",
    // euler's formula
    "e ^ (i * x) = cos(x) + i * sin(x)",

    //
    //  trigonometry
    //

    "sin(0) = 0",
    "cos(0) = 1",
    "sin(pi/2) = 1",
    "cos(pi/2) = 0",

    "tan(x) = sin(x) / cos(x)",
    "sec(x) = 1 / cos(x)",
    "csc(x) = 1 / sin(x)",
    "cot(x) = 1 / tan(x)",
    "1 = sin(x) ^ 2 + cos(x) ^ 2",

    "sin(-x) = -sin(x)",
    "cos(-x) = cos(x)",
    "tan(-x) = -tan(x)",

    "sin(pi/2 - x) = cos(x)",
    "cos(pi/2 - x) = sin(x)",
    "tan(pi/2 - x) = cot(x)",

    "sin(pi - x) = sin(x)",
    "cos(pi - x) = -cos(x)",
    "tan(pi - x) = -tan(x)",

    "sin(2pi - x) = sin(-x)",
    "cos(2pi - x) = cos(-x)",
    "tan(2pi - x) = tan(-x)",

    "sin(x + y) = sin(x) * cos(y) + cos(x) * sin(y)",
    "sin(x - y) = sin(x) * cos(y) - cos(x) * sin(y)",

    "cos(x + y) = cos(x) * cos(y) - sin(x) * sin(y)",
    "cos(x - y) = cos(x) * cos(y) + sin(x) * sin(y)",

    "sin(2pi + x) = sin(x)",
    "cos(2pi + x) = cos(x)",
    "tan(2pi + x) = tan(x)",

    "sin(2x) = 2 * sin(x) * cos(x)",
    "cos(2x) = cos(x) ^ 2 - sin(x) ^ 2",
    "cos(2x) = 2 * cos(x) ^ 2 - 1",

    "sin(3x) = 3 * sin(x) - 4 * sin(x) ^ 3",
    "cos(3x) = 4 * cos(x) ^ 3 - 3 * cos(x)",

    "sin(x) ^ 2 = (1 - cos(2x)) / 2",
    "cos(x) ^ 2 = (1 + cos(2x)) / 2",

    //
    //  differentiation
    //

    "d/dx(f + g) = d/dx(f) + d/dx(g)",
    "d/dx(f - g) = d/dx(f) - d/dx(g)",

    // product rule
    "d/dx(f * g) = d/dx(f) * g + f * d/dx(g)",

    // quotient rule
    "d/dx(f / g) = (d/dx(f) * g - f * d/dx(g)) / g^2",

    // power rule
    "d/dx(x) = 1",
    "d/dx(x ^ r) = r * x ^ (r - 1)",

    "d/dx(ln(x)) = 1/x",
    "d/dx(ln(f)) = d/dx(f) / f",
    "d/dx(exp(x)) = exp(x)",
    "d/dx(exp(f)) = d/dx(f) * exp(f)",

    "d/dx(sin(x)) = cos(x)",
    "d/dx(cos(x)) = -sin(x)",
    "d/dx(tan(x)) = sec(x) ^ 2",

    "d/dx(sin(f)) = d/dx(f) * cos(f)",
    "d/dx(cos(f)) = d/dx(f) * -sin(f)",
    "d/dx(tan(f)) = d/dx(f) * sec(f) ^ 2",
];

/// A bidirectional rewrite pattern: an equivalence between two expressions over placeholders.
///
/// A direction is only usable when the side being matched mentions every placeholder of the rule;
/// otherwise the substitution would leave placeholders free in the result.
#[derive(Debug, Clone)]
pub struct Rule {
    source: Expr,
    target: Expr,

    /// The placeholders mentioned by both sides together.
    union: BTreeSet<Placeholder>,

    /// Whether source → target is usable.
    forward: bool,

    /// Whether target → source is usable.
    backward: bool,
}

impl Rule {
    /// Creates a rule from its two sides.
    pub fn new(source: Expr, target: Expr) -> Self {
        let source_placeholders = source.placeholders();
        let target_placeholders = target.placeholders();
        let union: BTreeSet<Placeholder> = source_placeholders
            .union(&target_placeholders)
            .copied()
            .collect();

        let forward = source_placeholders == union;
        let backward = target_placeholders == union;
        debug_assert!(forward || backward, "unusable rule: {} = {}", source, target);

        Self { source, target, union, forward, backward }
    }

    /// The side the rule is written from.
    pub fn source(&self) -> &Expr {
        &self.source
    }

    /// The side the rule is written to.
    pub fn target(&self) -> &Expr {
        &self.target
    }

    /// Inserts into `out` every expression obtainable by rewriting `expr` at its root with
    /// either direction of this rule.
    pub(crate) fn rewrites_into(&self, expr: &Expr, out: &mut BTreeSet<Expr>) {
        if self.forward {
            self.rewrite_direction(&self.source, &self.target, expr, out);
        }
        if self.backward {
            self.rewrite_direction(&self.target, &self.source, expr, out);
        }
    }

    fn rewrite_direction(
        &self,
        pattern: &Expr,
        template: &Expr,
        expr: &Expr,
        out: &mut BTreeSet<Expr>,
    ) {
        let mut binding = Binding::new();
        if matches(pattern, expr, &mut binding) && binding.covers(&self.union) {
            let rewritten = apply(template, &binding);
            debug_assert!(!rewritten.contains_placeholders());
            log::trace!("{} => {}", expr, rewritten);
            out.insert(rewritten);
        }
    }
}

/// Instantiates a pattern under a binding: placeholders are replaced by their bound expressions,
/// operator nodes are rebuilt with substituted children, and every other leaf passes through.
///
/// # Panics
///
/// Panics if the pattern mentions a placeholder the binding does not cover. Rule directions are
/// gated on their placeholder sets, so this is unreachable for a curated table.
pub fn apply(target: &Expr, binding: &Binding) -> Expr {
    match target {
        Expr::Placeholder(placeholder) => binding
            .get(*placeholder)
            .cloned()
            .unwrap_or_else(|| panic!("placeholder `{}` is unbound", placeholder.as_char())),
        Expr::Op(op) => Expr::binary(op.kind, apply(&op.lhs, binding), apply(&op.rhs, binding)),
        other => other.clone(),
    }
}

/// Converts a parsed equation side into a pattern: single-letter lowercase symbols become
/// placeholders, everything else is left alone.
fn to_pattern(expr: Expr) -> Expr {
    match expr {
        Expr::Op(op) => Expr::binary(op.kind, to_pattern(*op.lhs), to_pattern(*op.rhs)),
        Expr::Symbol(name) => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) if letter.is_ascii_lowercase() => {
                    Expr::Placeholder(Placeholder::from_char(letter).unwrap())
                },
                _ => Expr::Symbol(name),
            }
        },
        other => other,
    }
}

/// Parses one equation of the rule table.
fn parse_rule(equation: &str) -> Rule {
    let ast = Parser::new(equation)
        .try_parse_full::<AstExpr>()
        .unwrap_or_else(|err| panic!("rule `{}` does not parse: {:?}", equation, err.kind));

    let Expr::Op(op) = Expr::from(ast) else {
        panic!("rule `{}` is not an equation", equation);
    };
    assert_eq!(op.kind, OpKind::Equality, "rule `{}` is not an equation", equation);

    Rule::new(to_pattern(*op.lhs), to_pattern(*op.rhs))
}

/// The rule table, materialized from [`RULE_EQUATIONS`] on first use.
pub fn rules() -> &'static [Rule] {
    static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
        let mut rules: Vec<Rule> = RULE_EQUATIONS.iter().copied().map(parse_rule).collect();

        // the reciprocal operator has no surface syntax, so its bridge to division is built with
        // constructors instead of parsed
        let x = Expr::Placeholder(Placeholder::from_char('x').unwrap());
        rules.push(Rule::new(
            Expr::reciprocal(x.clone()),
            Expr::quotient(Expr::Value(1.0), x),
        ));

        log::debug!("materialized {} rewrite rules", rules.len());
        rules
    });

    &RULES
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use super::*;

    fn ph(letter: char) -> Placeholder {
        Placeholder::from_char(letter).unwrap()
    }

    #[test]
    fn table_materializes() {
        assert!(rules().len() > 80);
    }

    #[test]
    fn every_rule_has_a_usable_direction() {
        for rule in rules() {
            let source = rule.source().placeholders();
            let target = rule.target().placeholders();
            let union: BTreeSet<_> = source.union(&target).copied().collect();
            assert!(
                source == union || target == union,
                "no usable direction for {} = {}",
                rule.source(),
                rule.target(),
            );
        }
    }

    #[test]
    fn single_letter_symbols_become_placeholders() {
        let rule = parse_rule("x + 0 = x");
        assert_eq!(
            *rule.source(),
            Expr::sum(Expr::Placeholder(ph('x')), Expr::Value(0.0)),
        );
        assert_eq!(*rule.target(), Expr::Placeholder(ph('x')));
    }

    #[test]
    fn multi_letter_names_stay_intact() {
        // `pi` and `e` lower to constants before placeholder conversion ever sees them
        let rule = parse_rule("sin(pi/2) = 1");
        assert!(rule.source().placeholders().is_empty());
    }

    #[test]
    fn substitution_instantiates_bound_placeholders() {
        let mut binding = Binding::new();
        binding.bind(ph('x'), parse("a + b").unwrap());

        let pattern = Expr::product(Expr::Placeholder(ph('x')), Expr::Value(2.0));
        assert_eq!(apply(&pattern, &binding), parse("(a + b) * 2").unwrap());
    }

    #[test]
    #[should_panic(expected = "unbound")]
    fn substitution_with_unbound_placeholder_panics() {
        apply(&Expr::Placeholder(ph('q')), &Binding::new());
    }

    /// For every usable rule direction, instantiating the pattern side with a synthetic binding
    /// and matching the pattern against the result must succeed and recover the binding.
    #[test]
    fn rules_rematch_their_own_instantiations() {
        for rule in rules() {
            let union: Vec<Placeholder> = rule
                .source()
                .placeholders()
                .union(&rule.target().placeholders())
                .copied()
                .collect();

            let mut binding = Binding::new();
            for (index, placeholder) in union.iter().enumerate() {
                binding.bind(*placeholder, Expr::symbol(format!("t{}", index)));
            }

            for (pattern, usable) in [
                (rule.source(), rule.source().placeholders().len() == union.len()),
                (rule.target(), rule.target().placeholders().len() == union.len()),
            ] {
                if !usable {
                    continue;
                }
                let instantiated = apply(pattern, &binding);
                let mut recovered = Binding::new();
                assert!(
                    matches(pattern, &instantiated, &mut recovered),
                    "{} failed to match its own instantiation {}",
                    pattern,
                    instantiated,
                );
            }
        }
    }

    #[test]
    fn rewrites_fire_in_both_directions() {
        let rule = parse_rule("x + y = y + x");
        let mut out = BTreeSet::new();
        rule.rewrites_into(&parse("a + b").unwrap(), &mut out);
        assert!(out.contains(&parse("b + a").unwrap()));
    }

    #[test]
    fn one_sided_rules_do_not_fire_backwards() {
        // 1 must not grow a `d/dt(t)` out of thin air: the reverse direction would leave `x` free
        let rule = parse_rule("d/dx(x) = 1");
        let mut out = BTreeSet::new();
        rule.rewrites_into(&Expr::Value(1.0), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn repeated_placeholders_must_agree_across_a_rule() {
        // b ^ log(x, b) requires both occurrences of b to agree
        let rule = parse_rule("b ^ log(x, b) = x");
        let mut out = BTreeSet::new();
        rule.rewrites_into(&parse("2 ^ log(x, 3)").unwrap(), &mut out);
        assert!(out.is_empty());
    }
}
