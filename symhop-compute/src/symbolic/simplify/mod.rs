//! Simplification of expressions.
//!
//! Simplification repeatedly applies the rules in [`rules`] to an expression until no rule
//! applies anymore. The rules are split in two groups:
//!
//! - [`SimplifyLevel::Trivial`] rules only restructure the tree: they flatten nested sums and
//!   products, remove `0.0` terms and `1.0` factors, cancel pairs of `-1.0` factors, and combine
//!   like terms.
//! - [`SimplifyLevel::Full`] additionally folds numbers, distributes products over sums, cancels
//!   factors against equal divisors and merges repeated factors into powers.
//!
//! When [`Recursion::Recursive`] is used, every sub-expression is simplified before its parent.
//! Otherwise, only the top-level node is rewritten.
//!
//! ```
//! use symhop_compute::symbolic::{simplify, Expr, SimplifyLevel};
//!
//! let expr = Expr::parse_with("x*y/y + 0", SimplifyLevel::None).unwrap();
//! assert_eq!(simplify(&expr, SimplifyLevel::Full), Expr::symbol("x"));
//! ```

pub mod expand;
pub mod rules;
pub mod step;

use crate::symbolic::{expr::Expr, step_collector::StepCollector};
use log::warn;
use step::Step;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How aggressively an expression is simplified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SimplifyLevel {
    /// Leave the expression untouched.
    None,

    /// Only restructure the tree, without evaluating anything.
    Trivial,

    /// Apply every rule.
    #[default]
    Full,
}

/// Whether sub-expressions are simplified along with the expression itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Recursion {
    #[default]
    Recursive,
    NonRecursive,
}

/// Upper bound on the number of rewrites applied to a single node.
const MAX_PASSES: usize = 1024;

/// Simplifies the children of the expression, if the simplification is recursive.
fn simplify_children(
    expr: &Expr,
    level: SimplifyLevel,
    recursion: Recursion,
    step_collector: &mut dyn StepCollector<Step>,
) -> Expr {
    match recursion {
        Recursion::Recursive => expr.map_children(|child| inner(child, level, recursion, step_collector)),
        Recursion::NonRecursive => expr.clone(),
    }
}

fn inner(
    expr: &Expr,
    level: SimplifyLevel,
    recursion: Recursion,
    step_collector: &mut dyn StepCollector<Step>,
) -> Expr {
    if level == SimplifyLevel::None {
        return expr.clone();
    }

    let mut current = simplify_children(expr, level, recursion, step_collector);
    for _ in 0..MAX_PASSES {
        match rules::all(&current, level, step_collector) {
            // the rule may have produced new, unsimplified children
            Some(next) => current = simplify_children(&next, level, recursion, step_collector),
            None => return current,
        }
    }

    warn!("simplification of `{}` did not settle after {} passes", current, MAX_PASSES);
    current
}

/// Simplifies the expression and all of its sub-expressions at the given level.
pub fn simplify(expr: &Expr, level: SimplifyLevel) -> Expr {
    inner(expr, level, Recursion::Recursive, &mut ())
}

/// Simplifies the expression, reporting every applied rule to the given step collector.
pub fn simplify_with(
    expr: &Expr,
    level: SimplifyLevel,
    recursion: Recursion,
    step_collector: &mut dyn StepCollector<Step>,
) -> Expr {
    inner(expr, level, recursion, step_collector)
}

/// Simplifies the expression and all of its sub-expressions, returning the simplified expression
/// and the rules that were applied, in order.
pub fn simplify_with_steps(expr: &Expr, level: SimplifyLevel) -> (Expr, Vec<Step>) {
    let mut steps = Vec::new();
    let simplified = inner(expr, level, Recursion::Recursive, &mut steps);
    (simplified, steps)
}

impl Expr {
    /// Simplifies the expression in place.
    pub fn simplify(&mut self, level: SimplifyLevel, recursion: Recursion) {
        *self = self.simplified(level, recursion);
    }

    /// Returns a simplified copy of the expression.
    pub fn simplified(&self, level: SimplifyLevel, recursion: Recursion) -> Expr {
        inner(self, level, recursion, &mut ())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn raw(src: &str) -> Expr {
        Expr::parse_with(src, SimplifyLevel::None).unwrap()
    }

    fn full(src: &str) -> Expr {
        simplify(&raw(src), SimplifyLevel::Full)
    }

    #[test]
    fn trivial_flattens_and_collects() {
        let expr = simplify(&raw("a + (b + (c + 0))"), SimplifyLevel::Trivial);
        assert_eq!(expr, Expr::Add(vec![Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("c")]));

        let expr = simplify(&raw("1*x*1"), SimplifyLevel::Trivial);
        assert_eq!(expr, Expr::symbol("x"));

        let expr = simplify(&raw("x + x"), SimplifyLevel::Trivial);
        assert_eq!(expr, Expr::Mul(vec![Expr::number(2.0), Expr::symbol("x")], vec![]));
    }

    #[test]
    fn trivial_keeps_numbers_apart() {
        let expr = simplify(&raw("1 + 2 + x"), SimplifyLevel::Trivial);
        assert_eq!(expr.terms().len(), 3);
    }

    #[test]
    fn none_level_is_identity() {
        let expr = raw("x + x + 0");
        assert_eq!(simplify(&expr, SimplifyLevel::None), expr);
    }

    #[test]
    fn full_folds_numbers() {
        assert_eq!(full("1 + 2 + x"), Expr::parse("x + 3").unwrap());
        assert_eq!(full("2*3*x/4"), Expr::Mul(vec![Expr::number(1.5), Expr::symbol("x")], vec![]));
        assert_eq!(full("2^3"), Expr::number(8.0));
        assert_eq!(full("x - x"), Expr::number(0.0));
    }

    #[test]
    fn full_cancels_and_merges() {
        assert_eq!(full("x*y/y"), Expr::symbol("x"));
        assert_eq!(full("x*x"), Expr::from_base_power(Expr::symbol("x"), Expr::number(2.0)));
        assert_eq!(full("x*x^2/x"), Expr::from_base_power(Expr::symbol("x"), Expr::number(2.0)));
        assert_eq!(full("-x/(-y)"), raw("x/y"));
    }

    #[test]
    fn full_distributes() {
        assert_eq!(full("-(a+b)"), Expr::parse("-1.0*a-1.0*b").unwrap());
        assert_eq!(full("(a+b)*(a-b)"), full("a*a - b*b"));
    }

    #[test]
    fn negative_powers_become_divisors() {
        assert_eq!(full("x^(-2)"), raw("1/pow(x, 2)"));
        assert_eq!(full("x^1"), Expr::symbol("x"));
    }

    #[test]
    fn conditionals_and_modulus() {
        assert_eq!(full("ifElse(c > 0, a + 1, 1 + a)"), full("a + 1"));
        assert_eq!(full("7 % 4"), Expr::number(3.0));
    }

    #[test]
    fn simplification_is_idempotent() {
        for src in [
            "2*x+x+x+y",
            "-(a+b)*(c-d)/e",
            "x*y/y + sin(x)^2",
            "a/(b/c) - a*c/b",
            "der(x) = -k*x + limit(u, -1, 1)",
            "pow(x, -2)*x^3",
            "(a+b)^2",
        ] {
            for level in [SimplifyLevel::Trivial, SimplifyLevel::Full] {
                let once = simplify(&raw(src), level);
                let twice = simplify(&once, level);
                assert_eq!(once, twice, "{src} at {level:?}");
            }
        }
    }

    #[test]
    fn steps_are_recorded() {
        let (expr, steps) = simplify_with_steps(&raw("x + x"), SimplifyLevel::Trivial);
        assert_eq!(expr, Expr::Mul(vec![Expr::number(2.0), Expr::symbol("x")], vec![]));
        assert_eq!(steps, vec![Step::CombineLikeTerms]);
    }

    #[test]
    fn non_recursive_leaves_children() {
        let expr = raw("sin(x + x) + 0");
        let simplified = expr.simplified(SimplifyLevel::Trivial, Recursion::NonRecursive);
        assert_eq!(simplified, raw("sin(x + x)"));
    }
}
