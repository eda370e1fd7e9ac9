//! Simplification rules for function calls and the modulus operator.

use crate::symbolic::{
    expr::Expr,
    simplify::{rules::{do_call, do_modulus}, step::Step},
    step_collector::StepCollector,
};

/// `ifElse(c,a,a) = a`
pub fn collapse_if_else(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, "ifElse", |args| match args {
        [_, then, otherwise] if then == otherwise => Some(then.clone()),
        _ => None,
    })?;

    step_collector.push(Step::CollapseIfElse);
    Some(opt)
}

/// `a%(empty) = a`
pub fn collapse_modulus(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_modulus(expr, |dividend, divisors| {
        divisors.is_empty().then(|| dividend.clone())
    })?;

    step_collector.push(Step::FoldModulus);
    Some(opt)
}

/// `7%4 = 3`
///
/// Only applies if every operand is a number and the result is finite.
pub fn fold_modulus(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_modulus(expr, |dividend, divisors| {
        let mut value = dividend.to_double()?;
        for divisor in divisors {
            value %= divisor.to_double()?;
        }
        value.is_finite().then(|| Expr::number(value))
    })?;

    step_collector.push(Step::FoldModulus);
    Some(opt)
}

/// Applies the function rules that only restructure the tree.
pub fn trivial(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    collapse_modulus(expr, step_collector)
}

/// Applies the function rules that compare or evaluate arguments.
pub fn full(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    collapse_if_else(expr, step_collector)
        .or_else(|| fold_modulus(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::symbolic::simplify::SimplifyLevel;
    use super::*;

    fn raw(src: &str) -> Expr {
        Expr::parse_with(src, SimplifyLevel::None).unwrap()
    }

    #[test]
    fn equal_branches_collapse() {
        assert_eq!(collapse_if_else(&raw("ifElse(c, a, a)"), &mut ()), Some(raw("a")));
        assert_eq!(collapse_if_else(&raw("ifElse(c, a, b)"), &mut ()), None);
        assert_eq!(collapse_if_else(&raw("ifElse(c, a)"), &mut ()), None);
    }

    #[test]
    fn numeric_modulus_folds() {
        assert_eq!(fold_modulus(&raw("17 % 5 % 3"), &mut ()), Some(Expr::number(2.0)));
        assert_eq!(fold_modulus(&raw("x % 4"), &mut ()), None);
        assert_eq!(fold_modulus(&raw("1 % 0"), &mut ()), None);
    }
}
