//! Implementation of the simplification rules.
//!
//! Each rule in this module is a function that takes the expression to simplify as an argument,
//! and returns `Some(expr)` with the simplified expression if the rule applies, or `None` if the
//! rule does not apply. A rule never returns an expression strictly equal to its input, which is
//! what makes repeated application terminate.

pub mod add;
pub mod function;
pub mod multiply;
pub mod power;

use crate::symbolic::{expr::Expr, step_collector::StepCollector};
use super::{step::Step, SimplifyLevel};

/// If the expression is a function call with the given function name, calls the given
/// transformation function with the arguments.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_call(
    expr: &Expr,
    name: &str,
    f: impl Fn(&[Expr]) -> Option<Expr>,
) -> Option<Expr> {
    match expr {
        Expr::Function(target_name, args) if target_name == name => f(args),
        _ => None,
    }
}

/// If the expression is a sum, calls the given transformation function with the terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_add(expr: &Expr, f: impl Fn(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    match expr {
        Expr::Add(terms) => f(terms),
        _ => None,
    }
}

/// If the expression is a product, calls the given transformation function with the factors and
/// divisors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_multiply(expr: &Expr, f: impl Fn(&[Expr], &[Expr]) -> Option<Expr>) -> Option<Expr> {
    match expr {
        Expr::Mul(factors, divisors) => f(factors, divisors),
        _ => None,
    }
}

/// If the expression is a power, calls the given transformation function with the base and the
/// power.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power(expr: &Expr, f: impl Fn(&Expr, &Expr) -> Option<Expr>) -> Option<Expr> {
    match expr {
        Expr::Power(base, power) => f(base, power),
        _ => None,
    }
}

/// If the expression is a modulus, calls the given transformation function with the dividend and
/// the divisors.
pub(crate) fn do_modulus(expr: &Expr, f: impl Fn(&Expr, &[Expr]) -> Option<Expr>) -> Option<Expr> {
    match expr {
        Expr::Modulus(dividend, divisors) => f(dividend, divisors),
        _ => None,
    }
}

/// Applies the rules that only restructure the tree.
pub fn trivial(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    add::trivial(expr, step_collector)
        .or_else(|| multiply::trivial(expr, step_collector))
        .or_else(|| power::trivial(expr, step_collector))
        .or_else(|| function::trivial(expr, step_collector))
}

/// Applies the rules that evaluate numbers or expand the tree.
pub fn full(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    add::full(expr, step_collector)
        .or_else(|| multiply::full(expr, step_collector))
        .or_else(|| function::full(expr, step_collector))
}

/// Applies the first rule allowed at the given level that changes the expression.
pub fn all(expr: &Expr, level: SimplifyLevel, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    match level {
        SimplifyLevel::None => None,
        SimplifyLevel::Trivial => trivial(expr, step_collector),
        SimplifyLevel::Full => trivial(expr, step_collector)
            .or_else(|| full(expr, step_collector)),
    }
}
