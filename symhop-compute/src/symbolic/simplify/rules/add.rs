//! Simplification rules for sums, including combining like terms.

use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_add, step::Step},
    step_collector::StepCollector,
};

/// `a+(b+c) = a+b+c`
pub fn flatten_sum(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        if !terms.iter().any(Expr::is_add) {
            return None;
        }

        let new_terms = terms.iter()
            .flat_map(|term| term.terms().iter().cloned())
            .collect::<Vec<_>>();
        Some(Expr::Add(new_terms))
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::FlattenSum);
    Some(opt)
}

/// A sum of a single term is that term. An empty sum is `0`.
pub fn collapse_sum(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        (terms.len() < 2).then(|| Expr::from_terms(terms.to_vec()))
    })?;

    step_collector.push(Step::CollapseSum);
    Some(opt)
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| term.to_double() != Some(0.0))
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(Expr::from_terms(new_terms))
        }
    })?;

    step_collector.push(Step::AddZero);
    Some(opt)
}

/// Multiplies the symbolic part of a term by a coefficient, keeping the product flat.
fn scale(coefficient: f64, rest: Expr) -> Expr {
    if coefficient == 1.0 {
        return rest;
    }
    if rest.is_number(1.0) {
        return Expr::number(coefficient);
    }

    let mut factors = Expr::number(coefficient).factors().to_vec();
    match rest {
        Expr::Mul(rest_factors, divisors) => {
            factors.extend(rest_factors);
            Expr::Mul(factors, divisors)
        },
        rest => {
            factors.push(rest);
            Expr::Mul(factors, Vec::new())
        },
    }
}

/// `2*a+a = 3*a`
/// `a-a = 0`
///
/// Terms are alike if their symbolic parts, with every numeric factor and divisor removed, are
/// strictly equal. The combined term takes the place of the first term of its group. Plain
/// numbers are left for [`sum_numbers`].
pub fn combine_like_terms(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let split = terms.iter()
            .map(|term| term.to_double().is_none().then(|| term.split_coefficient()))
            .collect::<Vec<_>>();

        let mut used = vec![false; terms.len()];
        let mut new_terms = Vec::with_capacity(terms.len());
        let mut combined = false;

        // this is O(n^2) worst case, due to scanning the whole vec for each term
        for current in 0..terms.len() {
            if used[current] {
                continue;
            }
            used[current] = true;

            let Some((coefficient, rest)) = &split[current] else {
                new_terms.push(terms[current].clone());
                continue;
            };

            let mut total = *coefficient;
            let mut count = 1;
            for next in current + 1..terms.len() {
                if used[next] {
                    continue;
                }
                if let Some((next_coefficient, next_rest)) = &split[next] {
                    // symbolic parts must be strictly equal
                    if next_rest == rest {
                        total += next_coefficient;
                        used[next] = true;
                        count += 1;
                    }
                }
            }

            if count == 1 {
                new_terms.push(terms[current].clone());
            } else {
                combined = true;
                if total != 0.0 {
                    new_terms.push(scale(total, rest.clone()));
                }
            }
        }

        combined.then(|| Expr::from_terms(new_terms))
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// `1+a+2 = a+3`
///
/// Sums every numeric term into a single number placed at the end of the sum, and drops it if it
/// is zero.
pub fn sum_numbers(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let numbers = terms.iter().filter_map(Expr::to_double).collect::<Vec<_>>();
        if numbers.len() < 2 && !numbers.contains(&0.0) {
            return None;
        }

        let sum = numbers.iter().sum::<f64>();
        if !sum.is_finite() {
            return None;
        }

        let mut new_terms = terms.iter()
            .filter(|term| term.to_double().is_none())
            .cloned()
            .collect::<Vec<_>>();
        if sum != 0.0 {
            new_terms.push(Expr::number(sum));
        }
        Some(Expr::from_terms(new_terms))
    })?;

    step_collector.push(Step::SumNumbers);
    Some(opt)
}

/// Applies the addition rules that only restructure the tree.
pub fn trivial(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    flatten_sum(expr, step_collector)
        .or_else(|| collapse_sum(expr, step_collector))
        .or_else(|| add_zero(expr, step_collector))
        .or_else(|| combine_like_terms(expr, step_collector))
}

/// Applies the addition rules that evaluate numbers.
pub fn full(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    sum_numbers(expr, step_collector)
}
