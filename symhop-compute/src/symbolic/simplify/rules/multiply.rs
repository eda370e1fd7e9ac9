//! Simplification rules for products and quotients, including cancelling and merging like
//! factors.

use crate::symbolic::{
    expr::{is_whole, Expr},
    simplify::{expand::distribute_factors, rules::do_multiply, step::Step},
    step_collector::StepCollector,
};

/// Largest whole power that is expanded into repeated factors to be cancelled.
pub(crate) const MAX_EXPANDED_POWER: f64 = 64.0;

/// `a*(b*c) = a*b*c`
/// `a/(b/c) = a*c/b`
pub fn flatten_product(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors, divisors| {
        if !factors.iter().chain(divisors.iter()).any(Expr::is_multiply_or_divide) {
            return None;
        }

        let (mut new_factors, mut new_divisors) = (Vec::new(), Vec::new());
        for factor in factors {
            match factor {
                Expr::Mul(inner_factors, inner_divisors) => {
                    new_factors.extend(inner_factors.iter().cloned());
                    new_divisors.extend(inner_divisors.iter().cloned());
                },
                factor => new_factors.push(factor.clone()),
            }
        }
        for divisor in divisors {
            match divisor {
                Expr::Mul(inner_factors, inner_divisors) => {
                    new_divisors.extend(inner_factors.iter().cloned());
                    new_factors.extend(inner_divisors.iter().cloned());
                },
                divisor => new_divisors.push(divisor.clone()),
            }
        }

        Some(Expr::from_factors_divisors(new_factors, new_divisors))
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::FlattenProduct);
    Some(opt)
}

/// A product of a single factor is that factor. An empty product is `1`.
pub fn collapse_product(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors, divisors| {
        (factors.is_empty() || (factors.len() == 1 && divisors.is_empty()))
            .then(|| Expr::from_factors_divisors(factors.to_vec(), divisors.to_vec()))
    })?;

    step_collector.push(Step::CollapseProduct);
    Some(opt)
}

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors, _| {
        factors.iter()
            .any(|factor| factor.to_double() == Some(0.0))
            .then(|| Expr::number(0.0))
    })?;

    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a/1 = a`
pub fn multiply_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors, divisors| {
        let removable_factor = factors.len() > 1 && factors.iter().any(|e| e.is_number(1.0));
        let removable_divisor = divisors.iter().any(|e| e.is_number(1.0));
        if !removable_factor && !removable_divisor {
            return None;
        }

        let new_factors = factors.iter().filter(|e| !e.is_number(1.0)).cloned().collect();
        let new_divisors = divisors.iter().filter(|e| !e.is_number(1.0)).cloned().collect();
        Some(Expr::from_factors_divisors(new_factors, new_divisors))
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// `(-1)*(-1)*a = a`
/// `a/(-1) = (-1)*a`
///
/// Leaves at most one `-1.0`, as a factor.
pub fn cancel_negatives(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors, divisors| {
        let in_factors = factors.iter().filter(|e| e.is_minus_one()).count();
        let in_divisors = divisors.iter().filter(|e| e.is_minus_one()).count();
        if in_factors + in_divisors < 2 && in_divisors == 0 {
            return None;
        }

        let mut new_factors = factors.iter()
            .filter(|e| !e.is_minus_one())
            .cloned()
            .collect::<Vec<_>>();
        let new_divisors = divisors.iter()
            .filter(|e| !e.is_minus_one())
            .cloned()
            .collect();
        if (in_factors + in_divisors) % 2 == 1 {
            new_factors.insert(0, Expr::minus_one());
        }
        Some(Expr::from_factors_divisors(new_factors, new_divisors))
    })?;

    step_collector.push(Step::CancelNegatives);
    Some(opt)
}

/// `2*a*3/4 = 1.5*a`
///
/// Multiplies the numeric factors together and divides by the numeric divisors. The `-1.0`
/// factor and zero divisors are left alone. The folded coefficient becomes the first factor.
pub fn fold_numbers(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors, divisors| {
        let foldable_factor = |e: &Expr| e.is_numerical_symbol() && !e.is_minus_one();
        let foldable_divisor = |e: &Expr| foldable_factor(e) && !e.is_number(0.0);

        let numeric_factors = factors.iter().filter(|e| foldable_factor(*e)).count();
        let numeric_divisors = divisors.iter().filter(|e| foldable_divisor(*e)).count();
        if numeric_factors < 2 && numeric_divisors == 0 {
            return None;
        }

        let numerator = factors.iter()
            .filter(|e| foldable_factor(*e))
            .filter_map(Expr::as_number)
            .product::<f64>();
        let denominator = divisors.iter()
            .filter(|e| foldable_divisor(*e))
            .filter_map(Expr::as_number)
            .product::<f64>();
        let coefficient = numerator / denominator;
        if !coefficient.is_finite() {
            return None;
        }
        if coefficient == 0.0 {
            return Some(Expr::number(0.0));
        }

        let mut new_factors = Vec::with_capacity(factors.len());
        if coefficient != 1.0 {
            new_factors.push(Expr::number(coefficient));
        }
        new_factors.extend(factors.iter().filter(|e| !foldable_factor(*e)).cloned());
        let new_divisors = divisors.iter().filter(|e| !foldable_divisor(*e)).cloned().collect();
        Some(Expr::from_factors_divisors(new_factors, new_divisors))
    })?;

    step_collector.push(Step::FoldNumbers);
    Some(opt)
}

/// `a*(b+c) = a*b+a*c`
/// `(a+b)*(c+d)/e = (a*c+a*d+b*c+b*d)/e`
///
/// Only factors are distributed; sums among the divisors are kept as they are.
pub fn distribute(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors, divisors| {
        (factors.len() > 1 && factors.iter().any(Expr::is_add))
            .then(|| distribute_factors(factors, divisors))
    })?;

    step_collector.push(Step::Distribute);
    Some(opt)
}

/// Expands whole powers of at most [`MAX_EXPANDED_POWER`] into repeated factors, so that they can
/// be cancelled one by one.
fn expand_whole_powers(exprs: &[Expr]) -> Vec<Expr> {
    let mut expanded = Vec::with_capacity(exprs.len());
    for expr in exprs {
        match expr {
            Expr::Power(base, power) => match power.to_double() {
                Some(n) if is_whole(n) && n > 1.0 && n <= MAX_EXPANDED_POWER => {
                    expanded.extend(std::iter::repeat((**base).clone()).take(n as usize));
                },
                _ => expanded.push(expr.clone()),
            },
            expr => expanded.push(expr.clone()),
        }
    }
    expanded
}

/// Merges repeated non-numeric expressions into powers. The power takes the place of the first
/// occurrence.
fn merge_repeated(exprs: Vec<Expr>) -> Vec<Expr> {
    let mut used = vec![false; exprs.len()];
    let mut merged = Vec::with_capacity(exprs.len());
    for current in 0..exprs.len() {
        if used[current] {
            continue;
        }
        used[current] = true;
        if exprs[current].is_numerical_symbol() {
            merged.push(exprs[current].clone());
            continue;
        }

        let mut count = 1;
        for next in current + 1..exprs.len() {
            if !used[next] && exprs[next] == exprs[current] {
                used[next] = true;
                count += 1;
            }
        }

        if count == 1 {
            merged.push(exprs[current].clone());
        } else {
            merged.push(Expr::from_base_power(exprs[current].clone(), Expr::number(count as f64)));
        }
    }
    merged
}

/// `a*b/b = a`
/// `a*a*pow(a,2) = pow(a,4)`
/// `pow(a,3)/a = pow(a,2)`
///
/// Cancels every factor against a strictly equal divisor, then merges the remaining repeated
/// factors and divisors into powers.
pub fn cancel_and_merge(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors, divisors| {
        let mut factors = expand_whole_powers(factors);
        let mut divisors = expand_whole_powers(divisors);

        let mut idx = 0;
        while idx < factors.len() {
            match divisors.iter().position(|divisor| divisor == &factors[idx]) {
                Some(divisor_idx) => {
                    divisors.remove(divisor_idx);
                    factors.remove(idx);
                },
                None => idx += 1,
            }
        }

        let result = Expr::from_factors_divisors(merge_repeated(factors), merge_repeated(divisors));
        (&result != expr).then_some(result)
    })?;

    let cancelled = {
        let divisors = expand_whole_powers(expr.divisors());
        expand_whole_powers(expr.factors()).iter().any(|factor| divisors.contains(factor))
    };
    step_collector.push(if cancelled { Step::CancelFactors } else { Step::MergeFactors });
    Some(opt)
}

/// Applies the multiplication rules that only restructure the tree.
pub fn trivial(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    flatten_product(expr, step_collector)
        .or_else(|| collapse_product(expr, step_collector))
        .or_else(|| multiply_zero(expr, step_collector))
        .or_else(|| cancel_negatives(expr, step_collector))
        .or_else(|| multiply_one(expr, step_collector))
}

/// Applies the multiplication rules that evaluate numbers or expand the tree.
pub fn full(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    fold_numbers(expr, step_collector)
        .or_else(|| distribute(expr, step_collector))
        .or_else(|| cancel_and_merge(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::symbolic::simplify::SimplifyLevel;
    use super::*;

    fn raw(src: &str) -> Expr {
        Expr::parse_with(src, SimplifyLevel::None).unwrap()
    }

    fn mul(factors: &[&str], divisors: &[&str]) -> Expr {
        Expr::Mul(
            factors.iter().map(|s| raw(s)).collect(),
            divisors.iter().map(|s| raw(s)).collect(),
        )
    }

    #[test]
    fn nested_quotients_flatten() {
        assert_eq!(flatten_product(&raw("a/(b/c)"), &mut ()), Some(mul(&["a", "c"], &["b"])));
        assert_eq!(flatten_product(&raw("a*b/c"), &mut ()), None);
    }

    #[test]
    fn zero_and_one() {
        assert_eq!(multiply_zero(&raw("a*0*b"), &mut ()), Some(Expr::number(0.0)));
        assert_eq!(multiply_one(&raw("1*a/1"), &mut ()), Some(raw("a")));
        assert_eq!(multiply_one(&raw("1/a"), &mut ()), None);
    }

    #[test]
    fn negatives_cancel_in_pairs() {
        let expr = mul(&["-1", "a", "-1"], &["-1"]);
        assert_eq!(cancel_negatives(&expr, &mut ()), Some(mul(&["-1", "a"], &[])));
        assert_eq!(cancel_negatives(&mul(&["-1", "a"], &[]), &mut ()), None);
        assert_eq!(cancel_negatives(&mul(&["-1", "-1"], &[]), &mut ()), Some(Expr::number(1.0)));
    }

    #[test]
    fn numbers_fold_into_coefficient() {
        assert_eq!(fold_numbers(&mul(&["a", "2", "3"], &["4"]), &mut ()), Some(mul(&["1.5", "a"], &[])));
        assert_eq!(fold_numbers(&mul(&["2", "a"], &[]), &mut ()), None);
        assert_eq!(fold_numbers(&mul(&["2", "a"], &["2"]), &mut ()), Some(raw("a")));
        assert_eq!(fold_numbers(&mul(&["a"], &["0"]), &mut ()), None);
    }

    #[test]
    fn distributes_over_factor_sums() {
        let expr = mul(&["a", "b+c"], &["d"]);
        let expected = Expr::Mul(
            vec![Expr::Add(vec![
                Expr::from_two_factors(raw("a"), raw("b")),
                Expr::from_two_factors(raw("a"), raw("c")),
            ])],
            vec![raw("d")],
        );
        assert_eq!(distribute(&expr, &mut ()), Some(expected));
        assert_eq!(distribute(&mul(&["a"], &["b+c"]), &mut ()), None);
    }

    #[test]
    fn cancels_then_merges() {
        let mut steps = Vec::new();
        assert_eq!(cancel_and_merge(&mul(&["x", "y"], &["y"]), &mut steps), Some(raw("x")));
        assert_eq!(steps, vec![Step::CancelFactors]);

        assert_eq!(cancel_and_merge(&mul(&["pow(x,3)"], &["x"]), &mut ()), Some(raw("pow(x,2)")));
        assert_eq!(cancel_and_merge(&mul(&["x", "x", "y"], &[]), &mut ()), Some(mul(&["pow(x,2)", "y"], &[])));
        assert_eq!(cancel_and_merge(&mul(&["pow(x,2)", "y"], &[]), &mut ()), None);
    }
}
