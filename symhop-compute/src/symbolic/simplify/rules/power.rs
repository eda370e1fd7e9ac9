//! Simplification rules for powers.

use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};

/// `pow(a,1) = a`
pub fn power_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, power| {
        (power.to_double() == Some(1.0)).then(|| base.clone())
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `pow(2,3) = 8`
///
/// Only applies if the result is a finite number.
pub fn fold_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, power| {
        let value = base.to_double()?.powf(power.to_double()?);
        value.is_finite().then(|| Expr::number(value))
    })?;

    step_collector.push(Step::FoldPower);
    Some(opt)
}

/// `pow(a,-b) = 1/pow(a,b)`
pub fn negative_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, power| {
        if !power.is_negative() {
            return None;
        }

        let mut positive = power.clone();
        positive.change_sign();
        let divisor = Expr::from_base_power(base.clone(), positive);
        Some(Expr::Mul(vec![Expr::number(1.0)], vec![divisor]))
    })?;

    step_collector.push(Step::NegativePower);
    Some(opt)
}

/// Applies all power rules.
pub fn trivial(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    fold_power(expr, step_collector)
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| negative_power(expr, step_collector))
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
    fn numbers_are_folded() {
        assert_eq!(fold_power(&raw("pow(2, 10)"), &mut ()), Some(Expr::number(1024.0)));
        assert_eq!(fold_power(&raw("pow(-2, 3)"), &mut ()), Some(Expr::number(-8.0)));
        assert_eq!(fold_power(&raw("pow(-2, 0.5)"), &mut ()), None);
        assert_eq!(fold_power(&raw("pow(x, 2)"), &mut ()), None);
    }

    #[test]
    fn negative_exponent_moves_to_divisor() {
        assert_eq!(negative_power(&raw("pow(x, -y)"), &mut ()), Some(raw("1/pow(x, y)")));
        assert_eq!(negative_power(&raw("pow(x, y)"), &mut ()), None);
    }

    #[test]
    fn unit_exponent() {
        assert_eq!(power_one(&raw("pow(a+b, 1)"), &mut ()), Some(raw("a+b")));
    }
}
