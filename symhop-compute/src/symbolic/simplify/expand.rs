//! Expansion of products of sums and of whole powers.

use crate::symbolic::expr::{is_whole, Expr};
use super::{rules::multiply::MAX_EXPANDED_POWER, Recursion, SimplifyLevel};

/// Multiplies out every factor, producing a single sum of products divided by the divisors.
///
/// `(a+b)*(c+d)/e = (a*c+a*d+b*c+b*d)/e`
pub(crate) fn distribute_factors(factors: &[Expr], divisors: &[Expr]) -> Expr {
    let mut products = vec![Expr::number(1.0)];
    for (idx, factor) in factors.iter().enumerate() {
        products = products.iter()
            .flat_map(|product| {
                factor.terms().iter().map(move |term| {
                    if idx == 0 {
                        term.clone()
                    } else {
                        Expr::from_two_factors(product.clone(), term.clone())
                    }
                })
            })
            .collect();
    }

    let sum = Expr::from_terms(products);
    if divisors.is_empty() {
        sum
    } else {
        Expr::Mul(vec![sum], divisors.to_vec())
    }
}

impl Expr {
    /// Multiplies out a product that has sums among its factors, then simplifies the result at
    /// the given level. Anything else is left unchanged.
    ///
    /// ```
    /// use symhop_compute::symbolic::{Expr, SimplifyLevel};
    ///
    /// let mut expr = Expr::parse_with("(a+b)*c", SimplifyLevel::Trivial).unwrap();
    /// expr.expand(SimplifyLevel::Trivial);
    /// assert_eq!(expr, Expr::parse("a*c + b*c").unwrap());
    /// ```
    pub fn expand(&mut self, level: SimplifyLevel) {
        if let Self::Mul(factors, divisors) = self {
            if factors.iter().any(Expr::is_add) {
                *self = distribute_factors(factors, divisors);
                self.simplify(level, Recursion::Recursive);
            }
        }
    }

    /// Rewrites every whole power as a product of repeated factors, so that `pow(x,3)` becomes
    /// `x*x*x` and `pow(x,-2)` becomes `1/(x*x)`. Powers larger than 64 in magnitude
    /// are kept.
    ///
    /// The result is not simplified, since simplification merges the factors back into powers.
    pub fn expand_powers(&mut self) {
        *self = self.expanded_powers();
    }

    fn expanded_powers(&self) -> Expr {
        let expr = self.map_children(Expr::expanded_powers);
        let Self::Power(base, power) = &expr else {
            return expr;
        };
        let n = match power.to_double() {
            Some(n) if is_whole(n) && n.abs() <= MAX_EXPANDED_POWER => n,
            _ => return expr,
        };

        let repeated = std::iter::repeat((**base).clone())
            .take(n.abs() as usize)
            .collect::<Vec<_>>();
        if n >= 0.0 {
            Expr::from_factors_divisors(repeated, Vec::new())
        } else {
            Expr::Mul(vec![Expr::number(1.0)], repeated)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn raw(src: &str) -> Expr {
        Expr::parse_with(src, SimplifyLevel::None).unwrap()
    }

    #[test]
    fn distributes_every_factor() {
        let factors = [raw("a+b"), raw("c+d")];
        let expanded = distribute_factors(&factors, &[]);
        assert_eq!(expanded, Expr::Add(vec![
            Expr::from_two_factors(raw("a"), raw("c")),
            Expr::from_two_factors(raw("a"), raw("d")),
            Expr::from_two_factors(raw("b"), raw("c")),
            Expr::from_two_factors(raw("b"), raw("d")),
        ]));
    }

    #[test]
    fn expand_keeps_divisors() {
        let mut expr = raw("(a+b)*c/d");
        expr.expand(SimplifyLevel::Trivial);
        assert_eq!(expr, Expr::parse_with("(a*c + b*c)/d", SimplifyLevel::Trivial).unwrap());
    }

    #[test]
    fn expand_ignores_other_shapes() {
        let mut expr = raw("a + b");
        expr.expand(SimplifyLevel::Full);
        assert_eq!(expr, raw("a + b"));
    }

    #[test]
    fn powers_become_products() {
        let mut expr = raw("pow(x, 3) + pow(y, -2) + pow(z, 0.5)");
        expr.expand_powers();
        assert_eq!(expr, raw("x*x*x + 1/y/y + pow(z, 0.5)"));
    }

    #[test]
    fn nested_powers_expand() {
        let mut expr = raw("pow(pow(x, 2), 2)");
        expr.expand_powers();
        assert_eq!(expr, Expr::Mul(vec![raw("x*x"), raw("x*x")], vec![]));
    }

    #[test]
    fn huge_powers_are_kept() {
        let mut expr = raw("pow(x, 1e18) + pow(y, -1e18) + pow(z, 65)");
        expr.expand_powers();
        assert_eq!(expr, raw("pow(x, 1e18) + pow(y, -1e18) + pow(z, 65)"));

        let mut expr = raw("pow(x, 64)");
        expr.expand_powers();
        assert_eq!(expr.factors().len(), 64);
    }
}
