//! Constructors used to build new trees without going through the parser.
//!
//! The factories only collapse degenerate shapes (a sum of one term, a product of one factor);
//! they do not simplify. Call [`Expr::simplify`] on the result when needed.

use super::Expr;

impl Expr {
    /// Creates a variable, or a number if the name is numeric.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// `term1 + term2`
    pub fn from_two_terms(term1: Expr, term2: Expr) -> Self {
        Self::from_terms(vec![term1, term2])
    }

    /// The sum of the given terms. An empty list is `0.0`, a single term is returned as is.
    pub fn from_terms(mut terms: Vec<Expr>) -> Self {
        match terms.len() {
            0 => Self::number(0.0),
            1 => terms.remove(0),
            _ => Self::Add(terms),
        }
    }

    /// `factor1 * factor2`
    pub fn from_two_factors(factor1: Expr, factor2: Expr) -> Self {
        Self::from_factors_divisors(vec![factor1, factor2], Vec::new())
    }

    /// `factor / divisor`
    pub fn from_factor_divisor(factor: Expr, divisor: Expr) -> Self {
        Self::from_factors_divisors(vec![factor], vec![divisor])
    }

    /// The product of the factors divided by the product of the divisors.
    ///
    /// A single factor without divisors is returned as is. Without factors, the numerator is
    /// `1.0`.
    pub fn from_factors_divisors(mut factors: Vec<Expr>, divisors: Vec<Expr>) -> Self {
        if factors.is_empty() {
            if divisors.is_empty() {
                return Self::number(1.0);
            }
            factors.push(Self::number(1.0));
        }

        if factors.len() == 1 && divisors.is_empty() {
            factors.remove(0)
        } else {
            Self::Mul(factors, divisors)
        }
    }

    /// `pow(base, power)`
    pub fn from_base_power(base: Expr, power: Expr) -> Self {
        Self::Power(Box::new(base), Box::new(power))
    }

    /// A call to a function with a single argument.
    pub fn from_function_argument(function: &str, argument: Expr) -> Self {
        Self::from_function_arguments(function, vec![argument])
    }

    /// A call to a function. A leading `-` in the function name negates the call, so `-sin` with
    /// the argument `x` is `-1.0*sin(x)`.
    pub fn from_function_arguments(function: &str, arguments: Vec<Expr>) -> Self {
        match function.strip_prefix('-') {
            Some(name) => {
                let mut call = Self::Function(name.to_string(), arguments);
                call.change_sign();
                call
            },
            None => Self::Function(function.to_string(), arguments),
        }
    }

    /// `left = right`
    pub fn from_equation(left: Expr, right: Expr) -> Self {
        Self::Equation(Box::new(left), Box::new(right))
    }

    /// `dividend % divisor`
    pub fn from_modulus(dividend: Expr, divisor: Expr) -> Self {
        Self::Modulus(Box::new(dividend), vec![divisor])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn degenerate_shapes_collapse() {
        assert_eq!(Expr::from_terms(vec![]), Expr::number(0.0));
        assert_eq!(Expr::from_terms(vec![Expr::symbol("x")]), Expr::symbol("x"));
        assert_eq!(Expr::from_factors_divisors(vec![Expr::symbol("x")], vec![]), Expr::symbol("x"));
        assert_eq!(
            Expr::from_factors_divisors(vec![], vec![Expr::symbol("x")]),
            Expr::Mul(vec![Expr::number(1.0)], vec![Expr::symbol("x")]),
        );
    }

    #[test]
    fn negated_function_name() {
        let call = Expr::from_function_argument("-sin", Expr::symbol("x"));
        assert_eq!(call, Expr::Mul(
            vec![Expr::minus_one(), Expr::Function("sin".to_string(), vec![Expr::symbol("x")])],
            vec![],
        ));
        assert!(call.is_negative());
    }

    #[test]
    fn factories_match_parser() {
        let expr = Expr::from_two_terms(
            Expr::from_factor_divisor(Expr::symbol("a"), Expr::symbol("b")),
            Expr::from_base_power(Expr::symbol("x"), Expr::number(2.0)),
        );
        assert_eq!(expr, Expr::parse("a/b + x^2").unwrap());
    }
}
