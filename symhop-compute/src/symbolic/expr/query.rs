//! Read-only questions about an expression.

use crate::consts::{CUSTOM_FUNCTIONS, RESERVED_SYMBOLS, SUPPORTED_FUNCTIONS};
use std::slice;
use super::{number::is_number_str, Expr};

impl Expr {
    /// Returns true if the expression is a variable or a number.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// Returns true if the expression is a number symbol, such as `2.0` or `-1.0`.
    pub fn is_numerical_symbol(&self) -> bool {
        matches!(self, Self::Symbol(name) if is_number_str(name))
    }

    /// Returns true if the expression is a symbol that is not a number.
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Symbol(name) if !is_number_str(name))
    }

    /// Returns true if the expression is a number without a fractional part.
    pub fn is_integer(&self) -> bool {
        self.to_double().is_some_and(super::is_whole)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(..))
    }

    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add(_))
    }

    pub fn is_multiply_or_divide(&self) -> bool {
        matches!(self, Self::Mul(..))
    }

    pub fn is_power(&self) -> bool {
        matches!(self, Self::Power(..))
    }

    pub fn is_equation(&self) -> bool {
        matches!(self, Self::Equation(..))
    }

    pub fn is_modulus(&self) -> bool {
        matches!(self, Self::Modulus(..))
    }

    /// Returns true if the expression is an equation with a single variable on its left side,
    /// such as `y = 2*x`.
    pub fn is_assignment(&self) -> bool {
        matches!(self, Self::Equation(left, _) if left.is_variable())
    }

    /// Returns true if the expression is `-1.0`, or a product with an odd number of `-1.0`
    /// factors and divisors.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Symbol(_) => self.is_minus_one(),
            Self::Mul(factors, divisors) => {
                let count = factors.iter().chain(divisors.iter()).filter(|e| e.is_minus_one()).count();
                count % 2 == 1
            },
            _ => false,
        }
    }

    /// Returns the value of the expression if it is a number, or a negated number
    /// (`-1.0*number`).
    pub fn to_double(&self) -> Option<f64> {
        match self {
            Self::Symbol(_) => self.as_number(),
            Self::Mul(factors, divisors) if factors.len() == 2 && divisors.is_empty() => {
                match (&factors[0], &factors[1]) {
                    (minus, value) | (value, minus) if minus.is_minus_one() => {
                        value.as_number().map(|value| -value)
                    },
                    _ => None,
                }
            },
            _ => None,
        }
    }

    /// The name of the called function, if this is a function call.
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Self::Function(name, _) => Some(name),
            _ => None,
        }
    }

    /// The name of the symbol, if this is a symbol.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// The arguments of a function call. Empty for anything else.
    pub fn arguments(&self) -> &[Expr] {
        match self {
            Self::Function(_, args) => args,
            _ => &[],
        }
    }

    /// The argument at the given index of a function call.
    pub fn argument(&self, idx: usize) -> Option<&Expr> {
        self.arguments().get(idx)
    }

    /// The terms of a sum. Any other expression is its own single term.
    pub fn terms(&self) -> &[Expr] {
        match self {
            Self::Add(terms) => terms,
            _ => slice::from_ref(self),
        }
    }

    /// The factors of a product. Any other expression is its own single factor.
    pub fn factors(&self) -> &[Expr] {
        match self {
            Self::Mul(factors, _) => factors,
            _ => slice::from_ref(self),
        }
    }

    /// The divisors of a product. Empty for anything else.
    pub fn divisors(&self) -> &[Expr] {
        match self {
            Self::Mul(_, divisors) | Self::Modulus(_, divisors) => divisors,
            _ => &[],
        }
    }

    pub fn base(&self) -> Option<&Expr> {
        match self {
            Self::Power(base, _) => Some(base),
            _ => None,
        }
    }

    pub fn power(&self) -> Option<&Expr> {
        match self {
            Self::Power(_, power) => Some(power),
            _ => None,
        }
    }

    pub fn left(&self) -> Option<&Expr> {
        match self {
            Self::Equation(left, _) => Some(left),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&Expr> {
        match self {
            Self::Equation(_, right) => Some(right),
            _ => None,
        }
    }

    pub fn dividend(&self) -> Option<&Expr> {
        match self {
            Self::Modulus(dividend, _) => Some(dividend),
            _ => None,
        }
    }

    /// Returns every distinct variable in the expression, in order of first appearance. Numbers
    /// and the symbols in [`RESERVED_SYMBOLS`] are skipped.
    pub fn get_variables(&self) -> Vec<Expr> {
        let mut variables = Vec::new();
        for expr in self.post_order_iter() {
            if let Self::Symbol(name) = expr {
                if expr.is_variable() && !RESERVED_SYMBOLS.contains(name.as_str()) {
                    variables.push(expr.clone());
                }
            }
        }
        remove_duplicates(&mut variables);
        variables
    }

    /// Returns the names of every distinct function called in the expression, outermost calls
    /// first.
    pub fn get_functions(&self) -> Vec<String> {
        fn collect(expr: &Expr, names: &mut Vec<String>) {
            if let Expr::Function(name, _) = expr {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
            for child in expr.children() {
                collect(child, names);
            }
        }

        let mut names = Vec::new();
        collect(self, &mut names);
        names
    }

    /// Returns the first call to the given function, searching depth-first.
    pub fn find_function(&self, name: &str) -> Option<&Expr> {
        if self.function_name() == Some(name) {
            return Some(self);
        }
        self.children().into_iter().find_map(|child| child.find_function(name))
    }

    /// Returns true if the expression is, or has a sub-expression, strictly equal to `expr`.
    pub fn contains(&self, expr: &Expr) -> bool {
        self.post_order_iter().any(|sub| sub == expr)
    }

    /// The product of the numeric factors of a product, divided by its numeric divisors. `1.0`
    /// for anything that is not a product.
    pub fn numerical_factor(&self) -> f64 {
        match self {
            Self::Mul(factors, divisors) => {
                let numerator = factors.iter().filter_map(Expr::as_number).product::<f64>();
                let denominator = divisors.iter().filter_map(Expr::as_number).product::<f64>();
                numerator / denominator
            },
            _ => 1.0,
        }
    }

    /// Returns the product without its numeric factors and divisors, so that
    /// `numerical_factor() * remove_numerical_factors()` is the original expression.
    pub fn remove_numerical_factors(&self) -> Expr {
        match self {
            Self::Mul(factors, divisors) => {
                let factors = factors.iter().filter(|e| !e.is_numerical_symbol()).cloned().collect();
                let divisors = divisors.iter().filter(|e| !e.is_numerical_symbol()).cloned().collect();
                Expr::from_factors_divisors(factors, divisors)
            },
            _ => self.clone(),
        }
    }

    /// Splits the expression into its numeric coefficient and the remaining symbolic part.
    /// Numbers are returned as `(value, 1.0)`.
    pub(crate) fn split_coefficient(&self) -> (f64, Expr) {
        if let Some(value) = self.to_double() {
            return (value, Expr::number(1.0));
        }
        (self.numerical_factor(), self.remove_numerical_factors())
    }

    /// Returns the sum of the coefficients of every term whose symbolic part is `term`.
    ///
    /// For `2*x + y + x`, the count of `x` is `3.0`.
    pub fn count_term(&self, term: &Expr) -> f64 {
        self.terms()
            .iter()
            .map(Expr::split_coefficient)
            .filter(|(_, rest)| rest == term)
            .map(|(coefficient, _)| coefficient)
            .sum()
    }

    /// Returns the called functions that are neither supported by the engine, nor Hopsan
    /// helper functions, nor listed in `user_functions`.
    pub fn unsupported_functions<S: AsRef<str>>(&self, user_functions: &[S]) -> Vec<String> {
        self.get_functions()
            .into_iter()
            .filter(|name| {
                !SUPPORTED_FUNCTIONS.contains(name.as_str())
                    && !CUSTOM_FUNCTIONS.contains(name.as_str())
                    && !user_functions.iter().any(|user| user.as_ref() == name.as_str())
            })
            .collect()
    }

    /// Returns true if every called function is known, see [`Expr::unsupported_functions`].
    pub fn verify_expression<S: AsRef<str>>(&self, user_functions: &[S]) -> bool {
        self.unsupported_functions(user_functions).is_empty()
    }
}

/// Removes every element equal to an earlier element, keeping the first occurrence.
pub fn remove_duplicates(items: &mut Vec<Expr>) {
    let mut idx = 0;
    while idx < items.len() {
        if items[..idx].contains(&items[idx]) {
            items.remove(idx);
        } else {
            idx += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(src: &str) -> Expr {
        Expr::parse(src).unwrap()
    }

    #[test]
    fn negative_literal() {
        let expr = parse("-5.0");
        assert!(expr.is_negative());
        assert_eq!(expr.to_double(), Some(-5.0));
        assert!(parse("-1").is_numerical_symbol());
        assert!(!parse("x").is_negative());
        assert!(parse("-x").is_negative());
    }

    #[test]
    fn kind_queries() {
        assert!(parse("x").is_variable());
        assert!(parse("3").is_integer());
        assert!(!parse("3.5").is_integer());
        assert!(parse("y = 2*x").is_assignment());
        assert!(!parse("2*y = x").is_assignment());
        assert!(parse("x % 3").is_modulus());
    }

    #[test]
    fn variables_skip_reserved_and_numbers() {
        let expr = parse("x*mTimestep + 2*y*Z + sin(x)");
        assert_eq!(expr.get_variables(), vec![Expr::symbol("x"), Expr::symbol("y")]);
    }

    #[test]
    fn functions_are_deduplicated() {
        let expr = parse("sin(cos(x)) + sin(y) + limit(x, 0, 1)");
        assert_eq!(expr.get_functions(), vec!["sin", "cos", "limit"]);
    }

    #[test]
    fn find_and_contains() {
        let expr = parse("a + b*der(x)");
        assert_eq!(expr.find_function("der"), Some(&parse("der(x)")));
        assert_eq!(expr.find_function("sin"), None);
        assert!(expr.contains(&parse("der(x)")));
        assert!(expr.contains(&parse("x")));
        assert!(!expr.contains(&parse("y")));
    }

    #[test]
    fn numerical_factors() {
        let expr = Expr::parse_with("-3*x*y/2", crate::symbolic::SimplifyLevel::Trivial).unwrap();
        assert_eq!(expr.numerical_factor(), -1.5);
        assert_eq!(expr.remove_numerical_factors(), parse("x*y"));
    }

    #[test]
    fn count_terms() {
        let expr = Expr::parse_with("2*x + y + x", crate::symbolic::SimplifyLevel::None).unwrap();
        assert_eq!(expr.count_term(&Expr::symbol("x")), 3.0);
        assert_eq!(expr.count_term(&Expr::symbol("y")), 1.0);
        assert_eq!(expr.count_term(&Expr::symbol("z")), 0.0);
    }

    #[test]
    fn verify_known_functions() {
        let expr = parse("sin(x) + hopsanLimit(y, 0, 1) + myTable(x)");
        assert!(!expr.verify_expression::<&str>(&[]));
        assert_eq!(expr.unsupported_functions::<&str>(&[]), vec!["myTable"]);
        assert!(expr.verify_expression(&["myTable"]));
        assert!(parse("a > b && ifElse(c, d, e)").verify_expression::<&str>(&[]));
    }

    #[test]
    fn duplicates_keep_first() {
        let mut items = vec![Expr::symbol("b"), Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("a")];
        remove_duplicates(&mut items);
        assert_eq!(items, vec![Expr::symbol("b"), Expr::symbol("a")]);
    }
}
