//! In-place edits of an expression.

use crate::symbolic::{
    error::DivisionByZero,
    simplify::{Recursion, SimplifyLevel},
};
use std::mem;
use super::Expr;

impl Expr {
    /// Takes the expression out of `self`, leaving a placeholder behind.
    fn take(&mut self) -> Expr {
        mem::replace(self, Expr::number(0.0))
    }

    /// Negates the expression, removing an existing `-1.0` factor rather than adding a second
    /// one where possible.
    pub fn change_sign(&mut self) {
        *self = match self.take() {
            Self::Mul(mut factors, mut divisors) => {
                if let Some(idx) = factors.iter().position(Expr::is_minus_one) {
                    factors.remove(idx);
                } else if let Some(idx) = divisors.iter().position(Expr::is_minus_one) {
                    divisors.remove(idx);
                } else {
                    factors.insert(0, Self::minus_one());
                }
                Self::from_factors_divisors(factors, divisors)
            },
            expr => match expr.as_number() {
                Some(value) => Self::number(-value),
                None => Self::Mul(vec![Self::minus_one(), expr], Vec::new()),
            },
        };
    }

    /// Multiplies the expression by `factor`.
    pub fn multiply_by(&mut self, factor: Expr) {
        *self = Self::from_two_factors(self.take(), factor);
        self.simplify(SimplifyLevel::Trivial, Recursion::NonRecursive);
    }

    /// Divides the expression by `divisor`. Dividing by the number zero is an error, and leaves
    /// the expression unchanged.
    pub fn divide_by(&mut self, divisor: Expr) -> Result<(), DivisionByZero> {
        if divisor.to_double() == Some(0.0) {
            return Err(DivisionByZero);
        }
        *self = Self::from_factor_divisor(self.take(), divisor);
        self.simplify(SimplifyLevel::Trivial, Recursion::NonRecursive);
        Ok(())
    }

    /// Adds `term` to the expression.
    pub fn add_by(&mut self, term: Expr) {
        *self = Self::from_two_terms(self.take(), term);
        self.simplify(SimplifyLevel::Trivial, Recursion::NonRecursive);
    }

    /// Subtracts `term` from the expression.
    pub fn subtract_by(&mut self, mut term: Expr) {
        term.change_sign();
        self.add_by(term);
    }

    /// Drops every divisor of a product.
    pub fn remove_divisors(&mut self) {
        if let Self::Mul(factors, _) = self {
            let factors = mem::take(factors);
            *self = Self::from_factors_divisors(factors, Vec::new());
        }
    }

    /// Removes one occurrence of `factor` from the factors of a product. An expression equal to
    /// `factor` becomes `1.0`.
    pub fn remove_factor(&mut self, factor: &Expr) {
        if self == factor {
            *self = Self::number(1.0);
            return;
        }

        if let Self::Mul(factors, divisors) = self {
            if let Some(idx) = factors.iter().position(|f| f == factor) {
                factors.remove(idx);
                let (factors, divisors) = (mem::take(factors), mem::take(divisors));
                *self = Self::from_factors_divisors(factors, divisors);
            }
        }
    }

    /// Replaces every sub-expression strictly equal to `old` with `new`.
    pub fn replace(&mut self, old: &Expr, new: &Expr) {
        *self = self.replaced(old, new);
    }

    /// Returns a copy of the expression with every sub-expression strictly equal to `old`
    /// replaced with `new`.
    pub fn replaced(&self, old: &Expr, new: &Expr) -> Expr {
        if self == old {
            new.clone()
        } else {
            self.map_children(|child| child.replaced(old, new))
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
    fn change_sign_twice_is_identity() {
        for src in ["x", "2*x", "-x", "a/b", "sin(x)", "3", "-1", "a+b"] {
            let original = parse(src);
            let mut expr = original.clone();
            expr.change_sign();
            assert_ne!(expr, original, "{src}");
            expr.change_sign();
            assert_eq!(expr, original, "{src}");
        }
    }

    #[test]
    fn change_sign_removes_existing_factor() {
        let mut expr = parse("-x");
        expr.change_sign();
        assert_eq!(expr, Expr::symbol("x"));

        let mut expr = Expr::minus_one();
        expr.change_sign();
        assert_eq!(expr, Expr::number(1.0));
    }

    #[test]
    fn arithmetic_mutators() {
        let mut expr = parse("a*b");
        expr.multiply_by(Expr::symbol("c"));
        assert_eq!(expr, parse("a*b*c"));

        expr.divide_by(Expr::symbol("d")).unwrap();
        assert_eq!(expr, parse("a*b*c/d"));

        let mut expr = parse("a+b");
        expr.add_by(Expr::symbol("c"));
        assert_eq!(expr, parse("a+b+c"));
        expr.subtract_by(Expr::symbol("d"));
        assert_eq!(expr, parse("a+b+c-d"));
    }

    #[test]
    fn divide_by_zero_is_rejected() {
        let mut expr = parse("x");
        assert_eq!(expr.divide_by(Expr::number(0.0)), Err(DivisionByZero));
        assert_eq!(expr, parse("x"));
    }

    #[test]
    fn remove_factors_and_divisors() {
        let mut expr = parse("a*b/c");
        expr.remove_divisors();
        assert_eq!(expr, parse("a*b"));
        expr.remove_factor(&Expr::symbol("a"));
        assert_eq!(expr, Expr::symbol("b"));
        expr.remove_factor(&Expr::symbol("b"));
        assert_eq!(expr, Expr::number(1.0));
    }

    #[test]
    fn replace_everywhere() {
        let mut expr = parse("x*sin(x) + y");
        expr.replace(&Expr::symbol("x"), &parse("a+b"));
        assert_eq!(expr, Expr::parse_with("(a+b)*sin(a+b) + y", SimplifyLevel::None).unwrap());
    }
}
