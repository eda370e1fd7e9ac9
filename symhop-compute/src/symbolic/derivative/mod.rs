//! Symbolic differentiation.
//!
//! [`Expr::derivative`] differentiates an expression with respect to another expression, usually
//! a variable. Sums, products, quotients and powers follow the usual rules; function calls are
//! differentiated with the chain rule, using the rules in [`function`].
//!
//! Functions without a known derivative do not abort the computation. Their derivative is taken
//! to be zero, the name is recorded, and the best-effort result is returned inside a
//! [`DerivativeError`].

use crate::diagnostic::{report, Diagnostic};
use crate::symbolic::{
    expr::Expr,
    simplify::{simplify, SimplifyLevel},
    step_collector::StepCollector,
};
use log::debug;
use std::{error, fmt};

mod function;

/// Returns `true` if the given [`Expr`] is "clearly" zero. This is intended to keep intermediate
/// trees small and is not mathematically rigorous.
fn is_trivially_zero(e: &Expr) -> bool {
    match e {
        Expr::Symbol(_) => e.is_number(0.0),
        Expr::Add(terms) => terms.iter().all(is_trivially_zero),
        Expr::Mul(factors, _) => factors.iter().any(is_trivially_zero),
        _ => false,
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" one. This is intended to keep intermediate
/// trees small and is not mathematically rigorous.
fn is_trivially_unity(e: &Expr) -> bool {
    match e {
        Expr::Symbol(_) => e.is_number(1.0),
        Expr::Mul(factors, divisors) => divisors.is_empty() && factors.iter().all(is_trivially_unity),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the factors are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder {
    factors: Vec<Expr>,
    divisors: Vec<Expr>,
    zero: bool,
}

impl From<MultBuilder> for Expr {
    fn from(value: MultBuilder) -> Self {
        if value.zero {
            Expr::number(0.0)
        } else {
            Expr::from_factors_divisors(value.factors, value.divisors)
        }
    }
}

impl MultBuilder {
    fn mult(mut self, e: Expr) -> Self {
        if is_trivially_zero(&e) {
            self.zero = true;
        } else if !is_trivially_unity(&e) {
            self.factors.push(e);
        }
        self
    }

    fn divide(mut self, e: Expr) -> Self {
        if !is_trivially_unity(&e) {
            self.divisors.push(e);
        }
        self
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl From<SumBuilder> for Expr {
    fn from(value: SumBuilder) -> Self {
        Expr::from_terms(value.0)
    }
}

impl SumBuilder {
    fn add(mut self, e: Expr) -> Self {
        if !is_trivially_zero(&e) {
            self.0.push(e);
        }
        self
    }
}

/// The derivative could not be computed symbolically, because the expression calls functions
/// whose derivative is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeError {
    /// The derivative computed with every unknown function derivative taken as zero.
    pub partial: Expr,

    /// The names of the functions whose derivative is unknown, in order of first appearance.
    pub unsupported: Vec<String>,
}

impl fmt::Display for DerivativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not compute the derivative of: {}", self.unsupported.join(", "))
    }
}

impl error::Error for DerivativeError {}

/// The variable being differentiated against, and the unsupported functions found so far.
struct Differentiator<'a> {
    with: &'a Expr,
    unsupported: Vec<String>,
}

impl Differentiator<'_> {
    fn unsupported(&mut self, name: &str) -> Expr {
        if !self.unsupported.iter().any(|known| known == name) {
            self.unsupported.push(name.to_string());
        }
        Expr::number(0.0)
    }

    /// `(f + g)' = f' + g'`
    fn sum_rule(&mut self, terms: &[Expr]) -> Expr {
        terms.iter()
            .fold(SumBuilder::default(), |sum, term| sum.add(self.derivative(term)))
            .into()
    }

    /// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
    fn product_rule(&mut self, factors: &[Expr]) -> Expr {
        let mut outer_sum = SumBuilder::default();
        for derivative_index in 0..factors.len() {
            let mut inner_mult = MultBuilder::default();
            for (term_index, factor) in factors.iter().enumerate() {
                inner_mult = if derivative_index == term_index {
                    inner_mult.mult(self.derivative(factor))
                } else {
                    inner_mult.mult(factor.clone())
                };
            }
            outer_sum = outer_sum.add(inner_mult.into());
        }
        outer_sum.into()
    }

    /// `(f / g)' = (g * f' - f * g') / (g * g)`
    fn quotient_rule(&mut self, factors: &[Expr], divisors: &[Expr]) -> Expr {
        let numerator = Expr::from_factors_divisors(factors.to_vec(), Vec::new());
        let denominator = Expr::from_factors_divisors(divisors.to_vec(), Vec::new());
        let d_numerator = self.derivative(&numerator);
        let d_denominator = self.derivative(&denominator);

        let difference = SumBuilder::default()
            .add(MultBuilder::default().mult(denominator.clone()).mult(d_numerator).into())
            .add(MultBuilder::default()
                .mult(Expr::minus_one())
                .mult(numerator)
                .mult(d_denominator)
                .into());
        MultBuilder::default()
            .mult(difference.into())
            .divide(Expr::from_two_factors(denominator.clone(), denominator))
            .into()
    }

    /// `(f^g)' = f^(g-1) * (g * f' + f * log(f) * g')`
    fn power_rule(&mut self, base: &Expr, power: &Expr) -> Expr {
        let z = Expr::symbol("Z");
        let mut minus_z = z.clone();
        minus_z.change_sign();
        if base == &z || base == &minus_z {
            return Expr::number(0.0);
        }

        let d_base = self.derivative(base);
        let d_power = self.derivative(power);
        let factor = Expr::from_base_power(
            base.clone(),
            Expr::from_two_terms(power.clone(), Expr::minus_one()),
        );
        let sum = SumBuilder::default()
            .add(MultBuilder::default().mult(power.clone()).mult(d_base).into())
            .add(MultBuilder::default()
                .mult(base.clone())
                .mult(Expr::from_function_argument("log", base.clone()))
                .mult(d_power)
                .into());
        MultBuilder::default().mult(factor).mult(sum.into()).into()
    }

    fn derivative(&mut self, expr: &Expr) -> Expr {
        if expr == self.with {
            return Expr::number(1.0);
        }

        match expr {
            Expr::Symbol(_) | Expr::Modulus(..) => Expr::number(0.0),
            Expr::Equation(left, right) => {
                let left = self.derivative(left);
                let right = self.derivative(right);
                Expr::from_equation(left, right)
            },
            Expr::Function(name, args) => function::function_derivative(self, name, args),
            Expr::Add(terms) => self.sum_rule(terms),
            Expr::Mul(factors, _) if factors.contains(&Expr::symbol("Z")) => Expr::number(0.0),
            Expr::Mul(factors, divisors) if divisors.is_empty() => self.product_rule(factors),
            Expr::Mul(factors, divisors) => self.quotient_rule(factors, divisors),
            Expr::Power(base, power) => self.power_rule(base, power),
        }
    }
}

impl Expr {
    /// Computes the derivative of the expression with respect to `with`, and fully simplifies
    /// it.
    ///
    /// ```
    /// use symhop_compute::Expr;
    ///
    /// let expr = Expr::parse("x*sin(x)").unwrap();
    /// let derivative = expr.derivative(&Expr::symbol("x")).unwrap();
    /// assert_eq!(derivative, Expr::parse("sin(x) + x*cos(x)").unwrap());
    /// ```
    pub fn derivative(&self, with: &Expr) -> Result<Expr, DerivativeError> {
        self.derivative_with(with, &mut ())
    }

    /// Computes the derivative of the expression with respect to `with`, reporting a diagnostic
    /// for every function whose derivative is unknown.
    pub fn derivative_with(
        &self,
        with: &Expr,
        diagnostics: &mut dyn StepCollector<Diagnostic>,
    ) -> Result<Expr, DerivativeError> {
        let mut differentiator = Differentiator { with, unsupported: Vec::new() };
        let derivative = simplify(&differentiator.derivative(self), SimplifyLevel::Full);
        debug!("d/d({}) {} = {}", with, self, derivative);

        if differentiator.unsupported.is_empty() {
            return Ok(derivative);
        }

        for name in &differentiator.unsupported {
            report(diagnostics, Diagnostic::error(format!(
                "Could not compute function derivative of \"{}\": Not implemented.",
                name,
            )));
        }
        Err(DerivativeError { partial: derivative, unsupported: differentiator.unsupported })
    }
}
