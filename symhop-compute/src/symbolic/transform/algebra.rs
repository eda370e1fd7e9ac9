//! Rearrangement of equations and sums.

use crate::{
    diagnostic::{report, Diagnostic},
    symbolic::{
        error::NotAnEquation,
        expr::is_whole,
        simplify::{rules::multiply::MAX_EXPANDED_POWER, Recursion, SimplifyLevel},
        step_collector::StepCollector,
        Expr,
    },
};
use log::debug;

/// Returns the terms of the side with every product of sums multiplied out. A sum divided by
/// something is split into one quotient per term.
fn expanded_terms(side: &Expr) -> Vec<Expr> {
    let side = side.simplified(SimplifyLevel::Full, Recursion::Recursive);
    side.terms()
        .iter()
        .flat_map(|term| {
            let mut term = term.clone();
            term.expand(SimplifyLevel::Full);
            match term {
                Expr::Mul(factors, divisors) if factors.len() == 1 && factors[0].is_add() => factors[0]
                    .terms()
                    .iter()
                    .map(|t| Expr::from_factors_divisors(vec![t.clone()], divisors.clone()))
                    .collect::<Vec<_>>(),
                term => term.terms().to_vec(),
            }
        })
        .collect()
}

/// Returns the divisors of the term, with whole powers up to [`MAX_EXPANDED_POWER`] written as
/// repeated divisors.
fn divisor_list(term: &Expr) -> Vec<Expr> {
    term.divisors()
        .iter()
        .flat_map(|divisor| {
            let repeat = divisor.power()
                .and_then(Expr::to_double)
                .filter(|n| *n > 0.0 && *n <= MAX_EXPANDED_POWER && is_whole(*n));
            match (divisor.base(), repeat) {
                (Some(base), Some(n)) => vec![base.clone(); n as usize],
                _ => vec![divisor.clone()],
            }
        })
        .collect()
}

/// Multiplies the term by every divisor in `all_divisors` that is not one of its own divisors,
/// and drops its divisors.
fn clear_divisors(term: &Expr, all_divisors: &[Expr]) -> Expr {
    let mut missing = all_divisors.to_vec();
    for divisor in &divisor_list(term) {
        if let Some(idx) = missing.iter().position(|d| d == divisor) {
            missing.remove(idx);
        }
    }

    let mut factors = term.factors().to_vec();
    factors.extend(missing);
    Expr::from_factors_divisors(factors, Vec::new())
}

impl Expr {
    /// Multiplies both sides of an equation by the divisors of its terms, so that no term has
    /// divisors left. Products of sums are multiplied out first.
    ///
    /// ```
    /// use symhop_compute::Expr;
    ///
    /// let mut expr = Expr::parse("y = a/b + c").unwrap();
    /// expr.linearize().unwrap();
    /// assert_eq!(expr, Expr::parse("y*b = a + c*b").unwrap());
    /// ```
    pub fn linearize(&mut self) -> Result<(), NotAnEquation> {
        self.linearize_with(&mut ())
    }

    /// Same as [`Expr::linearize`], reporting an error to the given collector if the expression
    /// is not an equation.
    pub fn linearize_with(&mut self, diagnostics: &mut dyn StepCollector<Diagnostic>) -> Result<(), NotAnEquation> {
        let Expr::Equation(left, right) = self else {
            let err = NotAnEquation { operation: "linearized" };
            report(diagnostics, Diagnostic::error(err.to_string()));
            return Err(err);
        };

        let left_terms = expanded_terms(left);
        let right_terms = expanded_terms(right);

        // every divisor, as many times as it appears in a single term
        let mut all_divisors = Vec::<Expr>::new();
        for term in left_terms.iter().chain(right_terms.iter()) {
            let divisors = divisor_list(term);
            for divisor in &divisors {
                let needed = divisors.iter().filter(|d| *d == divisor).count();
                while all_divisors.iter().filter(|d| *d == divisor).count() < needed {
                    all_divisors.push(divisor.clone());
                }
            }
        }

        let left = Expr::from_terms(left_terms.iter().map(|term| clear_divisors(term, &all_divisors)).collect());
        let right = Expr::from_terms(right_terms.iter().map(|term| clear_divisors(term, &all_divisors)).collect());
        *self = Expr::from_equation(left, right);
        self.simplify(SimplifyLevel::Full, Recursion::Recursive);

        debug!("linearized to `{}`", self);
        Ok(())
    }

    /// Moves every term of an equation to the left side, leaving `0.0` on the right side.
    ///
    /// ```
    /// use symhop_compute::Expr;
    ///
    /// let mut expr = Expr::parse("a = b - c").unwrap();
    /// expr.to_left_sided().unwrap();
    /// assert_eq!(expr, Expr::parse("a - b + c = 0").unwrap());
    /// ```
    pub fn to_left_sided(&mut self) -> Result<(), NotAnEquation> {
        let Expr::Equation(left, right) = self else {
            return Err(NotAnEquation { operation: "converted to left-sided form" });
        };

        let mut terms = left.terms().to_vec();
        terms.extend(right.terms().iter().map(|term| {
            let mut term = term.clone();
            term.change_sign();
            term
        }));

        **left = Expr::from_terms(terms);
        **right = Expr::number(0.0);
        Ok(())
    }

    /// Factors `var` out of every term that has it as a factor.
    ///
    /// ```
    /// use symhop_compute::symbolic::{Expr, SimplifyLevel};
    ///
    /// let mut expr = Expr::parse("a*b*c + a*c*d + b*c*d").unwrap();
    /// expr.factor(&Expr::symbol("b"));
    /// assert_eq!(expr, Expr::parse_with("b*(a*c + c*d) + a*c*d", SimplifyLevel::Trivial).unwrap());
    /// ```
    pub fn factor(&mut self, var: &Expr) {
        let (mut with_var, mut without_var) = (Vec::new(), Vec::new());
        for term in self.terms() {
            if term == var || term.factors().contains(var) {
                let mut term = term.clone();
                term.remove_factor(var);
                with_var.push(term);
            } else {
                without_var.push(term.clone());
            }
        }

        if with_var.is_empty() {
            return;
        }

        let factored = Expr::from_factors_divisors(vec![var.clone(), Expr::from_terms(with_var)], Vec::new());
        let mut terms = vec![factored];
        terms.append(&mut without_var);
        *self = Expr::from_terms(terms);
    }

    /// Factors out the factor shared by the most terms of a sum, if any factor other than `1.0`
    /// or `-1.0` appears in at least two terms.
    pub fn factor_most_common_factor(&mut self) {
        if !self.is_add() {
            return;
        }

        let mut counts = Vec::<(&Expr, usize)>::new();
        for factor in self.terms().iter().flat_map(Expr::factors) {
            if factor.is_minus_one() || factor.is_number(1.0) {
                continue;
            }
            match counts.iter_mut().find(|(seen, _)| *seen == factor) {
                Some((_, count)) => *count += 1,
                None => counts.push((factor, 1)),
            }
        }

        // the first factor wins ties
        let mut most_common = None::<(&Expr, usize)>;
        for (factor, count) in counts {
            if most_common.map_or(true, |(_, max)| count > max) {
                most_common = Some((factor, count));
            }
        }

        if let Some((factor, count)) = most_common {
            if count > 1 {
                let factor = factor.clone();
                self.factor(&factor);
            }
        }
    }
}
