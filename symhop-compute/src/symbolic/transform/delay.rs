//! Extraction of delayed terms into delay buffers.

use crate::{
    diagnostic::{report, Diagnostic},
    symbolic::{
        expr::is_whole,
        simplify::{simplify, Recursion, SimplifyLevel},
        step_collector::StepCollector,
        Expr,
    },
};
use log::debug;
use std::collections::BTreeMap;
use super::delay_operator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A delayed expression, read back from the delay buffer `mDelay<i>` where `i` is the index of
/// the term in the list built by [`Expr::to_delay_form`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DelayTerm {
    /// The expression to delay. Does not contain the delay operator.
    pub expr: Expr,

    /// The number of time steps to delay the expression by.
    pub steps: usize,
}

/// Returns the call that reads the oldest value of the given delay buffer.
fn delay_buffer(idx: usize) -> Expr {
    Expr::Function(format!("mDelay{}.getOldest", idx), Vec::new())
}

/// Returns the total power of the delay operator among the factors of the term.
fn delay_power(term: &Expr, diagnostics: &mut dyn StepCollector<Diagnostic>) -> usize {
    let z = delay_operator();
    if term.divisors().iter().any(|divisor| divisor.contains(&z)) {
        report(diagnostics, Diagnostic::warning(format!(
            "the delay operator in the divisors of `{}` is ignored, the expression should be linearized first",
            term,
        )));
    }

    term.factors()
        .iter()
        .map(|factor| {
            if *factor == z {
                return 1;
            }
            match (factor.base(), factor.power().and_then(Expr::to_double)) {
                (Some(base), Some(power)) if *base == z && power > 0.0 && is_whole(power) => power as usize,
                (Some(base), _) if *base == z => {
                    report(diagnostics, Diagnostic::warning(format!(
                        "the delay operator in `{}` must be raised to a positive whole power",
                        factor,
                    )));
                    0
                },
                _ => 0,
            }
        })
        .sum()
}

impl Expr {
    /// Replaces every delayed term with a read from a delay buffer.
    ///
    /// The terms of a sum are grouped by their power of the delay operator `Z`. Every group with
    /// a non-zero power `k` is replaced by `c*mDelay<i>.getOldest()`, where `c` is the numeric
    /// coefficient of the group and `i` is the index of the pair (group without `Z` and `c`, `k`)
    /// in `delays`. Identical pairs share the same buffer. Terms without `Z` are kept.
    ///
    /// The expression should be [linearized](Expr::linearize), so that `Z` only appears in the
    /// factors of terms.
    ///
    /// ```
    /// use symhop_compute::symbolic::{transform::DelayTerm, Expr};
    ///
    /// let expr = Expr::parse("y = 2*Z*x + x").unwrap();
    /// let mut delays = Vec::new();
    /// let delayed = expr.to_delay_form(&mut delays);
    ///
    /// assert_eq!(delayed, Expr::parse("y = 2*mDelay0.getOldest() + x").unwrap());
    /// assert_eq!(delays, vec![DelayTerm { expr: Expr::symbol("x"), steps: 1 }]);
    /// ```
    pub fn to_delay_form(&self, delays: &mut Vec<DelayTerm>) -> Expr {
        self.to_delay_form_with(delays, &mut ())
    }

    /// Same as [`Expr::to_delay_form`], reporting misplaced delay operators to the given
    /// collector.
    pub fn to_delay_form_with(
        &self,
        delays: &mut Vec<DelayTerm>,
        diagnostics: &mut dyn StepCollector<Diagnostic>,
    ) -> Expr {
        let z = delay_operator();
        let one = Expr::number(1.0);

        let mut buckets = BTreeMap::<usize, Vec<Expr>>::new();
        for term in self.terms() {
            let power = delay_power(term, diagnostics);
            let term = if power > 0 {
                term.replaced(&z, &one).simplified(SimplifyLevel::Trivial, Recursion::Recursive)
            } else {
                term.clone()
            };
            buckets.entry(power).or_default().push(term);
        }

        let mut terms = Vec::new();
        for (&steps, bucket) in buckets.iter().rev().filter(|(steps, _)| **steps > 0) {
            let delayed = simplify(&Expr::from_terms(bucket.clone()), SimplifyLevel::Full);
            if let Some(value) = delayed.to_double() {
                terms.push(Expr::number(value));
                continue;
            }

            let coefficient = delayed.numerical_factor();
            let mut payload = delayed.remove_numerical_factors();
            payload.factor_most_common_factor();

            let idx = match delays.iter().position(|d| d.expr == payload && d.steps == steps) {
                Some(idx) => idx,
                None => {
                    debug!("delay buffer {} holds `{}` delayed by {} step(s)", delays.len(), payload, steps);
                    delays.push(DelayTerm { expr: payload, steps });
                    delays.len() - 1
                },
            };
            terms.push(Expr::from_two_factors(Expr::number(coefficient), delay_buffer(idx)));
        }

        if let Some(undelayed) = buckets.remove(&0) {
            terms.extend(undelayed);
        }

        simplify(&Expr::from_terms(terms), SimplifyLevel::Full)
            .map_children(|child| child.to_delay_form_with(delays, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use crate::numerical::ctxt::Ctxt;
    use super::*;

    fn parse(src: &str) -> Expr {
        Expr::parse(src).unwrap()
    }

    #[test]
    fn one_buffer_per_delay_bucket() {
        let expr = parse("3*Z*x + 2*Z*Z*y + 4*x");
        let mut delays = Vec::new();
        let delayed = expr.to_delay_form(&mut delays);

        assert_eq!(delays, vec![
            DelayTerm { expr: Expr::symbol("y"), steps: 2 },
            DelayTerm { expr: Expr::symbol("x"), steps: 1 },
        ]);
        assert_eq!(delayed, parse("2*mDelay0.getOldest() + 3*mDelay1.getOldest() + 4*x"));
    }

    #[test]
    fn undelayed_terms_are_kept() {
        let expr = parse("3*Z*x + 2*Z*Z*y + 4*x - u/2");
        let mut delays = Vec::new();
        let delayed = expr.to_delay_form(&mut delays);

        let mut original = Ctxt::new();
        let mut buffered = Ctxt::new();
        for (name, value) in [("x", 1.5), ("y", -0.5), ("u", 3.0)] {
            original.add_var(name, value);
            buffered.add_var(name, value);
        }
        original.add_var("Z", 0.0);
        for idx in 0..delays.len() {
            buffered.add_var(&format!("mDelay{}.getOldest()", idx), 0.0);
        }

        assert_float_absolute_eq!(
            delayed.evaluate(&buffered).unwrap(),
            expr.evaluate(&original).unwrap()
        );
    }

    #[test]
    fn identical_delays_share_a_buffer() {
        let expr = parse("Z*x + y = 3*Z*x");
        let mut delays = Vec::new();
        let delayed = expr.to_delay_form(&mut delays);

        assert_eq!(delays, vec![DelayTerm { expr: Expr::symbol("x"), steps: 1 }]);
        assert_eq!(delayed, parse("mDelay0.getOldest() + y = 3*mDelay0.getOldest()"));
    }

    #[test]
    fn delayed_constant_stays_constant() {
        let expr = parse("3*Z + x");
        let mut delays = Vec::new();
        let delayed = expr.to_delay_form(&mut delays);

        assert!(delays.is_empty());
        assert_eq!(delayed, parse("3 + x"));
    }

    #[test]
    fn payload_is_factored() {
        let expr = parse("Z*a*x + Z*a*y");
        let mut delays = Vec::new();
        let delayed = expr.to_delay_form(&mut delays);

        assert_eq!(delays, vec![DelayTerm { expr: Expr::parse_with("a*(x+y)", SimplifyLevel::None).unwrap(), steps: 1 }]);
        assert_eq!(delayed, parse("mDelay0.getOldest()"));
    }

    #[test]
    fn delay_in_divisor_is_reported() {
        let expr = parse("x/Z + y");
        let mut delays = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        expr.to_delay_form_with(&mut delays, &mut diagnostics);

        assert!(delays.is_empty());
        assert!(!diagnostics.is_empty());
    }
}
