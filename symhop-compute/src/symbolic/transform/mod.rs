//! Rewrites of whole expressions used when generating simulation code.
//!
//! Component equations are written in continuous time, with `der(x)` denoting the time
//! derivative of `x`. Before code can be generated, each derivative is replaced by a discrete
//! approximation written in terms of the **delay operator** `Z`, where `Z*x` is the value of `x`
//! one time step ago, and `mTimestep` is the length of a step.
//!
//! [`Expr::bilinear_transform`] applies the trapezoid rule; [`Expr::inline_transform`] applies
//! any of the methods listed in [`InlineTransform`]. The rewritten derivatives are not
//! simplified; the caller decides when to simplify, and usually [linearizes](Expr::linearize)
//! the equation before extracting the delayed terms with [`Expr::to_delay_form`].
//!
//! ```
//! use symhop_compute::symbolic::{Expr, SimplifyLevel};
//!
//! let expr = Expr::parse("der(x) + x").unwrap();
//! let transformed = expr.bilinear_transform();
//! assert_eq!(
//!     transformed,
//!     Expr::parse_with("2.0/mTimestep*(1.0-Z)/(1.0+Z)*(x) + x", SimplifyLevel::None).unwrap(),
//! );
//! ```

mod algebra;
mod delay;

use crate::{
    diagnostic::{report, Diagnostic},
    symbolic::{expr::is_whole, step_collector::StepCollector, Expr},
};
use log::debug;
use std::{fmt, str::FromStr};

pub use delay::DelayTerm;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The largest number of steps accepted in a `delay(x, steps)` call.
pub const MAX_DELAY_STEPS: usize = 256;

/// The name of the delay operator.
pub const DELAY_OPERATOR: &str = "Z";

/// The name of the time step variable.
pub const TIMESTEP: &str = "mTimestep";

/// The delay operator `Z`.
pub(crate) fn delay_operator() -> Expr {
    Expr::symbol(DELAY_OPERATOR)
}

/// A method for discretizing time derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InlineTransform {
    /// The trapezoid rule, also known as Tustin's method or the bilinear transform.
    Trapezoid,
    ExplicitEuler,
    ImplicitEuler,
    Bdf1,
    Bdf2,
    Bdf3,
    Bdf4,
    Bdf5,
    AdamsMoulton1,
    AdamsMoulton2,
    AdamsMoulton3,
    AdamsMoulton4,
}

/// A polynomial in `Z`, given by its coefficients in order of increasing power.
type Polynomial = &'static [f64];

const ADAMS_MOULTON3: [f64; 3] = [5.0 / 12.0, 2.0 / 3.0, -1.0 / 12.0];
const ADAMS_MOULTON4: [f64; 4] = [9.0 / 24.0, 19.0 / 24.0, -5.0 / 24.0, 1.0 / 24.0];

impl InlineTransform {
    /// Every transform, in declaration order.
    pub const ALL: [InlineTransform; 12] = [
        InlineTransform::Trapezoid,
        InlineTransform::ExplicitEuler,
        InlineTransform::ImplicitEuler,
        InlineTransform::Bdf1,
        InlineTransform::Bdf2,
        InlineTransform::Bdf3,
        InlineTransform::Bdf4,
        InlineTransform::Bdf5,
        InlineTransform::AdamsMoulton1,
        InlineTransform::AdamsMoulton2,
        InlineTransform::AdamsMoulton3,
        InlineTransform::AdamsMoulton4,
    ];

    /// The name used to select this transform, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            InlineTransform::Trapezoid => "trapezoid",
            InlineTransform::ExplicitEuler => "expliciteuler",
            InlineTransform::ImplicitEuler => "impliciteuler",
            InlineTransform::Bdf1 => "bdf1",
            InlineTransform::Bdf2 => "bdf2",
            InlineTransform::Bdf3 => "bdf3",
            InlineTransform::Bdf4 => "bdf4",
            InlineTransform::Bdf5 => "bdf5",
            InlineTransform::AdamsMoulton1 => "adamsmoulton1",
            InlineTransform::AdamsMoulton2 => "adamsmoulton2",
            InlineTransform::AdamsMoulton3 => "adamsmoulton3",
            InlineTransform::AdamsMoulton4 => "adamsmoulton4",
        }
    }

    /// The discrete derivative operator as `gain * numerator / denominator / mTimestep`.
    fn coefficients(self) -> (f64, Polynomial, Polynomial) {
        match self {
            InlineTransform::Trapezoid | InlineTransform::AdamsMoulton2 => (2.0, &[1.0, -1.0], &[1.0, 1.0]),
            InlineTransform::ExplicitEuler => (1.0, &[1.0, -1.0], &[0.0, 1.0]),
            InlineTransform::ImplicitEuler | InlineTransform::Bdf1 | InlineTransform::AdamsMoulton1 => {
                (1.0, &[1.0, -1.0], &[1.0])
            },
            InlineTransform::Bdf2 => (1.0, &[1.5, -2.0, 0.5], &[1.0]),
            InlineTransform::Bdf3 => (1.0, &[11.0, -18.0, 9.0, -2.0], &[6.0]),
            InlineTransform::Bdf4 => (1.0, &[25.0, -48.0, 36.0, -16.0, 3.0], &[12.0]),
            InlineTransform::Bdf5 => (1.0, &[137.0, -300.0, 300.0, -200.0, 75.0, -12.0], &[60.0]),
            InlineTransform::AdamsMoulton3 => (1.0, &[1.0, -1.0], &ADAMS_MOULTON3),
            InlineTransform::AdamsMoulton4 => (1.0, &[1.0, -1.0], &ADAMS_MOULTON4),
        }
    }

    /// Returns the discrete approximation of `der(argument)`.
    ///
    /// ```
    /// use symhop_compute::symbolic::{transform::InlineTransform, Expr, SimplifyLevel};
    ///
    /// let derivative = InlineTransform::ImplicitEuler.discretize(Expr::symbol("x"));
    /// assert_eq!(derivative, Expr::parse_with("(1.0 - Z)/mTimestep*(x)", SimplifyLevel::None).unwrap());
    /// ```
    pub fn discretize(self, argument: Expr) -> Expr {
        let (gain, numerator, denominator) = self.coefficients();

        let mut factors = Vec::new();
        if gain != 1.0 {
            factors.push(Expr::number(gain));
        }
        factors.push(polynomial(numerator));
        factors.push(argument);

        let mut divisors = Vec::new();
        if denominator != [1.0] {
            divisors.push(polynomial(denominator));
        }
        divisors.push(Expr::symbol(TIMESTEP));

        Expr::Mul(factors, divisors)
    }
}

/// Builds `c0 + c1*Z + c2*Z*Z + ...`, skipping zero coefficients and unit coefficients of
/// powers of `Z`.
fn polynomial(coefficients: Polynomial) -> Expr {
    let terms = coefficients
        .iter()
        .enumerate()
        .filter(|(_, coefficient)| **coefficient != 0.0)
        .map(|(power, &coefficient)| {
            let mut factors = Vec::new();
            if power == 0 || coefficient.abs() != 1.0 {
                factors.push(Expr::number(coefficient.abs()));
            }
            factors.extend(std::iter::repeat(delay_operator()).take(power));

            let term = Expr::from_factors_divisors(factors, Vec::new());
            if coefficient < 0.0 { term.negated() } else { term }
        })
        .collect();
    Expr::from_terms(terms)
}

impl fmt::Display for InlineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The given name does not match any [`InlineTransform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransform(pub String);

impl fmt::Display for UnknownTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undefined inline transform `{}`", self.0)
    }
}

impl std::error::Error for UnknownTransform {}

impl FromStr for InlineTransform {
    type Err = UnknownTransform;

    /// Parses the name of a transform, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        InlineTransform::ALL
            .into_iter()
            .find(|transform| transform.name() == name)
            .ok_or_else(|| UnknownTransform(s.to_string()))
    }
}

/// An error returned by [`Expr::inline_transform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The number of steps of a `delay()` call is not a non-negative whole number.
    UnsupportedDelay {
        /// The printed step count.
        steps: String,
    },

    /// The number of steps of a `delay()` call is larger than [`MAX_DELAY_STEPS`].
    TooManyDelaySteps {
        steps: usize,
    },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::UnsupportedDelay { steps } => {
                write!(f, "the number of delay steps must be a non-negative whole number, found `{}`", steps)
            },
            TransformError::TooManyDelaySteps { steps } => {
                write!(f, "cannot delay by {} steps, the maximum is {}", steps, MAX_DELAY_STEPS)
            },
        }
    }
}

impl std::error::Error for TransformError {}

/// Returns the number of steps of a `delay(x, steps)` call.
fn delay_steps(steps: &Expr) -> Result<usize, TransformError> {
    let value = match steps.to_double() {
        Some(value) if value >= 0.0 && is_whole(value) => value,
        _ => return Err(TransformError::UnsupportedDelay { steps: steps.to_string() }),
    };
    if value > MAX_DELAY_STEPS as f64 {
        return Err(TransformError::TooManyDelaySteps { steps: value as usize });
    }
    Ok(value as usize)
}

impl Expr {
    /// Replaces every `der(x)` call with its trapezoid rule approximation,
    /// `2.0/mTimestep*(1.0-Z)/(1.0+Z)*(x)`. Derivatives nested inside the argument are
    /// transformed as well.
    pub fn bilinear_transform(&self) -> Expr {
        match self {
            Expr::Function(name, args) if name == "der" => match args.as_slice() {
                [arg] => InlineTransform::Trapezoid.discretize(arg.bilinear_transform()),
                _ => self.map_children(Expr::bilinear_transform),
            },
            _ => self.map_children(Expr::bilinear_transform),
        }
    }

    /// Replaces every `der(x)` call with its approximation by the given method.
    ///
    /// In addition, `delay(x, n)` is unrolled to `x*Z*...*Z` with `n` delay operators, and the
    /// Laplace variable `s` is replaced by the approximation of a derivative of `1.0`.
    pub fn inline_transform(&self, transform: InlineTransform) -> Result<Expr, TransformError> {
        self.inline_transform_with(transform, &mut ())
    }

    /// Same as [`Expr::inline_transform`], reporting failures to the given collector.
    pub fn inline_transform_with(
        &self,
        transform: InlineTransform,
        diagnostics: &mut dyn StepCollector<Diagnostic>,
    ) -> Result<Expr, TransformError> {
        debug!("applying the {} transform to `{}`", transform, self);
        self.inlined(transform).map_err(|err| {
            report(diagnostics, Diagnostic::error(format!("{} in `{}`", err, self)));
            err
        })
    }

    fn inlined(&self, transform: InlineTransform) -> Result<Expr, TransformError> {
        match self {
            Expr::Function(name, args) => match (name.as_str(), args.as_slice()) {
                ("der", [arg]) => Ok(transform.discretize(arg.inlined(transform)?)),
                ("delay", [arg, steps]) => {
                    let steps = delay_steps(steps)?;
                    let mut delayed = arg.clone();
                    for _ in 0..steps {
                        delayed.multiply_by(delay_operator());
                    }
                    delayed.inlined(transform)
                },
                _ => self.try_map_children(|child| child.inlined(transform)),
            },
            Expr::Symbol(name) if name == "s" => Ok(transform.discretize(Expr::number(1.0))),
            _ => self.try_map_children(|child| child.inlined(transform)),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_relative_eq;
    use pretty_assertions::assert_eq;
    use crate::{numerical::ctxt::Ctxt, symbolic::SimplifyLevel};
    use super::*;

    fn raw(src: &str) -> Expr {
        Expr::parse_with(src, SimplifyLevel::None).unwrap()
    }

    #[test]
    fn bilinear_rewrites_derivatives() {
        let expr = Expr::parse("der(x)+x").unwrap();
        let transformed = expr.bilinear_transform();
        assert_eq!(transformed, raw("2.0/mTimestep*(1.0-Z)/(1.0+Z)*(x) + x"));

        let terms = transformed.terms();
        assert_eq!(terms.len(), 2);
        assert!(terms.contains(&Expr::symbol("x")));
    }

    #[test]
    fn bilinear_printed_form() {
        // divisors are gathered behind a single `/` when printed
        let transformed = Expr::parse("der(x)+x").unwrap().bilinear_transform();
        assert_eq!(transformed.to_string(), "2.0*(1.0-Z)*x/((1.0+Z)*mTimestep)+x");
    }

    #[test]
    fn bilinear_recurses_everywhere() {
        let expr = raw("y = k*sin(der(x))");
        assert_eq!(expr.bilinear_transform(), raw("y = k*sin(2.0/mTimestep*(1.0-Z)/(1.0+Z)*(x))"));

        let nested = raw("der(der(x))").bilinear_transform();
        assert_eq!(
            nested,
            raw("2.0/mTimestep*(1.0-Z)/(1.0+Z)*(2.0/mTimestep*(1.0-Z)/(1.0+Z)*(x))"),
        );
    }

    #[test]
    fn templates_match_written_forms() {
        let x = Expr::symbol("x");
        let cases = [
            (InlineTransform::Trapezoid, "2.0/mTimestep*(1.0-Z)/(1.0+Z)*(x)"),
            (InlineTransform::ExplicitEuler, "(1.0 - Z)/Z/mTimestep*(x)"),
            (InlineTransform::ImplicitEuler, "(1.0 - Z)/mTimestep*(x)"),
            (InlineTransform::Bdf2, "(1.5 - 2*Z + 0.5*Z*Z)/mTimestep*(x)"),
            (InlineTransform::Bdf3, "(11.0 - 18.0*Z + 9.0*Z*Z - 2.0*Z*Z*Z)/6.0/mTimestep*(x)"),
        ];
        for (transform, src) in cases {
            assert_eq!(transform.discretize(x.clone()), raw(src), "{transform}");
        }
    }

    #[test]
    fn templates_evaluate_like_written_forms() {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", 2.0);
        ctxt.add_var("Z", 0.3);
        ctxt.add_var("mTimestep", 0.01);

        let cases = [
            (InlineTransform::Bdf4, "(25.0 - 48.0*Z + 36.0*Z*Z-16.0*Z*Z*Z+3.0*Z*Z*Z*Z)/12.0/mTimestep*(x)"),
            (
                InlineTransform::Bdf5,
                "(137.0 - 300.0*Z + 300.0*Z*Z - 200.0*Z*Z*Z + 75.0*Z*Z*Z*Z - 12.0*Z*Z*Z*Z*Z)/60.0/mTimestep*(x)",
            ),
            (InlineTransform::AdamsMoulton3, "(1.0-Z)/(5.0/12.0 + 2.0/3.0*Z - 1.0/12.0*Z*Z)/mTimestep*(x)"),
            (
                InlineTransform::AdamsMoulton4,
                "(1.0-Z)/(9.0/24.0 + 19.0/24.0*Z - 5.0/24.0*Z*Z + 1.0/24.0*Z*Z*Z)/mTimestep*(x)",
            ),
        ];
        for (transform, src) in cases {
            let expected = raw(src).evaluate(&ctxt).unwrap();
            let actual = transform.discretize(Expr::symbol("x")).evaluate(&ctxt).unwrap();
            assert_float_relative_eq!(actual, expected, 1e-12);
        }
    }

    #[test]
    fn parse_transform_names() {
        assert_eq!("Trapezoid".parse(), Ok(InlineTransform::Trapezoid));
        assert_eq!("bdf3".parse(), Ok(InlineTransform::Bdf3));
        assert_eq!("AdamsMoulton4".parse(), Ok(InlineTransform::AdamsMoulton4));
        assert_eq!(
            "rungekutta".parse::<InlineTransform>(),
            Err(UnknownTransform("rungekutta".to_string())),
        );
        for transform in InlineTransform::ALL {
            assert_eq!(transform.to_string().parse(), Ok(transform));
        }
    }

    #[test]
    fn inline_matches_bilinear_for_trapezoid() {
        let expr = Expr::parse("y = der(x) + 2*der(y)").unwrap();
        assert_eq!(expr.inline_transform(InlineTransform::Trapezoid), Ok(expr.bilinear_transform()));
    }

    #[test]
    fn delays_are_unrolled() {
        let expr = raw("delay(x, 2) + y");
        let transformed = expr.inline_transform(InlineTransform::ImplicitEuler).unwrap();
        assert_eq!(transformed, raw("x*Z*Z + y"));

        let expr = raw("delay(der(x), 1)");
        let transformed = expr.inline_transform(InlineTransform::ImplicitEuler).unwrap();
        assert_eq!(transformed, Expr::Mul(
            vec![raw("(1.0 - Z)/mTimestep*(x)"), Expr::symbol("Z")],
            vec![],
        ));
    }

    #[test]
    fn laplace_variable() {
        let expr = raw("s*x");
        let transformed = expr.inline_transform(InlineTransform::ImplicitEuler).unwrap();
        assert_eq!(transformed, Expr::Mul(vec![raw("(1.0 - Z)/mTimestep*(1.0)"), Expr::symbol("x")], vec![]));
    }

    #[test]
    fn invalid_delays() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let expr = raw("delay(x, n)");
        assert_eq!(
            expr.inline_transform_with(InlineTransform::Bdf2, &mut diagnostics),
            Err(TransformError::UnsupportedDelay { steps: "n".to_string() }),
        );
        assert_eq!(diagnostics.len(), 1);

        assert_eq!(
            raw("delay(x, 1.5)").inline_transform(InlineTransform::Bdf2),
            Err(TransformError::UnsupportedDelay { steps: "1.5".to_string() }),
        );
        assert_eq!(
            raw("delay(x, 100000)").inline_transform(InlineTransform::Bdf2),
            Err(TransformError::TooManyDelaySteps { steps: 100000 }),
        );
    }
}
