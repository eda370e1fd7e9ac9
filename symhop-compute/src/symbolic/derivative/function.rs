//! Symbolic derivatives of function calls.

use crate::symbolic::Expr;
use super::{Differentiator, MultBuilder};

/// Comparison and logical functions, which are piecewise constant.
const COMPARISONS: [&str; 9] = [
    "greaterThan",
    "smallerThan",
    "greaterThanOrEqual",
    "smallerThanOrEqual",
    "notEqual",
    "equal",
    "eq",
    "logicalAnd",
    "logicalOr",
];

/// Functions whose derivative is zero wherever it is defined.
const STEP_FUNCTIONS: [&str; 12] = [
    "mod", "rem", "div", "sign", "re", "ceil", "floor", "int", "integer", "round", "dxLimit", "dxLimit3",
];

/// Returns true if the function is constant with respect to any variable.
fn has_zero_derivative(name: &str) -> bool {
    COMPARISONS.contains(&name)
        || STEP_FUNCTIONS.contains(&name)
        || name.starts_with("mDelay")
        || (name.starts_with("delay_") && name.contains(".getIdx"))
        // already a derivative with respect to time
        || name == "der"
}

/// Returns the name of the function that is the derivative of the given single-argument
/// function, for use with the chain rule. A leading `-` negates the derivative.
fn table_derivative(name: &str) -> Option<String> {
    let derivative = match name {
        "sin" => "cos",
        "cos" => "-sin",
        "sinh" => "cosh",
        "cosh" => "sinh",
        "abs" => "sign",
        "onPositive" => "dxOnPositive",
        "onNegative" => "dxOnNegative",
        "signedSquareL" => "dxSignedSquareL",
        _ => {
            let number = name.strip_prefix("STATEVAR")?.parse::<u32>().ok()?;
            return Some(format!("DSTATEVAR{}", number));
        },
    };
    Some(derivative.to_string())
}

/// `1 - g*g`
fn one_minus_square(g: &Expr) -> Expr {
    let mut square = Expr::from_two_factors(g.clone(), g.clone());
    square.change_sign();
    Expr::from_two_terms(Expr::number(1.0), square)
}

/// `g*g + 1`
fn square_plus_one(g: &Expr) -> Expr {
    Expr::from_two_terms(Expr::from_two_factors(g.clone(), g.clone()), Expr::number(1.0))
}

/// `dg / divisor`
fn over(dg: Expr, divisor: Expr) -> Expr {
    MultBuilder::default().mult(dg).divide(divisor).into()
}

/// Computes the derivative of a function call, applying the chain rule.
pub(super) fn function_derivative(d: &mut Differentiator, name: &str, args: &[Expr]) -> Expr {
    if let Some(name) = name.strip_prefix('-') {
        let mut derivative = function_derivative(d, name, args);
        derivative.change_sign();
        return derivative;
    }

    if has_zero_derivative(name) {
        return Expr::number(0.0);
    }

    let (g, rest) = match args.split_first() {
        Some(split) => split,
        // a call without arguments is a constant, such as `pi()`
        None => return Expr::number(0.0),
    };

    match (name, rest) {
        ("ifElse", [then]) => {
            let d_then = d.derivative(then);
            Expr::from_function_arguments("ifElse", vec![g.clone(), d_then])
        },
        ("ifElse", [then, otherwise]) => {
            let d_then = d.derivative(then);
            let d_otherwise = d.derivative(otherwise);
            Expr::from_function_arguments("ifElse", vec![g.clone(), d_then, d_otherwise])
        },
        ("pow", [power]) => d.power_rule(g, power),
        ("max", [other]) => {
            let mut difference = other.clone();
            difference.change_sign();
            let difference = Expr::from_two_terms(g.clone(), difference);
            let d_first = d.derivative(g);
            let d_other = d.derivative(other);
            Expr::from_function_arguments("ifPositive", vec![difference, d_first, d_other])
        },
        ("atan2", [x]) => {
            let g = Expr::from_factor_divisor(g.clone(), x.clone());
            let dg = d.derivative(&g);
            over(dg, square_plus_one(&g))
        },
        _ => {
            let dg = d.derivative(g);
            match name {
                "log" => over(dg, g.clone()),
                "exp" => MultBuilder::default().mult(dg).mult(Expr::from_function_argument("exp", g.clone())).into(),
                "sqrt" => {
                    let divisor = Expr::from_two_factors(Expr::number(2.0), Expr::from_function_argument("sqrt", g.clone()));
                    over(dg, divisor)
                },
                "tan" => {
                    let cosine = Expr::from_function_argument("cos", Expr::from_two_factors(Expr::number(2.0), g.clone()));
                    let factor = MultBuilder::default().mult(Expr::number(2.0)).mult(dg).into();
                    over(factor, Expr::from_two_terms(cosine, Expr::number(1.0)))
                },
                "atan" => over(dg, square_plus_one(g)),
                "asin" => over(dg, Expr::from_function_argument("sqrt", one_minus_square(g))),
                "acos" => {
                    let mut derivative = over(dg, Expr::from_function_argument("sqrt", one_minus_square(g)));
                    derivative.change_sign();
                    derivative
                },
                "limit" => dg,
                name if name.starts_with("nonZero") => dg,
                name => match table_derivative(name) {
                    Some(derivative) => {
                        let outer = Expr::from_function_arguments(&derivative, args.to_vec());
                        MultBuilder::default().mult(outer).mult(dg).into()
                    },
                    None => d.unsupported(name),
                },
            }
        },
    }
}
