//! Rendering of expressions back to text.
//!
//! The [`Display`](std::fmt::Display) implementation of [`Expr`] produces an expression string
//! that parses back to a strictly equal tree. It is not byte-identical to the parsed input:
//! numbers are normalized to their shortest round-trip form (see
//! [`format_number`](crate::symbolic::expr::format_number)), `x+-1.0*y` is printed as `x-y`, and powers are always printed as
//! `pow(base,power)`. [`Expr::to_latex`] renders the expression as LaTeX math.

mod latex;

use crate::symbolic::expr::Expr;
use std::fmt;

/// Wraps the string in parentheses.
fn parenthesized(s: String) -> String {
    format!("({})", s)
}

/// Renders a factor or divisor of a product.
fn render_factor(expr: &Expr) -> String {
    match expr {
        Expr::Add(_) | Expr::Equation(..) => parenthesized(render(expr)),
        _ => render(expr),
    }
}

/// Renders an operand of a `%` operator.
fn render_modulus_operand(expr: &Expr) -> String {
    match expr {
        Expr::Symbol(_) if !expr.is_minus_one() => render(expr),
        Expr::Function(..) | Expr::Power(..) => render(expr),
        _ => parenthesized(render(expr)),
    }
}

fn render_add(terms: &[Expr]) -> String {
    let mut out = String::new();
    for (idx, term) in terms.iter().enumerate() {
        if term.is_negative() {
            let mut positive = term.clone();
            positive.change_sign();
            out.push('-');
            match positive {
                Expr::Add(_) => out.push_str(&parenthesized(render(&positive))),
                _ => out.push_str(&render(&positive)),
            }
        } else {
            if idx > 0 {
                out.push('+');
            }
            out.push_str(&render(term));
        }
    }
    out
}

fn render_mul(expr: &Expr, factors: &[Expr], divisors: &[Expr]) -> String {
    let factors = factors.iter().filter(|e| !e.is_minus_one()).collect::<Vec<_>>();
    let divisors = divisors.iter().filter(|e| !e.is_minus_one()).collect::<Vec<_>>();

    let mut out = String::new();
    if expr.is_negative() {
        out.push('-');
    }

    if factors.is_empty() {
        out.push_str("1.0");
    } else {
        let rendered = factors.iter().map(|e| render_factor(e)).collect::<Vec<_>>();
        out.push_str(&rendered.join("*"));
    }

    match divisors.as_slice() {
        [] => {},
        [divisor] => {
            out.push('/');
            match divisor {
                Expr::Mul(..) => out.push_str(&parenthesized(render(divisor))),
                _ => out.push_str(&render_factor(divisor)),
            }
        },
        divisors => {
            let rendered = divisors.iter().map(|e| render_factor(e)).collect::<Vec<_>>();
            out.push('/');
            out.push_str(&parenthesized(rendered.join("*")));
        },
    }

    out
}

/// Renders the power operand, parenthesizing sums and products.
fn render_power_operand(expr: &Expr) -> String {
    match expr {
        Expr::Add(_) | Expr::Mul(..) => parenthesized(render(expr)),
        _ => render(expr),
    }
}

/// Renders the expression, then collapses adjacent signs.
fn render(expr: &Expr) -> String {
    let out = match expr {
        Expr::Symbol(name) => name.clone(),
        Expr::Function(name, args) => {
            let args = args.iter().map(render).collect::<Vec<_>>();
            format!("{}({})", name, args.join(","))
        },
        Expr::Power(base, power) => {
            format!("pow({},{})", render_power_operand(base), render_power_operand(power))
        },
        Expr::Equation(left, right) => format!("{}={}", render(left), render(right)),
        Expr::Add(terms) => render_add(terms),
        Expr::Mul(factors, divisors) => render_mul(expr, factors, divisors),
        Expr::Modulus(dividend, divisors) => {
            let mut out = render_modulus_operand(dividend);
            for divisor in divisors {
                out.push('%');
                out.push_str(&render_modulus_operand(divisor));
            }
            out
        },
    };

    out.replace("+-", "-").replace("--", "+")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}
