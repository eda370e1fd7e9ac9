//! LaTeX rendering of expressions.

use crate::{consts::GREEK_LETTERS, symbolic::expr::Expr};

/// Functions that have a LaTeX operator of the same name.
const OPERATORS: [&str; 15] = [
    "sin", "cos", "tan", "cot", "sec", "csc", "sinh", "cosh", "tanh", "lg", "ln", "log", "min",
    "max", "arg",
];

/// Renders a number without a trailing `.0` if it is whole.
fn number(value: f64) -> String {
    format!("{}", value)
}

fn delimited(s: &str) -> String {
    format!("\\left({}\\right)", s)
}

fn arguments(args: &[Expr]) -> String {
    args.iter().map(latex).collect::<Vec<_>>().join(",")
}

/// Renders the `order`-th time derivative of the expression.
fn time_derivative(arg: &Expr, order: u8) -> String {
    let (d, dt) = match order {
        1 => ("d".to_string(), "dt".to_string()),
        n => (format!("d^{}", n), format!("dt^{}", n)),
    };
    if arg.is_symbol() {
        format!("\\dfrac{{{} {}}}{{{}}}", d, latex(arg), dt)
    } else {
        format!("\\dfrac{{{}}}{{{}}}{}", d, dt, delimited(&latex(arg)))
    }
}

fn render_function(name: &str, args: &[Expr]) -> String {
    match (name, args) {
        ("pi", []) => "\\pi".to_string(),
        ("sqrt", [arg]) => format!("\\sqrt{{{}}}", latex(arg)),
        ("exp", [arg]) => format!("e^{{{}}}", latex(arg)),
        ("abs", [arg]) => format!("\\left|{}\\right|", latex(arg)),
        ("asin" | "acos" | "atan", [arg]) => {
            format!("\\arc{}{}", &name[1..], delimited(&latex(arg)))
        },
        ("der", [arg]) => match (arg.function_name(), arg.arguments()) {
            (Some("der"), [inner]) => time_derivative(inner, 2),
            _ => time_derivative(arg, 1),
        },
        ("dder", [arg]) => time_derivative(arg, 2),
        (name, args) if !args.is_empty() && OPERATORS.contains(&name) => {
            format!("\\{}{}", name, delimited(&arguments(args)))
        },
        (name, args) => format!("\\mathrm{{{}}}{}", name, delimited(&arguments(args))),
    }
}

/// Renders one side of a fraction: the absolute numeric coefficient, if not `1`, followed by the
/// symbolic parts separated by spaces.
fn render_product(parts: &[Expr], coefficient: f64) -> String {
    let symbolic = parts.iter()
        .filter(|e| !e.is_numerical_symbol())
        .collect::<Vec<_>>();

    let mut rendered = Vec::new();
    if coefficient != 1.0 || symbolic.is_empty() {
        rendered.push(number(coefficient));
    }
    for part in &symbolic {
        let s = latex(part);
        match part {
            Expr::Add(_) | Expr::Equation(..) if parts.len() > 1 => rendered.push(delimited(&s)),
            _ => rendered.push(s),
        }
    }
    rendered.join(" ")
}

fn render_mul(expr: &Expr, factors: &[Expr], divisors: &[Expr]) -> String {
    let coefficient = |parts: &[Expr]| {
        parts.iter().filter_map(Expr::as_number).product::<f64>().abs()
    };

    let numerator = render_product(factors, coefficient(factors));
    let sign = if expr.is_negative() { "-" } else { "" };
    if divisors.iter().all(|e| e.is_numerical_symbol()) && coefficient(divisors) == 1.0 {
        return format!("{}{}", sign, numerator);
    }

    let denominator = render_product(divisors, coefficient(divisors));
    format!("{}\\dfrac{{{}}}{{{}}}", sign, numerator, denominator)
}

fn render_add(terms: &[Expr]) -> String {
    let mut out = String::new();
    for (idx, term) in terms.iter().enumerate() {
        if term.is_negative() {
            let mut positive = term.clone();
            positive.change_sign();
            out.push('-');
            out.push_str(&latex(&positive));
        } else {
            if idx > 0 {
                out.push('+');
            }
            out.push_str(&latex(term));
        }
    }
    out
}

/// Renders an operand of a power or modulus, delimiting compound expressions.
fn render_operand(expr: &Expr) -> String {
    match expr {
        Expr::Add(_) | Expr::Mul(..) | Expr::Equation(..) | Expr::Modulus(..) => delimited(&latex(expr)),
        _ => latex(expr),
    }
}

fn latex(expr: &Expr) -> String {
    let out = match expr {
        Expr::Symbol(name) => match expr.as_number() {
            Some(value) => number(value),
            None if GREEK_LETTERS.contains(name.as_str()) => format!("\\{}", name),
            None => name.clone(),
        },
        Expr::Function(name, args) => render_function(name, args),
        Expr::Power(base, power) => format!("{}^{{{}}}", render_operand(base), latex(power)),
        Expr::Equation(left, right) => format!("{}={}", latex(left), latex(right)),
        Expr::Add(terms) => render_add(terms),
        Expr::Mul(factors, divisors) => render_mul(expr, factors, divisors),
        Expr::Modulus(dividend, divisors) => {
            let mut out = render_operand(dividend);
            for divisor in divisors {
                out.push_str(" \\bmod ");
                out.push_str(&render_operand(divisor));
            }
            out
        },
    };

    out.replace("+-", "-").replace("--", "+")
}

impl Expr {
    /// Renders the expression as LaTeX math.
    ///
    /// ```
    /// use symhop_compute::symbolic::{Expr, SimplifyLevel};
    ///
    /// let expr = Expr::parse_with("der(x) = -omega*x", SimplifyLevel::None).unwrap();
    /// assert_eq!(expr.to_latex(), "\\dfrac{d x}{dt}=-\\omega x");
    /// ```
    pub fn to_latex(&self) -> String {
        latex(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::symbolic::SimplifyLevel;
    use super::*;

    fn tex(src: &str) -> String {
        Expr::parse_with(src, SimplifyLevel::None).unwrap().to_latex()
    }

    #[test]
    fn symbols() {
        assert_eq!(tex("alpha"), "\\alpha");
        assert_eq!(tex("Omega"), "\\Omega");
        assert_eq!(tex("x1"), "x1");
        assert_eq!(tex("2.5"), "2.5");
        assert_eq!(tex("3"), "3");
    }

    #[test]
    fn functions() {
        assert_eq!(tex("sin(x)"), "\\sin\\left(x\\right)");
        assert_eq!(tex("asin(x)"), "\\arcsin\\left(x\\right)");
        assert_eq!(tex("atan(x)"), "\\arctan\\left(x\\right)");
        assert_eq!(tex("sqrt(x)"), "\\sqrt{x}");
        assert_eq!(tex("exp(x)"), "e^{x}");
        assert_eq!(tex("abs(x)"), "\\left|x\\right|");
        assert_eq!(tex("pi()"), "\\pi");
        assert_eq!(tex("max(a, b)"), "\\max\\left(a,b\\right)");
        assert_eq!(tex("myTable(x, y)"), "\\mathrm{myTable}\\left(x,y\\right)");
    }

    #[test]
    fn time_derivatives() {
        assert_eq!(tex("der(x)"), "\\dfrac{d x}{dt}");
        assert_eq!(tex("der(der(x))"), "\\dfrac{d^2 x}{dt^2}");
        assert_eq!(tex("dder(x)"), "\\dfrac{d^2 x}{dt^2}");
        assert_eq!(tex("der(x+y)"), "\\dfrac{d}{dt}\\left(x+y\\right)");
    }

    #[test]
    fn products() {
        assert_eq!(tex("2*x/y"), "\\dfrac{2 x}{y}");
        assert_eq!(tex("x/2"), "\\dfrac{x}{2}");
        assert_eq!(tex("-a*b"), "-a b");
        assert_eq!(tex("(a+b)*c"), "\\left(a+b\\right) c");
        assert_eq!(tex("1/x"), "\\dfrac{1}{x}");
    }

    #[test]
    fn sums_powers_and_equations() {
        assert_eq!(tex("a-b+c"), "a-b+c");
        assert_eq!(tex("x^2"), "x^{2}");
        assert_eq!(tex("(a+b)^n"), "\\left(a+b\\right)^{n}");
        assert_eq!(tex("y = 2*x"), "y=2 x");
        assert_eq!(tex("a % b"), "a \\bmod b");
    }
}
