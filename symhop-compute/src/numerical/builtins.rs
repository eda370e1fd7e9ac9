//! Functions that can be evaluated without a user function.
//!
//! Builtins are looked up by name and number of arguments, so `max(a, b)` is a builtin while
//! `max(a, b, c)` is not.

use std::f64::consts::PI;

/// A builtin function. The argument slice always has the length the function was looked up with.
pub type Builtin = fn(&[f64]) -> f64;

/// The names of every builtin, used to suggest alternatives for undefined functions.
pub const NAMES: [&str; 40] = [
    "pi",
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "log", "exp", "sqrt",
    "abs", "integer", "floor", "ceil", "round", "r2d", "d2r", "sign",
    "min", "max", "rem", "mod", "div", "atan2", "pow", "equal", "eq", "notEqual", "logicalOr",
    "logicalAnd", "greaterThan", "greaterThanOrEqual", "smallerThan", "smallerThanOrEqual",
    "limit", "ifElse", "ifPositive",
];

/// `1.0` if the condition holds, `0.0` otherwise.
fn truth(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

/// Returns the builtin with the given name and number of arguments.
pub fn lookup(name: &str, arity: usize) -> Option<Builtin> {
    let builtin: Builtin = match (name, arity) {
        ("pi", 0) => |_| PI,

        ("sin", 1) => |a| a[0].sin(),
        ("cos", 1) => |a| a[0].cos(),
        ("tan", 1) => |a| a[0].tan(),
        ("asin", 1) => |a| a[0].asin(),
        ("acos", 1) => |a| a[0].acos(),
        ("atan", 1) => |a| a[0].atan(),
        ("sinh", 1) => |a| a[0].sinh(),
        ("cosh", 1) => |a| a[0].cosh(),
        ("tanh", 1) => |a| a[0].tanh(),
        ("log", 1) => |a| a[0].ln(),
        ("exp", 1) => |a| a[0].exp(),
        ("sqrt", 1) => |a| a[0].sqrt(),
        ("abs", 1) => |a| a[0].abs(),
        ("integer", 1) => |a| a[0].trunc(),
        ("floor", 1) => |a| a[0].floor(),
        ("ceil", 1) => |a| a[0].ceil(),
        ("round", 1) => |a| a[0].round(),
        ("r2d", 1) => |a| a[0].to_degrees(),
        ("d2r", 1) => |a| a[0].to_radians(),
        ("sign", 1) => |a| if a[0] >= 0.0 { 1.0 } else { -1.0 },

        ("min", 2) => |a| a[0].min(a[1]),
        ("max", 2) => |a| a[0].max(a[1]),
        ("rem" | "mod", 2) => |a| a[0] % a[1],
        ("div", 2) => |a| a[0] / a[1],
        ("atan2", 2) => |a| a[0].atan2(a[1]),
        ("pow", 2) => |a| a[0].powf(a[1]),
        ("equal" | "eq", 2) => |a| truth(a[0] == a[1]),
        ("notEqual", 2) => |a| truth(a[0] != a[1]),
        ("logicalOr", 2) => |a| truth(a[0] != 0.0 || a[1] != 0.0),
        ("logicalAnd", 2) => |a| truth(a[0] != 0.0 && a[1] != 0.0),
        ("greaterThan", 2) => |a| truth(a[0] > a[1]),
        ("greaterThanOrEqual", 2) => |a| truth(a[0] >= a[1]),
        ("smallerThan", 2) => |a| truth(a[0] < a[1]),
        ("smallerThanOrEqual", 2) => |a| truth(a[0] <= a[1]),

        ("limit", 3) => |a| {
            let (value, min, max) = (a[0], a[1], a[2]);
            if value > max {
                max
            } else if value < min {
                min
            } else {
                value
            }
        },
        ("ifElse", 3) => |a| if a[0] != 0.0 { a[1] } else { a[2] },
        ("ifPositive", 3) => |a| if a[0] >= 0.0 { a[1] } else { a[2] },

        _ => return None,
    };
    Some(builtin)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    fn call(name: &str, args: &[f64]) -> Option<f64> {
        lookup(name, args.len()).map(|f| f(args))
    }

    #[test]
    fn lookup_by_arity() {
        assert!(lookup("max", 2).is_some());
        assert!(lookup("max", 3).is_none());
        assert!(lookup("sin", 2).is_none());
        assert!(lookup("foo", 1).is_none());
    }

    #[test]
    fn elementary() {
        assert_float_absolute_eq!(call("pi", &[]).unwrap(), PI);
        assert_float_absolute_eq!(call("sin", &[PI / 2.0]).unwrap(), 1.0);
        assert_float_absolute_eq!(call("log", &[1.0]).unwrap(), 0.0);
        assert_float_absolute_eq!(call("r2d", &[PI]).unwrap(), 180.0);
        assert_float_absolute_eq!(call("atan2", &[1.0, 1.0]).unwrap(), PI / 4.0);
    }

    #[test]
    fn rounding() {
        assert_eq!(call("integer", &[-2.7]), Some(-2.0));
        assert_eq!(call("floor", &[-2.7]), Some(-3.0));
        assert_eq!(call("ceil", &[2.1]), Some(3.0));
        assert_eq!(call("round", &[2.5]), Some(3.0));
        assert_eq!(call("sign", &[0.0]), Some(1.0));
        assert_eq!(call("sign", &[-0.5]), Some(-1.0));
        assert_eq!(call("mod", &[7.5, 2.0]), Some(1.5));
    }

    #[test]
    fn comparisons_and_logic() {
        assert_eq!(call("greaterThan", &[2.0, 1.0]), Some(1.0));
        assert_eq!(call("smallerThanOrEqual", &[2.0, 1.0]), Some(0.0));
        assert_eq!(call("eq", &[2.0, 2.0]), Some(1.0));
        assert_eq!(call("logicalAnd", &[1.0, 0.0]), Some(0.0));
        assert_eq!(call("logicalOr", &[1.0, 0.0]), Some(1.0));
    }

    #[test]
    fn limit_and_branch() {
        assert_eq!(call("limit", &[5.0, 0.0, 1.0]), Some(1.0));
        assert_eq!(call("limit", &[-5.0, 0.0, 1.0]), Some(0.0));
        assert_eq!(call("limit", &[0.5, 0.0, 1.0]), Some(0.5));
        assert_eq!(call("ifElse", &[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(call("ifElse", &[0.0, 2.0, 3.0]), Some(3.0));
        assert_eq!(call("ifElse", &[-1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(call("ifPositive", &[0.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(call("ifPositive", &[-0.5, 2.0, 3.0]), Some(3.0));
    }
}
