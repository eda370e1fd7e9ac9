//! Numbers inside expressions.
//!
//! Numbers are stored as [`Expr::Symbol`]s holding a decimal string, so that the tree and its
//! printed form never disagree. The string is the shortest one that reads back as the same `f64`,
//! and always contains a `.`.
//!
//! Negative numbers are written as a product with the `-1.0` symbol, which is the only number
//! string starting with a `-`.

use super::Expr;

/// The string of the canonical negation factor.
pub(crate) const MINUS_ONE: &str = "-1.0";

/// Formats a number the way it is stored in an expression.
///
/// This is the shortest decimal string that reads back as the same `f64`, with a `.0` added to
/// whole numbers. No fixed number of significant digits is used, so `0.1` prints as `0.1` rather
/// than a 20-digit expansion.
///
/// ```
/// use symhop_compute::symbolic::expr::format_number;
///
/// assert_eq!(format_number(5.0), "5.0");
/// assert_eq!(format_number(0.1), "0.1");
/// assert_eq!(format_number(-0.0), "0.0");
/// ```
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }

    let mut formatted = value.to_string();
    if value.is_finite() && !formatted.contains('.') {
        formatted.push_str(".0");
    }
    formatted
}

/// Returns true if the value has no fractional part.
pub fn is_whole(value: f64) -> bool {
    value.is_finite() && value.trunc() == value
}

impl Expr {
    /// Creates a number. Negative values other than `-1` become `-1.0*|value|`.
    pub fn number(value: f64) -> Self {
        if value == -1.0 {
            Self::minus_one()
        } else if value < 0.0 {
            Self::Mul(vec![Self::minus_one(), Self::Symbol(format_number(-value))], Vec::new())
        } else {
            Self::Symbol(format_number(value))
        }
    }

    /// The canonical negation factor, `-1.0`.
    pub fn minus_one() -> Self {
        Self::Symbol(MINUS_ONE.to_string())
    }

    /// Returns true if the expression is the symbol `-1.0`.
    pub fn is_minus_one(&self) -> bool {
        matches!(self, Self::Symbol(name) if name == MINUS_ONE)
    }

    /// Returns the value of a number symbol.
    pub(crate) fn as_number(&self) -> Option<f64> {
        match self {
            Self::Symbol(name) if is_number_str(name) => name.parse().ok(),
            _ => None,
        }
    }

    /// Returns true if the expression is the number with the given value.
    pub(crate) fn is_number(&self, value: f64) -> bool {
        self.as_number() == Some(value)
    }
}

/// Returns true if the symbol name is a number.
pub(crate) fn is_number_str(name: &str) -> bool {
    name == MINUS_ONE || name.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn formats_shortest_round_trip() {
        assert_eq!(format_number(4.0), "4.0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1e-5), "0.00001");
        assert_eq!(format_number(1.0 / 3.0).parse::<f64>().unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn negative_numbers() {
        assert_eq!(Expr::number(-1.0), Expr::Symbol("-1.0".to_string()));
        assert_eq!(Expr::number(-2.5), Expr::Mul(vec![Expr::minus_one(), Expr::number(2.5)], vec![]));
        assert_eq!(Expr::number(-2.5).to_double(), Some(-2.5));
    }

    #[test]
    fn overflowing_literals_are_rejected() {
        assert!(Expr::parse("1e400*x").is_err());
        assert!(Expr::parse("x = -1e309").is_err());

        let largest = Expr::parse("1.7976931348623157e308").unwrap();
        assert_eq!(largest.to_double(), Some(f64::MAX));
        assert!(largest.get_variables().is_empty());
    }

    #[test]
    fn whole_numbers() {
        assert!(is_whole(3.0));
        assert!(is_whole(-2.0));
        assert!(!is_whole(2.5));
        assert!(!is_whole(f64::NAN));
    }
}
