//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](symhop_parser::parser::ast::expr::Expr) type from `symhop_parser` mirrors the
//! source text: every binary operator is a node with two operands, parentheses are kept, and
//! numbers keep their lexeme. That is convenient for parsing, but not so much for algebraic
//! manipulation.
//!
//! This module defines a separate [`Expr`], which flattens chains of additions into a list of
//! terms and chains of multiplications / divisions into lists of factors and divisors.
//!
//! # Strict equality
//!
//! The [`PartialEq`] implementation for [`Expr`] compares expressions **structurally**, with two
//! relaxations:
//!
//! - the terms of an [`Expr::Add`], and the factors and divisors of an [`Expr::Mul`], are
//!   compared as multisets: order does not matter, but the number of occurrences of each
//!   distinct sub-expression does (`x + x` is not equal to `x`),
//! - an [`Expr::Equation`] is equal to the same equation with its sides swapped.
//!
//! Everything else, including the order of function arguments, must match exactly. Strict
//! equality is a subset of semantic equality: `x*(y+1)` and `x*y + x` are not strictly equal.

mod factory;
mod iter;
mod mutate;
mod number;
mod query;

use crate::symbolic::simplify::{Recursion, SimplifyLevel};
use symhop_error::Error;
use symhop_parser::parser::{
    ast::{Binary, Expr as AstExpr, Literal},
    token::op::{BinOpKind, UnaryOpKind},
    Parser,
};
use std::str::FromStr;

pub use iter::ExprIter;
pub use number::{format_number, is_whole};
pub use query::remove_duplicates;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A mathematical expression, flattened into sums of products.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A variable such as `x` or `mTimestep`, or a number such as `2.0` or `-1.0`.
    Symbol(String),

    /// A function call, such as `sin(x)` or `limit(x, 0.0, 1.0)`.
    Function(String, Vec<Expr>),

    /// An expression raised to a power, `pow(base, power)`.
    Power(Box<Expr>, Box<Expr>),

    /// An equation, `left = right`.
    Equation(Box<Expr>, Box<Expr>),

    /// Terms added together.
    Add(Vec<Expr>),

    /// Factors multiplied together, divided by the product of the divisors.
    Mul(Vec<Expr>, Vec<Expr>),

    /// The dividend taken modulo each of the divisors in turn.
    Modulus(Box<Expr>, Vec<Expr>),
}

/// Returns true if both slices contain the same expressions the same number of times, in any
/// order.
pub(crate) fn multiset_eq(lhs: &[Expr], rhs: &[Expr]) -> bool {
    lhs.len() == rhs.len()
        && lhs.iter().all(|item| {
            lhs.iter().filter(|other| *other == item).count()
                == rhs.iter().filter(|other| *other == item).count()
        })
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Symbol(lhs), Self::Symbol(rhs)) => lhs == rhs,
            (Self::Function(lhs_name, lhs_args), Self::Function(rhs_name, rhs_args)) => {
                lhs_name == rhs_name && lhs_args == rhs_args
            },
            (Self::Power(lhs_base, lhs_power), Self::Power(rhs_base, rhs_power)) => {
                lhs_base == rhs_base && lhs_power == rhs_power
            },
            (Self::Equation(lhs_left, lhs_right), Self::Equation(rhs_left, rhs_right)) => {
                (lhs_left == rhs_left && lhs_right == rhs_right)
                    || (lhs_left == rhs_right && lhs_right == rhs_left)
            },
            (Self::Add(lhs), Self::Add(rhs)) => multiset_eq(lhs, rhs),
            (Self::Mul(lhs_factors, lhs_divisors), Self::Mul(rhs_factors, rhs_divisors)) => {
                multiset_eq(lhs_factors, rhs_factors) && multiset_eq(lhs_divisors, rhs_divisors)
            },
            (Self::Modulus(lhs_dividend, lhs_divisors), Self::Modulus(rhs_dividend, rhs_divisors)) => {
                lhs_dividend == rhs_dividend && lhs_divisors == rhs_divisors
            },
            _ => false,
        }
    }
}

impl Expr {
    /// Parses and fully simplifies the given expression string.
    pub fn parse(src: &str) -> Result<Self, Error> {
        Self::parse_with(src, SimplifyLevel::Full)
    }

    /// Parses the given expression string, then simplifies it recursively at the given level.
    pub fn parse_with(src: &str, level: SimplifyLevel) -> Result<Self, Error> {
        let mut parser = Parser::new(src);
        let ast = parser.try_parse_full::<AstExpr>()?;
        Ok(Self::from(ast).simplified(level, Recursion::Recursive))
    }

    /// Parses an expression that was split into parts, such as `["a", "+", "b"]`. The parts are
    /// concatenated without separators before parsing.
    pub fn parse_parts<S: AsRef<str>>(parts: &[S], level: SimplifyLevel) -> Result<Self, Error> {
        let src = parts.iter().map(AsRef::as_ref).collect::<String>();
        Self::parse_with(&src, level)
    }

    /// Returns the child expressions of this node, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Symbol(_) => Vec::new(),
            Self::Function(_, args) => args.iter().collect(),
            Self::Power(base, power) => vec![&**base, &**power],
            Self::Equation(left, right) => vec![&**left, &**right],
            Self::Add(terms) => terms.iter().collect(),
            Self::Mul(factors, divisors) => factors.iter().chain(divisors.iter()).collect(),
            Self::Modulus(dividend, divisors) => {
                std::iter::once(&**dividend).chain(divisors.iter()).collect()
            },
        }
    }

    /// Rebuilds this node with every child replaced by the result of `f`. No simplification is
    /// applied to the new node.
    pub fn map_children(&self, mut f: impl FnMut(&Expr) -> Expr) -> Expr {
        match self {
            Self::Symbol(_) => self.clone(),
            Self::Function(name, args) => Self::Function(name.clone(), args.iter().map(&mut f).collect()),
            Self::Power(base, power) => Self::Power(Box::new(f(&**base)), Box::new(f(&**power))),
            Self::Equation(left, right) => Self::Equation(Box::new(f(&**left)), Box::new(f(&**right))),
            Self::Add(terms) => Self::Add(terms.iter().map(&mut f).collect()),
            Self::Mul(factors, divisors) => {
                let factors = factors.iter().map(&mut f).collect();
                let divisors = divisors.iter().map(&mut f).collect();
                Self::Mul(factors, divisors)
            },
            Self::Modulus(dividend, divisors) => {
                let dividend = f(&**dividend);
                Self::Modulus(Box::new(dividend), divisors.iter().map(&mut f).collect())
            },
        }
    }

    /// Fallible version of [`Expr::map_children`]. Stops at the first error.
    pub fn try_map_children<E>(
        &self,
        mut f: impl FnMut(&Expr) -> Result<Expr, E>,
    ) -> Result<Expr, E> {
        Ok(match self {
            Self::Symbol(_) => self.clone(),
            Self::Function(name, args) => {
                Self::Function(name.clone(), args.iter().map(&mut f).collect::<Result<_, _>>()?)
            },
            Self::Power(base, power) => Self::Power(Box::new(f(&**base)?), Box::new(f(&**power)?)),
            Self::Equation(left, right) => Self::Equation(Box::new(f(&**left)?), Box::new(f(&**right)?)),
            Self::Add(terms) => Self::Add(terms.iter().map(&mut f).collect::<Result<_, _>>()?),
            Self::Mul(factors, divisors) => {
                let factors = factors.iter().map(&mut f).collect::<Result<_, _>>()?;
                let divisors = divisors.iter().map(&mut f).collect::<Result<_, _>>()?;
                Self::Mul(factors, divisors)
            },
            Self::Modulus(dividend, divisors) => {
                let dividend = f(&**dividend)?;
                Self::Modulus(Box::new(dividend), divisors.iter().map(&mut f).collect::<Result<_, _>>()?)
            },
        })
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns `-1 * self`, folding the sign into numbers.
    pub(crate) fn negated(self) -> Self {
        match self.to_double() {
            Some(value) => Self::number(-value),
            None => Self::Mul(vec![Self::minus_one(), self], Vec::new()),
        }
    }
}

impl FromStr for Expr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Collects the operands of a chain of `+` / `-` operators. Parenthesized sums are kept as
/// single terms and flattened later by the simplifier.
fn collect_terms(expr: AstExpr, negate: bool, terms: &mut Vec<Expr>) {
    match expr {
        AstExpr::Binary(Binary { lhs, op, rhs, .. })
            if matches!(op.kind, BinOpKind::Add | BinOpKind::Sub) =>
        {
            collect_terms(*lhs, negate, terms);
            collect_terms(*rhs, negate ^ (op.kind == BinOpKind::Sub), terms);
        },
        expr => {
            let term = Expr::from(expr);
            terms.push(if negate { term.negated() } else { term });
        },
    }
}

/// Collects the operands of a chain of `*` / `/` operators into factors and divisors.
fn collect_factors(expr: AstExpr, invert: bool, factors: &mut Vec<Expr>, divisors: &mut Vec<Expr>) {
    match expr {
        AstExpr::Binary(Binary { lhs, op, rhs, .. })
            if matches!(op.kind, BinOpKind::Mul | BinOpKind::Div) =>
        {
            collect_factors(*lhs, invert, factors, divisors);
            collect_factors(*rhs, invert ^ (op.kind == BinOpKind::Div), factors, divisors);
        },
        expr => {
            if invert {
                divisors.push(Expr::from(expr));
            } else {
                factors.push(Expr::from(expr));
            }
        },
    }
}

/// Collects the operands of a chain of `%` operators, leftmost first.
fn collect_moduli(expr: AstExpr, operands: &mut Vec<Expr>) {
    match expr {
        AstExpr::Binary(Binary { lhs, op, rhs, .. }) if op.kind == BinOpKind::Mod => {
            collect_moduli(*lhs, operands);
            operands.push(Expr::from(*rhs));
        },
        expr => operands.push(Expr::from(expr)),
    }
}

impl From<Binary> for Expr {
    fn from(bin: Binary) -> Self {
        match bin.op.kind {
            BinOpKind::Add | BinOpKind::Sub => {
                let mut terms = Vec::new();
                collect_terms(AstExpr::Binary(bin), false, &mut terms);
                Self::Add(terms)
            },
            BinOpKind::Mul | BinOpKind::Div => {
                let (mut factors, mut divisors) = (Vec::new(), Vec::new());
                collect_factors(AstExpr::Binary(bin), false, &mut factors, &mut divisors);
                Self::Mul(factors, divisors)
            },
            BinOpKind::Mod => {
                let mut operands = Vec::new();
                collect_moduli(AstExpr::Binary(bin), &mut operands);
                let dividend = operands.remove(0);
                Self::Modulus(Box::new(dividend), operands)
            },
            BinOpKind::Exp => Self::Power(Box::new(Self::from(*bin.lhs)), Box::new(Self::from(*bin.rhs))),
            BinOpKind::Equation => {
                Self::Equation(Box::new(Self::from(*bin.lhs)), Box::new(Self::from(*bin.rhs)))
            },
            kind => {
                // relational and logical operators are plain two-argument functions
                let name = kind.function_name().unwrap_or_else(|| kind.symbol());
                Self::Function(name.to_string(), vec![Self::from(*bin.lhs), Self::from(*bin.rhs)])
            },
        }
    }
}

impl From<AstExpr> for Expr {
    fn from(expr: AstExpr) -> Self {
        match expr {
            AstExpr::Literal(Literal::Number(num)) => match num.value.parse::<f64>() {
                Ok(value) => Self::number(value),
                Err(_) => Self::Symbol(num.value),
            },
            AstExpr::Literal(Literal::Symbol(sym)) => Self::Symbol(sym.name),
            AstExpr::Paren(paren) => Self::from(*paren.expr),
            AstExpr::Call(call) => {
                let mut args = call.args.into_iter().map(Self::from).collect::<Vec<_>>();
                if call.name.name == "pow" && args.len() == 2 {
                    let power = args.remove(1);
                    let base = args.remove(0);
                    Self::Power(Box::new(base), Box::new(power))
                } else {
                    Self::Function(call.name.name, args)
                }
            },
            AstExpr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => Self::from(*unary.operand).negated(),
                UnaryOpKind::Pos => Self::from(*unary.operand),
            },
            AstExpr::Binary(bin) => Self::from(bin),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn raw(src: &str) -> Expr {
        Expr::parse_with(src, SimplifyLevel::None).unwrap()
    }

    #[test]
    fn flattens_sums_and_products() {
        assert_eq!(raw("a-b+c"), Expr::Add(vec![
            Expr::symbol("a"),
            Expr::Mul(vec![Expr::minus_one(), Expr::symbol("b")], vec![]),
            Expr::symbol("c"),
        ]));
        assert_eq!(raw("a/b*c/d"), Expr::Mul(
            vec![Expr::symbol("a"), Expr::symbol("c")],
            vec![Expr::symbol("b"), Expr::symbol("d")],
        ));
    }

    #[test]
    fn numbers_are_normalized() {
        assert_eq!(raw("5"), Expr::Symbol("5.0".to_string()));
        assert_eq!(raw(".5"), Expr::Symbol("0.5".to_string()));
        assert_eq!(raw("1e-5"), Expr::Symbol("0.00001".to_string()));
        assert_eq!(raw("-1"), Expr::Symbol("-1.0".to_string()));
        assert_eq!(raw("-5"), Expr::Mul(vec![Expr::minus_one(), Expr::number(5.0)], vec![]));
    }

    #[test]
    fn pow_call_becomes_power() {
        assert_eq!(raw("pow(x, 2)"), raw("x^2"));
        assert_eq!(raw("pow(x, 2)"), Expr::Power(Box::new(Expr::symbol("x")), Box::new(Expr::number(2.0))));
        assert!(raw("pow(x)").is_function());
    }

    #[test]
    fn relational_operators_become_functions() {
        assert_eq!(raw("a >= b"), Expr::Function(
            "greaterThanOrEqual".to_string(),
            vec![Expr::symbol("a"), Expr::symbol("b")],
        ));
        assert_eq!(raw("a && b || c").function_name(), Some("logicalOr"));
    }

    #[test]
    fn modulus_chain() {
        assert_eq!(raw("a % b % c"), Expr::Modulus(
            Box::new(Expr::symbol("a")),
            vec![Expr::symbol("b"), Expr::symbol("c")],
        ));
    }

    #[test]
    fn commutative_equality() {
        assert_eq!(Expr::parse("a+b").unwrap(), Expr::parse("b+a").unwrap());
        assert_eq!(Expr::parse("a*b").unwrap(), Expr::parse("b*a").unwrap());
        assert_ne!(Expr::parse("a-b").unwrap(), Expr::parse("b-a").unwrap());
        assert_eq!(Expr::parse("x = y+1").unwrap(), Expr::parse("1+y = x").unwrap());
    }

    #[test]
    fn equality_counts_multiplicity() {
        assert_ne!(raw("x+x"), raw("x"));
        assert_ne!(raw("x+x+y"), raw("x+y+y"));
        assert_eq!(raw("x+y+x"), raw("x+x+y"));
        assert_ne!(Expr::parse("x+x").unwrap(), Expr::parse("x").unwrap());
    }

    #[test]
    fn argument_order_is_significant() {
        assert_ne!(raw("f(a, b)"), raw("f(b, a)"));
    }

    #[test]
    fn parse_errors_are_reported() {
        assert!(Expr::parse("").is_err());
        assert!(Expr::parse("(a+b").is_err());
        assert!(Expr::parse("a+").is_err());
        assert!("a*b".parse::<Expr>().is_ok());
    }

    #[test]
    fn parse_parts_joins() {
        let parts = ["a", "+", "b"];
        assert_eq!(Expr::parse_parts(&parts, SimplifyLevel::Full).unwrap(), Expr::parse("a+b").unwrap());
    }
}
