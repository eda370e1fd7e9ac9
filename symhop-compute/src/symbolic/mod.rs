//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions in this module are represented as a tree of [`Expr`] nodes. It's similar to the
//! [`symhop_parser::parser::ast::Expr`] nodes produced by [`symhop_parser`], with the main
//! difference being that [`Expr`] nodes **flatten** out the tree structure.
//!
//! For example, the expression `x + (y + z)` would be represented internally as a single
//! [`Expr::Add`] node with _three_ terms, `x`, `y`, and `z`, and `a*b/c/d` as a single
//! [`Expr::Mul`] node with the factors `a`, `b` and the divisors `c`, `d`. This makes it easy to
//! combine like terms (`x + x = 2*x`) and to cancel factors against divisors (`x*y/y = x`), since
//! the terms / factors in question are all at the same level in the tree.
//!
//! Numbers are stored as [`Expr::Symbol`]s holding a normalized decimal string (`5` becomes
//! `5.0`). Negation is never a separate node: `-x` is the product `-1.0*x`.
//!
//! ```
//! use symhop_compute::symbolic::{Expr, SimplifyLevel};
//!
//! let expr = Expr::parse_with("x + (y + z)", SimplifyLevel::Trivial).unwrap();
//! assert_eq!(expr, Expr::Add(vec![
//!     Expr::symbol("x"),
//!     Expr::symbol("y"),
//!     Expr::symbol("z"),
//! ]));
//! ```
//!
//! # Simplification
//!
//! Simplification is done by applying a set of rules to the expression in multiple passes, until
//! no rule applies anymore. Each rule is a function that accepts an expression and returns
//! [`Option<Expr>`]; if the rule is applicable, the rewritten expression is returned. The rules
//! are split into two levels, see [`SimplifyLevel`].
//!
//! ```
//! use symhop_compute::symbolic::Expr;
//!
//! // `x + x + x = 3*x`
//! let expr = Expr::parse("x + x + x").unwrap();
//! assert_eq!(expr, Expr::Mul(vec![Expr::number(3.0), Expr::symbol("x")], vec![]));
//! ```
//!
//! For more information, see the [`mod@simplify`] module.

pub mod derivative;
pub mod error;
pub mod expr;
pub mod fmt;
pub mod simplify;
pub mod step_collector;
pub mod system;
pub mod transform;

pub use derivative::DerivativeError;
pub use expr::Expr;
pub use simplify::{simplify, simplify_with, simplify_with_steps, Recursion, SimplifyLevel};
pub use step_collector::StepCollector;
