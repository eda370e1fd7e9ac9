//! The SymHop symbolic expression engine.
//!
//! Expression strings are parsed by [`symhop_parser`] and converted into an [`Expr`] tree, a
//! flattened representation built out of sums, products, powers, function calls and equations.
//! On top of that tree, this crate provides:
//!
//! - [`symbolic::simplify`]: structural simplification at two strictness levels,
//! - [`symbolic::derivative`]: rule-based symbolic differentiation,
//! - [`symbolic::fmt`]: rendering back to expression strings and LaTeX,
//! - [`symbolic::transform`]: discretization of `der()` calls into expressions of the delay
//!   operator `Z`, delay extraction, linearization and factoring,
//! - [`symbolic::system`]: sorting of equation systems by their Jacobian,
//! - [`numerical`]: evaluation of expressions to `f64` values.
//!
//! ```
//! use symhop_compute::Expr;
//!
//! let expr = Expr::parse("2*x+x+x+y").unwrap();
//! assert_eq!(expr.to_string(), "4.0*x+y");
//!
//! let derivative = Expr::parse("x*x").unwrap().derivative(&Expr::symbol("x")).unwrap();
//! assert_eq!(derivative, Expr::parse("2*x").unwrap());
//! ```
//!
//! # Features
//!
//! - `serde`: Derives `Serialize` and `Deserialize` for [`Expr`] and the parser's AST.

pub mod consts;
pub mod diagnostic;
pub mod numerical;
pub mod symbolic;

pub use diagnostic::{Diagnostic, Severity};
pub use symbolic::{expr::Expr, step_collector::StepCollector};
