//! Numerical evaluation of expressions.
//!
//! An [`Expr`](crate::Expr) is evaluated against a [`Ctxt`], which binds variable names to
//! values and optionally provides [`UserFunction`]s. The result is a plain [`f64`].
//!
//! ```
//! use symhop_compute::{numerical::ctxt::Ctxt, Expr};
//!
//! let mut ctxt = Ctxt::new();
//! ctxt.add_var("x", 2.0);
//!
//! let expr = Expr::parse("x^2 + limit(x, 0, 1)").unwrap();
//! assert_eq!(expr.evaluate(&ctxt).unwrap(), 5.0);
//! ```

pub mod builtins;
pub mod ctxt;
pub mod error;
pub mod eval;

pub use ctxt::{Ctxt, UserFunction};
pub use error::EvalError;
pub use eval::Eval;
